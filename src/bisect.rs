use crate::chars::CharIndex;
use crate::diff::{DiffCtx, diff_inner};
use crate::ops::Diff;
use std::time::Instant;

/// Finds the middle snake of an optimal path and recursively diffs the halves.
///
/// Runs Myers' O(ND) search from both ends of the edit graph at once, stepping
/// one depth `d` at a time until the frontiers meet. Hitting the deadline (or
/// finding no commonality at all) degrades the subproblem to a coarse
/// delete + insert pair.
pub(crate) fn bisect(text1: &str, text2: &str, ctx: &mut DiffCtx) -> Vec<Diff> {
	let runes1 = CharIndex::new(text1);
	let runes2 = CharIndex::new(text2);
	let n = runes1.len() as isize;
	let m = runes2.len() as isize;
	let max_d = (n + m + 1) / 2;
	let v_offset = max_d;
	let v_length = (2 * max_d) as usize;

	ctx.v1.clear();
	ctx.v1.resize(v_length, -1);
	ctx.v2.clear();
	ctx.v2.resize(v_length, -1);
	ctx.v1[(v_offset + 1) as usize] = 0;
	ctx.v2[(v_offset + 1) as usize] = 0;

	let delta = n - m;
	// If the total number of characters is odd, the front path will collide
	// with the reverse path; if even, only the reverse path can.
	let front = delta % 2 != 0;

	// Offsets for start and end of k loops, to trim diagonals off the grid.
	let mut k1start: isize = 0;
	let mut k1end: isize = 0;
	let mut k2start: isize = 0;
	let mut k2end: isize = 0;

	for d in 0..max_d {
		if ctx.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
			tracing::debug!(depth = d, "bisect deadline reached, degrading to coarse edits");
			break;
		}

		// -- Forward path.
		let mut k1 = -d + k1start;
		while k1 <= d - k1end {
			let k1_offset = (v_offset + k1) as usize;
			let mut x1 = if k1 == -d || (k1 != d && ctx.v1[k1_offset - 1] < ctx.v1[k1_offset + 1]) {
				ctx.v1[k1_offset + 1]
			} else {
				ctx.v1[k1_offset - 1] + 1
			};
			let mut y1 = x1 - k1;
			while x1 < n && y1 < m && runes1.char_at(x1 as usize) == runes2.char_at(y1 as usize) {
				x1 += 1;
				y1 += 1;
			}
			ctx.v1[k1_offset] = x1;
			if x1 > n {
				// Ran off the right of the graph.
				k1end += 2;
			} else if y1 > m {
				// Ran off the bottom of the graph.
				k1start += 2;
			} else if front {
				let k2_offset = v_offset + delta - k1;
				if k2_offset >= 0 && (k2_offset as usize) < v_length && ctx.v2[k2_offset as usize] != -1 {
					// Mirror x2 onto the top-left coordinate system.
					let x2 = n - ctx.v2[k2_offset as usize];
					if x1 >= x2 {
						return bisect_split(&runes1, &runes2, x1 as usize, y1 as usize, ctx);
					}
				}
			}
			k1 += 2;
		}

		// -- Reverse path.
		let mut k2 = -d + k2start;
		while k2 <= d - k2end {
			let k2_offset = (v_offset + k2) as usize;
			let mut x2 = if k2 == -d || (k2 != d && ctx.v2[k2_offset - 1] < ctx.v2[k2_offset + 1]) {
				ctx.v2[k2_offset + 1]
			} else {
				ctx.v2[k2_offset - 1] + 1
			};
			let mut y2 = x2 - k2;
			while x2 < n
				&& y2 < m
				&& runes1.char_at((n - x2 - 1) as usize) == runes2.char_at((m - y2 - 1) as usize)
			{
				x2 += 1;
				y2 += 1;
			}
			ctx.v2[k2_offset] = x2;
			if x2 > n {
				k2end += 2;
			} else if y2 > m {
				k2start += 2;
			} else if !front {
				let k1_offset = v_offset + delta - k2;
				if k1_offset >= 0 && (k1_offset as usize) < v_length && ctx.v1[k1_offset as usize] != -1 {
					let x1 = ctx.v1[k1_offset as usize];
					let y1 = v_offset + x1 - k1_offset;
					let x2 = n - x2;
					if x1 >= x2 {
						return bisect_split(&runes1, &runes2, x1 as usize, y1 as usize, ctx);
					}
				}
			}
			k2 += 2;
		}
	}

	// Deadline hit, or the number of edits equals the number of characters and
	// there is no commonality at all.
	vec![Diff::delete(text1), Diff::insert(text2)]
}

fn bisect_split(runes1: &CharIndex, runes2: &CharIndex, x: usize, y: usize, ctx: &mut DiffCtx) -> Vec<Diff> {
	let text1a = runes1.slice(0, x);
	let text2a = runes2.slice(0, y);
	let text1b = runes1.slice(x, runes1.len());
	let text2b = runes2.slice(y, runes2.len());

	let mut diffs = diff_inner(text1a, text2a, false, ctx);
	diffs.extend(diff_inner(text1b, text2b, false, ctx));
	diffs
}

// region:    --- Tests


// endregion: --- Tests
