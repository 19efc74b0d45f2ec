use crate::affix::{common_prefix, common_suffix};
use crate::bisect::bisect;
use crate::chars::char_count;
use crate::cleanup::{cleanup_merge, cleanup_semantic};
use crate::half_match::half_match;
use crate::lines::{chars_to_lines, lines_to_chars};
use crate::ops::{Diff, Op};
use std::time::{Duration, Instant};

/// Deadline substituted by [`DiffTimeout::Default`].
pub const DEFAULT_DIFF_TIMEOUT: Duration = Duration::from_secs(1);

/// Time budget of a [`diff_main`] call.
///
/// Under a deadline the driver may engage the half-match heuristic and the
/// bisector degrades gracefully when time runs out, so the script stays valid
/// but may not be minimal. With `Unlimited` neither shortcut is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTimeout {
	/// No deadline; the half-match heuristic is disabled.
	Unlimited,
	/// The default deadline of one second.
	Default,
	/// Deadline of now plus the given duration.
	After(Duration),
}

impl Default for DiffTimeout {
	fn default() -> Self {
		Self::Default
	}
}

impl DiffTimeout {
	fn deadline(self) -> Option<Instant> {
		match self {
			DiffTimeout::Unlimited => None,
			DiffTimeout::Default => Some(Instant::now() + DEFAULT_DIFF_TIMEOUT),
			DiffTimeout::After(duration) => Some(Instant::now() + duration),
		}
	}
}

// Per-call driver state: the deadline, plus the bisector frontier buffers which
// are reused across recursive bisects (growth only).
pub(crate) struct DiffCtx {
	pub deadline: Option<Instant>,
	pub v1: Vec<isize>,
	pub v2: Vec<isize>,
}

impl DiffCtx {
	pub fn new(deadline: Option<Instant>) -> Self {
		Self {
			deadline,
			v1: Vec::new(),
			v2: Vec::new(),
		}
	}
}

/// Computes the edit script that turns `text1` into `text2`.
///
/// With `check_lines` set, inputs over 100 code points on both sides get a
/// faster, slightly less optimal pass that first diffs whole lines and then
/// refines the edited regions character by character.
///
/// The returned script is merged (`cleanup_merge`); callers wanting
/// human-friendly or operation-minimal output run `cleanup_semantic` or
/// `cleanup_efficiency` on it afterwards.
pub fn diff_main(text1: &str, text2: &str, check_lines: bool, timeout: DiffTimeout) -> Vec<Diff> {
	let mut ctx = DiffCtx::new(timeout.deadline());
	diff_inner(text1, text2, check_lines, &mut ctx)
}

pub(crate) fn diff_inner(text1: &str, text2: &str, check_lines: bool, ctx: &mut DiffCtx) -> Vec<Diff> {
	if text1 == text2 {
		if text1.is_empty() {
			return Vec::new();
		}
		return vec![Diff::equal(text1)];
	}

	// -- Trim the common prefix and suffix; only the middle block needs work.
	let prefix_len = common_prefix(text1, text2);
	let prefix = &text1[..prefix_len];
	let text1 = &text1[prefix_len..];
	let text2 = &text2[prefix_len..];

	let suffix_len = common_suffix(text1, text2);
	let suffix = &text1[text1.len() - suffix_len..];
	let text1 = &text1[..text1.len() - suffix_len];
	let text2 = &text2[..text2.len() - suffix_len];

	let mut diffs = diff_compute(text1, text2, check_lines, ctx);

	if !prefix.is_empty() {
		diffs.insert(0, Diff::equal(prefix));
	}
	if !suffix.is_empty() {
		diffs.push(Diff::equal(suffix));
	}
	cleanup_merge(&mut diffs);
	diffs
}

// Diffs two affix-free, unequal texts.
fn diff_compute(text1: &str, text2: &str, check_lines: bool, ctx: &mut DiffCtx) -> Vec<Diff> {
	if text1.is_empty() {
		return vec![Diff::insert(text2)];
	}
	if text2.is_empty() {
		return vec![Diff::delete(text1)];
	}

	{
		let (long, short) = if text1.len() > text2.len() {
			(text1, text2)
		} else {
			(text2, text1)
		};
		if let Some(i) = long.find(short) {
			// The shorter text is inside the longer; the rest is one edit op.
			let op = if text1.len() > text2.len() { Op::Delete } else { Op::Insert };
			return vec![
				Diff::new(op, &long[..i]),
				Diff::equal(short),
				Diff::new(op, &long[i + short.len()..]),
			];
		}
		if char_count(short) == 1 {
			// A single code point that is not contained cannot be an equality.
			return vec![Diff::delete(text1), Diff::insert(text2)];
		}
	}

	// The half-match split trades optimality for speed, so it only runs when a
	// deadline is pressing.
	if ctx.deadline.is_some() {
		if let Some(hm) = half_match(text1, text2) {
			let mut diffs = diff_inner(hm.prefix1, hm.prefix2, check_lines, ctx);
			diffs.push(Diff::equal(hm.common));
			diffs.extend(diff_inner(hm.suffix1, hm.suffix2, check_lines, ctx));
			return diffs;
		}
	}

	if check_lines && char_count(text1) > 100 && char_count(text2) > 100 {
		return diff_line_mode(text1, text2, ctx);
	}

	bisect(text1, text2, ctx)
}

// Line-level pass for large inputs: diff line tokens, then re-diff each edited
// region character by character.
fn diff_line_mode(text1: &str, text2: &str, ctx: &mut DiffCtx) -> Vec<Diff> {
	tracing::trace!(len1 = text1.len(), len2 = text2.len(), "line mode");
	let (chars1, chars2, lines) = lines_to_chars(text1, text2);
	let mut diffs = diff_inner(&chars1, &chars2, false, ctx);
	chars_to_lines(&mut diffs, &lines);
	cleanup_semantic(&mut diffs);

	diffs.push(Diff::equal(""));
	let mut pointer = 0;
	let mut count_delete = 0;
	let mut count_insert = 0;
	let mut text_delete = String::new();
	let mut text_insert = String::new();
	while pointer < diffs.len() {
		match diffs[pointer].op {
			Op::Insert => {
				count_insert += 1;
				text_insert.push_str(&diffs[pointer].text);
			}
			Op::Delete => {
				count_delete += 1;
				text_delete.push_str(&diffs[pointer].text);
			}
			_ => {
				if count_delete >= 1 && count_insert >= 1 {
					let start = pointer - count_delete - count_insert;
					let sub = diff_inner(&text_delete, &text_insert, false, ctx);
					let sub_len = sub.len();
					diffs.splice(start..pointer, sub);
					pointer = start + sub_len;
				}
				count_delete = 0;
				count_insert = 0;
				text_delete.clear();
				text_insert.clear();
			}
		}
		pointer += 1;
	}
	diffs.pop();
	diffs
}

// region:    --- Tests


// endregion: --- Tests
