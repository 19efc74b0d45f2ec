use crate::affix::{common_prefix, common_suffix};
use crate::chars::{CharIndex, char_count};

/// A heuristic split of both inputs around a shared middle.
///
/// Invariant: `prefix1 · common · suffix1` is the first input,
/// `prefix2 · common · suffix2` the second, and `common` spans at least half
/// the longer input in code points.
#[derive(Debug, PartialEq, Eq)]
pub struct HalfMatch<'a> {
	pub prefix1: &'a str,
	pub suffix1: &'a str,
	pub prefix2: &'a str,
	pub suffix2: &'a str,
	pub common: &'a str,
}

// Split of the longer/shorter operand pair, before mapping back to argument order.
struct Split<'a> {
	long_a: &'a str,
	long_b: &'a str,
	short_a: &'a str,
	short_b: &'a str,
	common: &'a str,
}

/// Looks for a substring shared by both texts that spans at least half the
/// longer one, trying a quarter-length seed at the one-quarter and one-half
/// marks. The driver only calls this under a deadline, since the split trades
/// optimality for speed.
pub fn half_match<'a>(text1: &'a str, text2: &'a str) -> Option<HalfMatch<'a>> {
	let count1 = char_count(text1);
	let count2 = char_count(text2);
	let (long, short, swapped) = if count1 > count2 {
		(text1, text2, false)
	} else {
		(text2, text1, true)
	};

	let long_count = count1.max(count2);
	if long_count < 4 || count1.min(count2) * 2 < long_count {
		return None;
	}

	let long_idx = CharIndex::new(long);
	let split1 = half_match_at(long, &long_idx, short, long_count.div_ceil(4));
	let split2 = half_match_at(long, &long_idx, short, long_count.div_ceil(2));
	let best = match (split1, split2) {
		(None, None) => return None,
		(Some(split), None) | (None, Some(split)) => split,
		(Some(a), Some(b)) => {
			if char_count(a.common) > char_count(b.common) {
				a
			} else {
				b
			}
		}
	};

	Some(if swapped {
		HalfMatch {
			prefix1: best.short_a,
			suffix1: best.short_b,
			prefix2: best.long_a,
			suffix2: best.long_b,
			common: best.common,
		}
	} else {
		HalfMatch {
			prefix1: best.long_a,
			suffix1: best.long_b,
			prefix2: best.short_a,
			suffix2: best.short_b,
			common: best.common,
		}
	})
}

/// Seeds with the quarter of `long` starting at code point `anchor` and keeps
/// the best extension around each occurrence of the seed in `short`.
fn half_match_at<'a>(
	long: &'a str,
	long_idx: &CharIndex<'a>,
	short: &'a str,
	anchor: usize,
) -> Option<Split<'a>> {
	let seed = long_idx.slice(anchor, anchor + long_idx.len() / 4);
	let anchor_byte = long_idx.byte_pos(anchor);

	let mut best: Option<Split<'a>> = None;
	let mut best_chars = 0;

	let mut found = short.find(seed);
	while let Some(j) = found {
		let prefix_len = common_prefix(&long[anchor_byte..], &short[j..]);
		let suffix_len = common_suffix(&long[..anchor_byte], &short[..j]);
		let common = &short[j - suffix_len..j + prefix_len];
		let common_chars = char_count(common);
		if common_chars > best_chars {
			best_chars = common_chars;
			best = Some(Split {
				long_a: &long[..anchor_byte - suffix_len],
				long_b: &long[anchor_byte + prefix_len..],
				short_a: &short[..j - suffix_len],
				short_b: &short[j + prefix_len..],
				common,
			});
		}

		// Resume the seed search one code point further in.
		let step = short[j..].chars().next().map(char::len_utf8).unwrap_or(1);
		found = short[j + step..].find(seed).map(|next| next + j + step);
	}

	if best_chars * 2 >= long_idx.len() { best } else { None }
}

// region:    --- Tests


// endregion: --- Tests
