use crate::ops::Diff;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use twox_hash::XxHash64;

type LineTable<'a> = HashMap<&'a str, usize, BuildHasherDefault<XxHash64>>;

// Line indices map to single-code-point tokens. Index 0 is reserved (the empty
// string slot) so U+0000 is never emitted, and the surrogate block is skipped.
const SURROGATE_BASE: usize = 0xD800;
const SURROGATE_SPAN: usize = 0x800;

fn index_to_token(index: usize) -> char {
	let scalar = if index >= SURROGATE_BASE {
		index + SURROGATE_SPAN
	} else {
		index
	};
	char::from_u32(scalar as u32).expect("line table exceeds the Unicode scalar range")
}

fn token_to_index(token: char) -> usize {
	let scalar = token as usize;
	if scalar >= SURROGATE_BASE + SURROGATE_SPAN {
		scalar - SURROGATE_SPAN
	} else {
		scalar
	}
}

/// Encodes both texts line-by-line into token strings sharing one line table.
///
/// Lines keep their trailing newline. Identical lines map to the same token, so
/// a character diff of the token strings is a line diff of the originals.
pub fn lines_to_chars<'a>(text1: &'a str, text2: &'a str) -> (String, String, Vec<&'a str>) {
	let mut lines: Vec<&str> = vec![""];
	let mut table = LineTable::default();

	let chars1 = lines_to_chars_munge(text1, &mut lines, &mut table);
	let chars2 = lines_to_chars_munge(text2, &mut lines, &mut table);

	(chars1, chars2, lines)
}

fn lines_to_chars_munge<'a>(text: &'a str, lines: &mut Vec<&'a str>, table: &mut LineTable<'a>) -> String {
	let mut chars = String::new();
	for line in text.split_inclusive('\n') {
		let index = *table.entry(line).or_insert_with(|| {
			lines.push(line);
			lines.len() - 1
		});
		chars.push(index_to_token(index));
	}
	chars
}

/// Rehydrates every token of every op back into its line, in place.
pub fn chars_to_lines(diffs: &mut [Diff], lines: &[&str]) {
	for diff in diffs {
		let mut text = String::new();
		for token in diff.text.chars() {
			text.push_str(lines[token_to_index(token)]);
		}
		diff.text = text;
	}
}

// region:    --- Tests


// endregion: --- Tests
