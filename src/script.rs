use crate::chars::char_count;
use crate::ops::{Diff, Op};

/// Rebuilds the first input from the script (equalities and deletions).
pub fn text1(diffs: &[Diff]) -> String {
	diffs
		.iter()
		.filter(|diff| diff.op.in_source())
		.map(|diff| diff.text.as_str())
		.collect()
}

/// Rebuilds the second input from the script (equalities and insertions).
pub fn text2(diffs: &[Diff]) -> String {
	diffs
		.iter()
		.filter(|diff| diff.op.in_target())
		.map(|diff| diff.text.as_str())
		.collect()
}

/// Levenshtein distance of the script, in code points.
pub fn levenshtein(diffs: &[Diff]) -> usize {
	let mut distance = 0;
	let mut insertions = 0;
	let mut deletions = 0;
	for diff in diffs {
		match diff.op {
			Op::Insert => insertions += char_count(&diff.text),
			Op::Delete => deletions += char_count(&diff.text),
			_ => {
				// A deletion and an insertion is one substitution.
				distance += insertions.max(deletions);
				insertions = 0;
				deletions = 0;
			}
		}
	}
	distance + insertions.max(deletions)
}

/// Maps `loc`, a byte offset into the first input, to the corresponding byte
/// offset in the second. Offsets land on code-point boundaries when `loc` does.
pub fn x_index(diffs: &[Diff], loc: usize) -> usize {
	let mut bytes1 = 0;
	let mut bytes2 = 0;
	let mut last_bytes1 = 0;
	let mut last_bytes2 = 0;
	let mut hit: Option<&Diff> = None;
	for diff in diffs {
		if diff.op != Op::Insert {
			bytes1 += diff.text.len();
		}
		if diff.op != Op::Delete {
			bytes2 += diff.text.len();
		}
		if bytes1 > loc {
			hit = Some(diff);
			break;
		}
		last_bytes1 = bytes1;
		last_bytes2 = bytes2;
	}
	if hit.is_some_and(|diff| diff.op == Op::Delete) {
		// The location was deleted.
		return last_bytes2;
	}
	last_bytes2 + (loc - last_bytes1)
}

/// Renders the script as HTML with insertions and deletions marked up.
pub fn pretty_html(diffs: &[Diff]) -> String {
	let mut html = String::new();
	for diff in diffs {
		let text = escape_html(&diff.text).replace('\n', "&para;<br>");
		match diff.op {
			Op::Insert => {
				html.push_str("<ins style=\"background:#e6ffe6;\">");
				html.push_str(&text);
				html.push_str("</ins>");
			}
			Op::Delete => {
				html.push_str("<del style=\"background:#ffe6e6;\">");
				html.push_str(&text);
				html.push_str("</del>");
			}
			Op::Equal => {
				html.push_str("<span>");
				html.push_str(&text);
				html.push_str("</span>");
			}
			Op::DeleteInsert => unreachable!("sentinel op in a finished script"),
		}
	}
	html
}

fn escape_html(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			_ => out.push(c),
		}
	}
	out
}

// region:    --- Tests


// endregion: --- Tests
