//! Shared helpers for the integration tests; each test file that needs them
//! declares this file as a module.

#![allow(unused)] // Not every test file uses every helper.

use dmpx::{Diff, Op};

pub type TestResult<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

/// Parses the script mini-language used by the tests: `op<text>` tokens
/// separated by whitespace, with `op` one of `=`, `+`, `-`.
///
/// Example: `=<ab> +<123> =<c>`
pub fn parse_script(input: &str) -> TestResult<Vec<Diff>> {
	let mut diffs = Vec::new();
	let mut rest = input.trim();
	while !rest.is_empty() {
		let op = match rest.chars().next() {
			Some('=') => Op::Equal,
			Some('+') => Op::Insert,
			Some('-') => Op::Delete,
			Some(other) => return Err(format!("Unknown op '{other}' in script: {input}").into()),
			None => break,
		};
		if !rest[1..].starts_with('<') {
			return Err(format!("Missing '<' after op in script: {input}").into());
		}
		let end = rest
			.find('>')
			.ok_or_else(|| format!("Unclosed op text in script: {input}"))?;
		diffs.push(Diff::new(op, &rest[2..end]));
		rest = rest[end + 1..].trim_start();
	}
	Ok(diffs)
}

/// Formats a script in the same mini-language, for readable assertion output.
pub fn fmt_script(diffs: &[Diff]) -> String {
	diffs
		.iter()
		.map(|diff| {
			let op = match diff.op {
				Op::Equal => '=',
				Op::Insert => '+',
				Op::Delete => '-',
				Op::DeleteInsert => '!',
			};
			format!("{op}<{}>", diff.text)
		})
		.collect::<Vec<_>>()
		.join(" ")
}

/// Deterministic filler text over the given alphabet (no external randomness,
/// so test runs are reproducible).
pub fn pseudo_text(seed: u64, alphabet: &[u8], len: usize) -> String {
	let mut state = seed;
	let mut text = String::with_capacity(len);
	for _ in 0..len {
		state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
		let pick = (state >> 33) as usize % alphabet.len();
		text.push(alphabet[pick] as char);
	}
	text
}
