use crate::chars::{CharIndex, char_count};
use crate::error::{Error, Result};
use crate::ops::{Diff, Op};
use std::fmt::Write as _;

/// Crushes the script into a compact wire string: tab-separated tokens where
/// `=N` and `-N` reference runs of N code points of the source text and
/// `+text` carries inserted text, percent-encoded.
pub fn to_delta(diffs: &[Diff]) -> String {
	let mut tokens = Vec::with_capacity(diffs.len());
	for diff in diffs {
		match diff.op {
			Op::Insert => tokens.push(format!("+{}", encode_uri(&diff.text))),
			Op::Delete => tokens.push(format!("-{}", char_count(&diff.text))),
			Op::Equal => tokens.push(format!("={}", char_count(&diff.text))),
			Op::DeleteInsert => unreachable!("sentinel op in a finished script"),
		}
	}
	tokens.join("\t")
}

/// Rebuilds the full script from the source text and a delta produced by
/// [`to_delta`], validating that the delta consumes the source exactly.
pub fn from_delta(text1: &str, delta: &str) -> Result<Vec<Diff>> {
	let source = CharIndex::new(text1);
	let mut diffs = Vec::new();
	// Code points consumed from the source text so far.
	let mut pos: usize = 0;

	for token in delta.split('\t') {
		let Some(op) = token.chars().next() else {
			// Blank tokens (from a trailing tab) are ok.
			continue;
		};
		let param = &token[op.len_utf8()..];
		match op {
			'+' => diffs.push(Diff::insert(decode_uri(param, token)?)),
			'-' | '=' => {
				let count: usize = param.parse().map_err(|_| Error::delta_bad_count(token))?;
				// checked_add: the count is untrusted and may be near usize::MAX.
				let end = pos
					.checked_add(count)
					.filter(|&end| end <= source.len())
					.ok_or_else(|| Error::delta_source_overrun(count, source.len() - pos))?;
				let text = source.slice(pos, end);
				pos = end;
				if op == '=' {
					diffs.push(Diff::equal(text));
				} else {
					diffs.push(Diff::delete(text));
				}
			}
			other => return Err(Error::delta_invalid_op(other)),
		}
	}

	if pos != source.len() {
		return Err(Error::delta_source_underrun(pos, source.len()));
	}
	Ok(diffs)
}

// region:    --- Support

// Bytes kept literal by the encoder: encodeURI's unreserved and reserved sets,
// plus a literal space.
fn is_literal(byte: u8) -> bool {
	byte.is_ascii_alphanumeric()
		|| matches!(
			byte,
			b' ' | b'!'
				| b'#' | b'$'
				| b'&' | b'\''
				| b'(' | b')'
				| b'*' | b'+'
				| b',' | b'-'
				| b'.' | b'/'
				| b':' | b';'
				| b'=' | b'?'
				| b'@' | b'_'
				| b'~'
		)
}

fn encode_uri(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for &byte in text.as_bytes() {
		if is_literal(byte) {
			out.push(byte as char);
		} else {
			let _ = write!(out, "%{byte:02X}");
		}
	}
	out
}

// Decodes %XX escapes. Unlike form decoding, '+' stays a literal plus.
fn decode_uri(encoded: &str, token: &str) -> Result<String> {
	let bytes = encoded.as_bytes();
	let mut out = Vec::with_capacity(bytes.len());
	let mut i = 0;
	while i < bytes.len() {
		if bytes[i] == b'%' {
			let hex = bytes
				.get(i + 1..i + 3)
				.and_then(|hex| std::str::from_utf8(hex).ok())
				.ok_or_else(|| Error::delta_bad_escape(token))?;
			let value = u8::from_str_radix(hex, 16).map_err(|_| Error::delta_bad_escape(token))?;
			out.push(value);
			i += 3;
		} else {
			out.push(bytes[i]);
			i += 1;
		}
	}
	String::from_utf8(out).map_err(|_| Error::delta_bad_escape(token))
}

// endregion: --- Support

// region:    --- Tests

#[cfg(test)]
mod tests {
	use super::*;

	fn eq(text: &str) -> Diff {
		Diff::equal(text)
	}
	fn ins(text: &str) -> Diff {
		Diff::insert(text)
	}
	fn del(text: &str) -> Diff {
		Diff::delete(text)
	}

	#[test]
	fn test_delta_roundtrip() -> Result<()> {
		let diffs = vec![
			eq("jump"),
			del("s"),
			ins("ed"),
			eq(" over "),
			del("the"),
			ins("a"),
			eq(" lazy"),
			ins("old dog"),
		];
		let text1 = crate::script::text1(&diffs);
		assert_eq!(text1, "jumps over the lazy");

		let delta = to_delta(&diffs);
		assert_eq!(delta, "=4\t-1\t+ed\t=6\t-3\t+a\t=5\t+old dog");

		assert_eq!(from_delta(&text1, &delta)?, diffs);
		Ok(())
	}

	#[test]
	fn test_delta_roundtrip_special_characters() -> Result<()> {
		let diffs = vec![
			eq("\u{0680} \x00 \t %"),
			del("\u{0681} \x01 \n ^"),
			ins("\u{0682} \x02 \\ |"),
		];
		let text1 = crate::script::text1(&diffs);

		let delta = to_delta(&diffs);
		assert_eq!(delta, "=7\t-7\t+%DA%82 %02 %5C %7C");

		assert_eq!(from_delta(&text1, &delta)?, diffs);
		Ok(())
	}

	#[test]
	fn test_delta_unchanged_characters() {
		let diffs = vec![ins("A-Z a-z 0-9 - _ . ! ~ * ' ( ) ; / ? : @ & = + $ , # ")];
		let delta = to_delta(&diffs);
		assert_eq!(delta, "+A-Z a-z 0-9 - _ . ! ~ * ' ( ) ; / ? : @ & = + $ , # ");
	}

	#[test]
	fn test_delta_source_overrun() {
		// Delta one code point longer than the source.
		let res = from_delta("jumps over the laz", "=4\t-1\t+ed\t=6\t-3\t+a\t=5\t+old dog");
		assert!(matches!(res, Err(Error::DeltaSourceOverrun { .. })));
	}

	#[test]
	fn test_delta_count_overflow() {
		// A count near usize::MAX must surface as an error, not wrap around.
		let res = from_delta("abcde", "=5\t-18446744073709551615");
		assert!(matches!(res, Err(Error::DeltaSourceOverrun { .. })));

		let res = from_delta("abc", "=18446744073709551615");
		assert!(matches!(res, Err(Error::DeltaSourceOverrun { .. })));
	}

	#[test]
	fn test_delta_source_underrun() {
		// Source one code point longer than the delta covers.
		let res = from_delta("jumps over the lazyx", "=4\t-1\t+ed\t=6\t-3\t+a\t=5\t+old dog");
		assert!(matches!(res, Err(Error::DeltaSourceUnderrun { .. })));
	}

	#[test]
	fn test_delta_invalid_op() {
		let res = from_delta("", "a");
		assert!(matches!(res, Err(Error::DeltaInvalidOp { op: 'a' })));
	}

	#[test]
	fn test_delta_bad_count() {
		let res = from_delta("abc", "=x");
		assert!(matches!(res, Err(Error::DeltaBadCount { .. })));

		let res = from_delta("abc", "--1");
		assert!(matches!(res, Err(Error::DeltaBadCount { .. })));
	}

	#[test]
	fn test_delta_bad_escape() {
		let res = from_delta("", "+%zz");
		assert!(matches!(res, Err(Error::DeltaBadEscape { .. })));

		let res = from_delta("", "+%E0%A4");
		assert!(matches!(res, Err(Error::DeltaBadEscape { .. })));
	}

	#[test]
	fn test_delta_multibyte_counts() -> Result<()> {
		// Counts are code points, never bytes.
		let diffs = vec![eq("äöü"), del("ß"), ins("s")];
		let text1 = crate::script::text1(&diffs);

		let delta = to_delta(&diffs);
		assert_eq!(delta, "=3\t-1\t+s");

		assert_eq!(from_delta(&text1, &delta)?, diffs);
		Ok(())
	}
}

// endregion: --- Tests
