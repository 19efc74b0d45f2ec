//! Integration tests that drive the public diff API end to end.

mod test_support;

use assertables::{assert_contains, assert_ge, assert_lt};
use dmpx::for_test::{bisect, half_match};
use dmpx::{
	DEFAULT_EDIT_COST, DiffTimeout, cleanup_efficiency, cleanup_semantic, diff_main, from_delta,
	levenshtein, pretty_html, text1, text2, to_delta, x_index,
};
use std::time::{Duration, Instant};
use test_support::{fmt_script, parse_script, pseudo_text};

type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

#[test]
fn test_diff_simple_insertion() -> Result<()> {
	// -- Exec
	let diffs = diff_main("abc", "ab123c", false, DiffTimeout::Default);

	// -- Check
	assert_eq!(fmt_script(&diffs), "=<ab> +<123> =<c>");

	Ok(())
}

#[test]
fn test_diff_simple_deletion() -> Result<()> {
	// -- Exec
	let diffs = diff_main("a123bc", "abc", false, DiffTimeout::Default);

	// -- Check
	assert_eq!(fmt_script(&diffs), "=<a> -<123> =<bc>");

	Ok(())
}

#[test]
fn test_diff_multibyte_unlimited() -> Result<()> {
	// -- Exec
	let diffs = diff_main(
		"Apples are ä fruit.",
		"Bananas are älso fruit.",
		false,
		DiffTimeout::Unlimited,
	);

	// -- Check
	let expected = parse_script("-<Apple> +<Banana> =<s are ä> +<lso> =< fruit.>")?;
	assert_eq!(diffs, expected);

	Ok(())
}

#[test]
fn test_diff_half_match_record() -> Result<()> {
	// -- Exec
	let hm = half_match("1234567890", "a345678z").ok_or("expected a half match")?;

	// -- Check
	assert_eq!(
		(hm.prefix1, hm.suffix1, hm.prefix2, hm.suffix2, hm.common),
		("12", "90", "a", "z", "345678")
	);

	Ok(())
}

#[test]
fn test_diff_bisect() -> Result<()> {
	// -- Exec
	let diffs = bisect("cat", "map", Some(Instant::now() + Duration::from_secs(10)));

	// -- Check
	assert_eq!(fmt_script(&diffs), "-<c> +<m> =<a> -<t> +<p>");

	// -- Exec (deadline already passed)
	let diffs = bisect("cat", "map", Some(Instant::now() - Duration::from_secs(1)));

	// -- Check
	assert_eq!(fmt_script(&diffs), "-<cat> +<map>");

	Ok(())
}

#[test]
fn test_diff_cleanup_semantic_overlap() -> Result<()> {
	// -- Setup & Fixtures
	let mut diffs = parse_script("-<abcxxx> +<xxxdef>")?;

	// -- Exec
	cleanup_semantic(&mut diffs);

	// -- Check
	assert_eq!(fmt_script(&diffs), "-<abc> =<xxx> +<def>");

	Ok(())
}

#[test]
fn test_diff_cleanup_efficiency_four_edits() -> Result<()> {
	// -- Setup & Fixtures
	let mut diffs = parse_script("-<ab> +<12> =<xyz> -<cd> +<34>")?;

	// -- Exec
	cleanup_efficiency(&mut diffs, DEFAULT_EDIT_COST);

	// -- Check
	assert_eq!(fmt_script(&diffs), "-<abxyzcd> +<12xyz34>");

	Ok(())
}

#[test]
fn test_diff_line_mode_matches_char_mode() -> Result<()> {
	// -- Setup & Fixtures
	let text_a = "1234567890\n".repeat(13);
	let text_b = "abcdefghij\n".repeat(13);

	// -- Exec
	let line_mode = diff_main(&text_a, &text_b, true, DiffTimeout::Default);
	let char_mode = diff_main(&text_a, &text_b, false, DiffTimeout::Default);

	// -- Check
	assert_eq!(line_mode, char_mode);

	Ok(())
}

#[test]
fn test_diff_line_mode_reconstructs() -> Result<()> {
	// -- Setup & Fixtures
	// Two large texts sharing most lines, with edits sprinkled in.
	let text_a: String = (0..200).map(|i| format!("line number {i}\n")).collect();
	let text_b: String = (0..200)
		.map(|i| {
			if i % 17 == 0 {
				format!("edited line {i}\n")
			} else {
				format!("line number {i}\n")
			}
		})
		.collect();

	// -- Exec
	let diffs = diff_main(&text_a, &text_b, true, DiffTimeout::Default);

	// -- Check
	assert_eq!(text1(&diffs), text_a);
	assert_eq!(text2(&diffs), text_b);

	Ok(())
}

#[test]
fn test_diff_timeout_bounds() -> Result<()> {
	// -- Setup & Fixtures
	// Two large texts over disjoint alphabets: no affixes, no containment, no
	// half match, so the bisector has to grind until the deadline.
	let text_a = pseudo_text(1, b"abcdefghijklm", 100_000);
	let text_b = pseudo_text(2, b"nopqrstuvwxyz", 100_000);
	let timeout = Duration::from_millis(100);

	// -- Exec
	let start = Instant::now();
	let diffs = diff_main(&text_a, &text_b, false, DiffTimeout::After(timeout));
	let elapsed = start.elapsed();

	// -- Check
	assert_ge!(elapsed, timeout);
	// Not strict about the upper bound to tolerate loaded machines.
	assert_lt!(elapsed, timeout * 5);
	assert_eq!(text1(&diffs), text_a);
	assert_eq!(text2(&diffs), text_b);

	Ok(())
}

#[test]
fn test_diff_script_consumers() -> Result<()> {
	// -- Setup & Fixtures
	let text_a = "The quick brown fox jumps over the lazy dog.\nSecond line.\n";
	let text_b = "The quick red fox leaps over the lazy dog.\nSecond line!\n";

	// -- Exec
	let mut diffs = diff_main(text_a, text_b, false, DiffTimeout::Default);
	cleanup_semantic(&mut diffs);

	// -- Check
	assert_eq!(text1(&diffs), text_a);
	assert_eq!(text2(&diffs), text_b);
	assert_ge!(levenshtein(&diffs), 1);

	let html = pretty_html(&diffs);
	assert_contains!(html, "<ins style=\"background:#e6ffe6;\">");
	assert_contains!(html, "<del style=\"background:#ffe6e6;\">");
	assert_contains!(html, "&para;<br>");

	// A location inside the shared prefix maps to itself.
	assert_eq!(x_index(&diffs, 3), 3);

	Ok(())
}

#[test]
fn test_diff_delta_roundtrip() -> Result<()> {
	// -- Setup & Fixtures
	let text_a = "The quick brown fox jumps över the lazy dog.";
	let text_b = "That quick brown fox jumped över a lazy dog.";

	// -- Exec
	let diffs = diff_main(text_a, text_b, false, DiffTimeout::Default);
	let delta = to_delta(&diffs);
	let rebuilt = from_delta(text_a, &delta)?;

	// -- Check
	assert_eq!(rebuilt, diffs);

	Ok(())
}
