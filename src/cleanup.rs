use crate::affix::{common_overlap, common_prefix, common_suffix};
use crate::chars::char_count;
use crate::ops::{Diff, Op};
use once_cell::sync::Lazy;
use regex::Regex;

/// Cost of an empty edit operation in terms of edit characters, used by
/// [`cleanup_efficiency`].
pub const DEFAULT_EDIT_COST: usize = 4;

static RE_BLANK_LINE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\n\r?\n(\z|\r?\n\z)").unwrap());
static RE_BLANK_LINE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\A\r?\n\r?\n").unwrap());

/// Reorders and merges like edit sections and factors out commonalities,
/// leaving the script canonical: no adjacent ops share a tag, no op is empty,
/// and any `DeleteInsert` sentinel is materialized into its delete + insert
/// pair. Reruns itself until no shift is left to make.
pub fn cleanup_merge(diffs: &mut Vec<Diff>) {
	if diffs.is_empty() {
		return;
	}

	diffs.push(Diff::equal(""));
	let mut pointer = 0;
	let mut run_start = 0;
	let mut count_delete = 0;
	let mut count_insert = 0;
	let mut text_delete = String::new();
	let mut text_insert = String::new();

	while pointer < diffs.len() {
		match diffs[pointer].op {
			Op::Insert => {
				if count_delete + count_insert == 0 {
					run_start = pointer;
				}
				count_insert += 1;
				text_insert.push_str(&diffs[pointer].text);
				pointer += 1;
			}
			Op::Delete => {
				if count_delete + count_insert == 0 {
					run_start = pointer;
				}
				count_delete += 1;
				text_delete.push_str(&diffs[pointer].text);
				pointer += 1;
			}
			Op::DeleteInsert => {
				// A reclassified equality is both deleted and inserted.
				if count_delete + count_insert == 0 {
					run_start = pointer;
				}
				count_delete += 1;
				count_insert += 1;
				text_delete.push_str(&diffs[pointer].text);
				text_insert.push_str(&diffs[pointer].text);
				pointer += 1;
			}
			Op::Equal => {
				if count_delete + count_insert > 1 {
					if count_delete != 0 && count_insert != 0 {
						// Factor out the common prefix into the preceding equality.
						let common = common_prefix(&text_insert, &text_delete);
						if common > 0 {
							if run_start > 0 && diffs[run_start - 1].op == Op::Equal {
								diffs[run_start - 1].text.push_str(&text_insert[..common]);
							} else {
								diffs.insert(0, Diff::equal(&text_insert[..common]));
								run_start += 1;
								pointer += 1;
							}
							text_insert.drain(..common);
							text_delete.drain(..common);
						}
						// Factor out the common suffix onto the following equality.
						let common = common_suffix(&text_insert, &text_delete);
						if common > 0 {
							let tail = text_insert.split_off(text_insert.len() - common);
							text_delete.truncate(text_delete.len() - common);
							diffs[pointer].text.insert_str(0, &tail);
						}
					}
					// Replace the run with its residue.
					diffs.splice(run_start..pointer, []);
					pointer = run_start;
					if !text_delete.is_empty() {
						diffs.insert(pointer, Diff::delete(text_delete.as_str()));
						pointer += 1;
					}
					if !text_insert.is_empty() {
						diffs.insert(pointer, Diff::insert(text_insert.as_str()));
						pointer += 1;
					}
					pointer += 1;
				} else if pointer != 0 && diffs[pointer - 1].op == Op::Equal {
					// Merge this equality into the previous one.
					let text = diffs.remove(pointer).text;
					diffs[pointer - 1].text.push_str(&text);
				} else {
					pointer += 1;
				}
				count_delete = 0;
				count_insert = 0;
				text_delete.clear();
				text_insert.clear();
			}
		}
	}
	if diffs.last().is_some_and(|diff| diff.text.is_empty()) {
		diffs.pop();
	}

	// Second pass: a single edit surrounded by equalities can eliminate a
	// split by sliding left or right.
	let mut changes = false;
	let mut pointer = 1;
	while pointer + 1 < diffs.len() {
		if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
			if diffs[pointer].text.ends_with(&diffs[pointer - 1].text) {
				// Shift the edit over the previous equality.
				let prev = diffs[pointer - 1].text.clone();
				let kept = diffs[pointer].text[..diffs[pointer].text.len() - prev.len()].to_string();
				diffs[pointer].text = format!("{prev}{kept}");
				diffs[pointer + 1].text.insert_str(0, &prev);
				diffs.remove(pointer - 1);
				changes = true;
			} else if diffs[pointer].text.starts_with(&diffs[pointer + 1].text) {
				// Shift the edit over the next equality.
				let next = diffs[pointer + 1].text.clone();
				diffs[pointer - 1].text.push_str(&next);
				let kept = diffs[pointer].text[next.len()..].to_string();
				diffs[pointer].text = format!("{kept}{next}");
				diffs.remove(pointer + 1);
				changes = true;
			}
		}
		pointer += 1;
	}
	// A shift may open further merge opportunities.
	if changes {
		cleanup_merge(diffs);
	}
}

/// Reduces the number of edits by eliminating semantically trivial
/// equalities, slides the survivors onto clean boundaries, and extracts
/// overlaps between adjacent delete/insert pairs.
pub fn cleanup_semantic(diffs: &mut Vec<Diff>) {
	let mut changes = false;
	// Indices of candidate equalities, innermost last.
	let mut equalities: Vec<usize> = Vec::new();
	let mut last_equality: Option<String> = None;
	// Byte counts of edits seen before and after the candidate equality.
	let mut len_insertions1 = 0;
	let mut len_deletions1 = 0;
	let mut len_insertions2 = 0;
	let mut len_deletions2 = 0;

	let mut pointer: isize = 0;
	while pointer < diffs.len() as isize {
		let i = pointer as usize;
		match diffs[i].op {
			Op::Equal => {
				equalities.push(i);
				len_insertions1 = len_insertions2;
				len_deletions1 = len_deletions2;
				len_insertions2 = 0;
				len_deletions2 = 0;
				last_equality = Some(diffs[i].text.clone());
			}
			op => {
				match op {
					Op::Insert => len_insertions2 += diffs[i].text.len(),
					Op::Delete => len_deletions2 += diffs[i].text.len(),
					// A reclassified equality counts on both sides.
					_ => {
						len_insertions2 += diffs[i].text.len();
						len_deletions2 += diffs[i].text.len();
					}
				}
				// An equality smaller than the edits on both of its sides is
				// not worth keeping.
				if last_equality.as_ref().is_some_and(|eq| {
					!eq.is_empty()
						&& eq.len() <= len_insertions1.max(len_deletions1)
						&& eq.len() <= len_insertions2.max(len_deletions2)
				}) {
					let index = *equalities.last().expect("candidate equality is on the stack");
					diffs[index].op = Op::DeleteInsert;
					// Throw away the equality just reclassified, and the
					// previous one: it needs to be reevaluated.
					equalities.pop();
					equalities.pop();
					pointer = equalities.last().map(|&idx| idx as isize).unwrap_or(-1);
					len_insertions1 = 0;
					len_deletions1 = 0;
					len_insertions2 = 0;
					len_deletions2 = 0;
					last_equality = None;
					changes = true;
				}
			}
		}
		pointer += 1;
	}

	if changes {
		cleanup_merge(diffs);
	}
	cleanup_semantic_lossless(diffs);

	// Find overlaps between adjacent deletions and insertions, e.g.
	// -abcxxx +xxxdef is better read as -abc =xxx +def.
	let mut pointer = 1;
	while pointer < diffs.len() {
		if diffs[pointer - 1].op == Op::Delete && diffs[pointer].op == Op::Insert {
			let deletion = diffs[pointer - 1].text.clone();
			let insertion = diffs[pointer].text.clone();
			let overlap1 = common_overlap(&deletion, &insertion);
			let overlap2 = common_overlap(&insertion, &deletion);
			if overlap1 >= overlap2 {
				let overlap_chars = char_count(&insertion[..overlap1]);
				if overlap_chars * 2 >= char_count(&deletion) || overlap_chars * 2 >= char_count(&insertion) {
					// Overlap found. Insert an equality and trim the edits.
					diffs.insert(pointer, Diff::equal(&insertion[..overlap1]));
					diffs[pointer - 1].text = deletion[..deletion.len() - overlap1].to_string();
					diffs[pointer + 1].text = insertion[overlap1..].to_string();
					pointer += 1;
				}
			} else {
				let overlap_chars = char_count(&deletion[..overlap2]);
				if overlap_chars * 2 >= char_count(&deletion) || overlap_chars * 2 >= char_count(&insertion) {
					// Reverse overlap. Insert an equality and swap and trim the edits.
					diffs.insert(pointer, Diff::equal(&deletion[..overlap2]));
					diffs[pointer - 1] = Diff::insert(insertion[..insertion.len() - overlap2].to_string());
					diffs[pointer + 1] = Diff::delete(deletion[overlap2..].to_string());
					pointer += 1;
				}
			}
			pointer += 1;
		}
		pointer += 1;
	}
}

/// Slides edits sideways to align them with word, line, or paragraph
/// boundaries, without changing what the script spells out. Reruns until no
/// edit moves anymore.
pub fn cleanup_semantic_lossless(diffs: &mut Vec<Diff>) {
	loop {
		let mut changes = false;
		let mut pointer = 1;
		while pointer + 1 < diffs.len() {
			if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
				let mut equality1 = diffs[pointer - 1].text.clone();
				let mut edit = diffs[pointer].text.clone();
				let mut equality2 = diffs[pointer + 1].text.clone();

				// First, shift the edit as far left as possible.
				let common_offset = common_suffix(&equality1, &edit);
				if common_offset > 0 {
					let common = edit[edit.len() - common_offset..].to_string();
					equality1.truncate(equality1.len() - common_offset);
					edit.truncate(edit.len() - common_offset);
					edit.insert_str(0, &common);
					equality2.insert_str(0, &common);
				}

				// Then step code point by code point right, looking for the
				// best scoring boundary.
				let mut best_equality1 = equality1.clone();
				let mut best_edit = edit.clone();
				let mut best_equality2 = equality2.clone();
				let mut best_score = semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
				loop {
					let Some(c) = edit.chars().next() else { break };
					if equality2.chars().next() != Some(c) {
						break;
					}
					equality1.push(c);
					edit.drain(..c.len_utf8());
					edit.push(c);
					equality2.drain(..c.len_utf8());
					let score = semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
					// The >= favors shifting the edit to the right.
					if score >= best_score {
						best_score = score;
						best_equality1 = equality1.clone();
						best_edit = edit.clone();
						best_equality2 = equality2.clone();
					}
				}

				if diffs[pointer - 1].text != best_equality1 {
					// An improvement was found, apply it.
					if !best_equality1.is_empty() {
						diffs[pointer - 1].text = best_equality1;
					} else {
						diffs.remove(pointer - 1);
						pointer -= 1;
					}
					diffs[pointer].text = best_edit;
					if !best_equality2.is_empty() {
						diffs[pointer + 1].text = best_equality2;
					} else {
						diffs.remove(pointer + 1);
					}
					changes = true;
				}
			}
			pointer += 1;
		}
		if !changes {
			break;
		}
	}
}

// Scores how nicely the boundary between `one` and `two` falls on semantic
// structure, 0 (inside a word) to 6 (at a text edge).
fn semantic_score(one: &str, two: &str) -> u32 {
	let (Some(char1), Some(char2)) = (one.chars().next_back(), two.chars().next()) else {
		// Edges are the best.
		return 6;
	};

	let non_alnum1 = !char1.is_alphanumeric();
	let whitespace1 = non_alnum1 && char1.is_whitespace();
	let line_break1 = whitespace1 && char1.is_control();
	let blank_line1 = line_break1 && RE_BLANK_LINE_END.is_match(one);

	let non_alnum2 = !char2.is_alphanumeric();
	let whitespace2 = non_alnum2 && char2.is_whitespace();
	let line_break2 = whitespace2 && char2.is_control();
	let blank_line2 = line_break2 && RE_BLANK_LINE_START.is_match(two);

	if blank_line1 || blank_line2 {
		5
	} else if line_break1 || line_break2 {
		4
	} else if non_alnum1 && !whitespace1 && whitespace2 {
		// End of sentences.
		3
	} else if whitespace1 || whitespace2 {
		2
	} else if non_alnum1 || non_alnum2 {
		1
	} else {
		0
	}
}

/// Reduces the number of edits by eliminating operationally trivial
/// equalities shorter than `edit_cost` code points (see
/// [`DEFAULT_EDIT_COST`]).
pub fn cleanup_efficiency(diffs: &mut Vec<Diff>, edit_cost: usize) {
	let mut changes = false;
	// Indices of candidate equalities, innermost last.
	let mut equalities: Vec<usize> = Vec::new();
	let mut last_equality: Option<String> = None;
	// Is there an insertion/deletion before/after the candidate equality.
	let mut pre_ins = false;
	let mut pre_del = false;
	let mut post_ins = false;
	let mut post_del = false;

	let mut pointer: isize = 0;
	while pointer < diffs.len() as isize {
		let i = pointer as usize;
		if diffs[i].op == Op::Equal {
			if char_count(&diffs[i].text) < edit_cost && (post_ins || post_del) {
				// Candidate found.
				equalities.push(i);
				pre_ins = post_ins;
				pre_del = post_del;
				last_equality = Some(diffs[i].text.clone());
			} else {
				// Not a candidate, and can never become one.
				equalities.clear();
				last_equality = None;
			}
			post_ins = false;
			post_del = false;
		} else {
			match diffs[i].op {
				Op::Delete => post_del = true,
				Op::Insert => post_ins = true,
				_ => {
					post_del = true;
					post_ins = true;
				}
			}
			// An equality bracketed by four distinct edits is always worth
			// splitting; three suffice when it is under half the edit cost.
			let bracket_count =
				pre_ins as usize + pre_del as usize + post_ins as usize + post_del as usize;
			if last_equality.as_ref().is_some_and(|eq| {
				!eq.is_empty()
					&& ((pre_ins && pre_del && post_ins && post_del)
						|| (char_count(eq) < edit_cost / 2 && bracket_count == 3))
			}) {
				let index = *equalities.last().expect("candidate equality is on the stack");
				diffs[index].op = Op::DeleteInsert;
				equalities.pop();
				last_equality = None;
				if pre_ins && pre_del {
					// No rewind needed: nothing earlier can have been affected.
					post_ins = true;
					post_del = true;
					equalities.clear();
				} else {
					// Rewind to reevaluate the previous equality.
					equalities.pop();
					pointer = equalities.last().map(|&idx| idx as isize).unwrap_or(-1);
					post_ins = false;
					post_del = false;
				}
				changes = true;
			}
		}
		pointer += 1;
	}

	if changes {
		cleanup_merge(diffs);
	}
}

// region:    --- Tests


// endregion: --- Tests
