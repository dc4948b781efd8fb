use crate::error::PatchError;
use crate::types::{Hunk, HunkLine};

/// Applies every hunk in order, each hunk's output feeding the next.
///
/// A cumulative drift counter tracks how many lines earlier hunks added or
/// removed, so a later hunk's declared offset is corrected before its context
/// is checked. Any hunk that cannot be anchored fails the whole patch.
pub fn apply_hunks(content: &str, hunks: &[Hunk]) -> Result<String, PatchError> {
    // Lines are handled without terminators; the original trailing-newline
    // state is restored on output. An empty original counts as terminated so
    // pure insertions produce a terminated file.
    let trailing_newline = content.is_empty() || content.ends_with('\n');
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

    let mut drift: isize = 0;
    for (idx, hunk) in hunks.iter().enumerate() {
        drift = apply_hunk(&mut lines, hunk, drift, idx + 1)?;
    }

    let mut patched = lines.join("\n");
    if trailing_newline && !patched.is_empty() {
        patched.push('\n');
    }
    Ok(patched)
}

fn apply_hunk(
    lines: &mut Vec<String>,
    hunk: &Hunk,
    drift: isize,
    hunk_no: usize,
) -> Result<isize, PatchError> {
    let expected: Vec<&str> = hunk
        .lines
        .iter()
        .filter_map(|line| match line {
            HunkLine::Context(text) | HunkLine::Remove(text) => Some(text.as_str()),
            HunkLine::Add(_) => None,
        })
        .collect();

    let replacement: Vec<String> = hunk
        .lines
        .iter()
        .filter_map(|line| match line {
            HunkLine::Context(text) | HunkLine::Add(text) => Some(text.clone()),
            HunkLine::Remove(_) => None,
        })
        .collect();

    // Pure insertion: nothing to match, anchor at the declared new position.
    if expected.is_empty() {
        let at = hunk.new_start.saturating_sub(1).min(lines.len());
        let added = replacement.len() as isize;
        lines.splice(at..at, replacement);
        return Ok(drift + added);
    }

    let declared = hunk.old_start.saturating_sub(1) as isize;
    let predicted = (declared + drift).max(0) as usize;

    let anchor = locate(lines, &expected, predicted)
        .ok_or(PatchError::ContextMismatch { hunk: hunk_no })?;

    let removed = expected.len() as isize;
    let added = replacement.len() as isize;
    lines.splice(anchor..anchor + expected.len(), replacement);
    Ok(drift + added - removed)
}

/// Finds where `expected` matches `lines`, nearest to `predicted` first.
///
/// The search walks outward one offset at a time over the whole file; at
/// equal distance the forward candidate is probed before the backward one.
fn locate(lines: &[String], expected: &[&str], predicted: usize) -> Option<usize> {
    if expected.len() > lines.len() {
        return None;
    }
    let last = lines.len() - expected.len();
    let predicted = predicted.min(last);

    if matches_at(lines, expected, predicted) {
        return Some(predicted);
    }
    for distance in 1..=last.max(predicted) {
        let forward = predicted + distance;
        if forward <= last && matches_at(lines, expected, forward) {
            return Some(forward);
        }
        if distance <= predicted && matches_at(lines, expected, predicted - distance) {
            return Some(predicted - distance);
        }
    }
    None
}

fn matches_at(lines: &[String], expected: &[&str], at: usize) -> bool {
    lines[at..at + expected.len()]
        .iter()
        .zip(expected)
        .all(|(have, want)| have == want)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hunk(old_start: usize, old_len: usize, new_start: usize, new_len: usize, lines: Vec<HunkLine>) -> Hunk {
        Hunk {
            old_start,
            old_len,
            new_start,
            new_len,
            lines,
        }
    }

    #[test]
    fn test_apply_addition_at_declared_offset() {
        let content = "fn main() {\n    run();\n}\n";
        let hunks = vec![hunk(
            1,
            2,
            1,
            3,
            vec![
                HunkLine::Context("fn main() {".to_string()),
                HunkLine::Add("    init();".to_string()),
                HunkLine::Context("    run();".to_string()),
            ],
        )];
        let patched = apply_hunks(content, &hunks).unwrap();
        assert_eq!(patched, "fn main() {\n    init();\n    run();\n}\n");
    }

    #[test]
    fn test_apply_removal() {
        let content = "a\nb\nc\n";
        let hunks = vec![hunk(
            1,
            3,
            1,
            2,
            vec![
                HunkLine::Context("a".to_string()),
                HunkLine::Remove("b".to_string()),
                HunkLine::Context("c".to_string()),
            ],
        )];
        assert_eq!(apply_hunks(content, &hunks).unwrap(), "a\nc\n");
    }

    #[test]
    fn test_drift_carried_across_hunks() {
        // The second hunk's header still points at the pre-patch line
        // numbers; the drift from the first hunk corrects it.
        let content = "one\ntwo\nthree\nfour\nfive\nsix\n";
        let hunks = vec![
            hunk(
                1,
                2,
                1,
                4,
                vec![
                    HunkLine::Context("one".to_string()),
                    HunkLine::Add("one-and-a-half".to_string()),
                    HunkLine::Add("one-and-three-quarters".to_string()),
                    HunkLine::Context("two".to_string()),
                ],
            ),
            hunk(
                5,
                2,
                7,
                2,
                vec![
                    HunkLine::Remove("five".to_string()),
                    HunkLine::Add("FIVE".to_string()),
                    HunkLine::Context("six".to_string()),
                ],
            ),
        ];
        let patched = apply_hunks(content, &hunks).unwrap();
        assert_eq!(
            patched,
            "one\none-and-a-half\none-and-three-quarters\ntwo\nthree\nfour\nFIVE\nsix\n"
        );
    }

    #[test]
    fn test_stale_offset_recovered_by_search() {
        // Header says line 1 but the context actually lives at line 4.
        let content = "x\ny\nz\nalpha\nbeta\n";
        let hunks = vec![hunk(
            1,
            2,
            1,
            2,
            vec![
                HunkLine::Context("alpha".to_string()),
                HunkLine::Remove("beta".to_string()),
                HunkLine::Add("gamma".to_string()),
            ],
        )];
        let patched = apply_hunks(content, &hunks).unwrap();
        assert_eq!(patched, "x\ny\nz\nalpha\ngamma\n");
    }

    #[test]
    fn test_no_anchor_anywhere_is_context_mismatch() {
        let content = "completely\nunrelated\nlines\n";
        let hunks = vec![hunk(
            1,
            1,
            1,
            1,
            vec![
                HunkLine::Remove("not here".to_string()),
                HunkLine::Add("never mind".to_string()),
            ],
        )];
        let err = apply_hunks(content, &hunks).unwrap_err();
        assert!(matches!(err, PatchError::ContextMismatch { hunk: 1 }));
    }

    #[test]
    fn test_pure_insertion_anchors_at_new_start() {
        let content = "a\nb\n";
        let hunks = vec![hunk(
            1,
            0,
            2,
            1,
            vec![HunkLine::Add("between".to_string())],
        )];
        assert_eq!(apply_hunks(content, &hunks).unwrap(), "a\nbetween\nb\n");
    }

    #[test]
    fn test_pure_insertion_into_empty_file() {
        let hunks = vec![hunk(
            0,
            0,
            1,
            2,
            vec![
                HunkLine::Add("first".to_string()),
                HunkLine::Add("second".to_string()),
            ],
        )];
        assert_eq!(apply_hunks("", &hunks).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_exact_match_preferred_over_nearer_lookalike() {
        // Identical candidates at lines 1 and 3; a predicted offset of 3
        // must take line 3, not scan from the top of the file.
        let content = "marker\nfiller\nmarker\ntail\n";
        let hunks = vec![hunk(
            3,
            1,
            3,
            1,
            vec![
                HunkLine::Remove("marker".to_string()),
                HunkLine::Add("patched".to_string()),
            ],
        )];
        let patched = apply_hunks(content, &hunks).unwrap();
        assert_eq!(patched, "marker\nfiller\npatched\ntail\n");
    }

    #[test]
    fn test_round_trip_preserves_unrelated_lines() {
        let content = "h1\nh2\nh3\nh4\nh5\nh6\nh7\nh8\n";
        let hunks = vec![hunk(
            4,
            3,
            4,
            3,
            vec![
                HunkLine::Context("h4".to_string()),
                HunkLine::Remove("h5".to_string()),
                HunkLine::Add("H5".to_string()),
                HunkLine::Context("h6".to_string()),
            ],
        )];
        let patched = apply_hunks(content, &hunks).unwrap();
        assert_eq!(patched, "h1\nh2\nh3\nh4\nH5\nh6\nh7\nh8\n");
    }

    #[test]
    fn test_file_without_trailing_newline_stays_unterminated() {
        let content = "a\nb";
        let hunks = vec![hunk(
            1,
            1,
            1,
            1,
            vec![
                HunkLine::Remove("a".to_string()),
                HunkLine::Add("A".to_string()),
            ],
        )];
        assert_eq!(apply_hunks(content, &hunks).unwrap(), "A\nb");
    }
}
