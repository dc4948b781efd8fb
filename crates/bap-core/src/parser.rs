use regex::Regex;

use crate::error::PatchError;
use crate::types::{Hunk, HunkLine};

/// Parses the unified-diff payload of one patch block into ordered hunks.
///
/// Counts omitted from a `@@` header default to 1. File headers and prose
/// before the first hunk are skipped. Inside a hunk, any line whose leading
/// character is not `-`, `+`, space, or `\` fails the whole block: a patch
/// either parses completely or not at all.
pub fn parse_hunks(payload: &str) -> Result<Vec<Hunk>, PatchError> {
    let header = Regex::new(r"^@@\s+-(\d+)(?:,(\d+))?\s+\+(\d+)(?:,(\d+))?\s+@@")
        .expect("hardcoded pattern");

    let mut hunks: Vec<Hunk> = Vec::new();

    for raw in payload.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\n', '\r']);

        if let Some(caps) = header.captures(line) {
            hunks.push(Hunk {
                old_start: capture_number(&caps, 1)?,
                old_len: optional_number(&caps, 2)?,
                new_start: capture_number(&caps, 3)?,
                new_len: optional_number(&caps, 4)?,
                lines: Vec::new(),
            });
            continue;
        }

        let current = match hunks.last_mut() {
            Some(hunk) => hunk,
            None => {
                // File headers and any prose before the first hunk.
                continue;
            }
        };

        match line.chars().next() {
            Some('-') => current.lines.push(HunkLine::Remove(line[1..].to_string())),
            Some('+') => current.lines.push(HunkLine::Add(line[1..].to_string())),
            Some(' ') => current.lines.push(HunkLine::Context(line[1..].to_string())),
            // "\ No newline at end of file"
            Some('\\') => {}
            None => current.lines.push(HunkLine::Context(String::new())),
            Some(other) => {
                return Err(PatchError::MalformedHunk(format!(
                    "unexpected leading character {:?} in hunk line {:?}",
                    other, line
                )));
            }
        }
    }

    Ok(hunks)
}

fn capture_number(caps: &regex::Captures<'_>, group: usize) -> Result<usize, PatchError> {
    caps.get(group)
        .map(|m| m.as_str())
        .unwrap_or("")
        .parse::<usize>()
        .map_err(|_| PatchError::MalformedHunk(format!("bad number in hunk header: {:?}", &caps[0])))
}

fn optional_number(caps: &regex::Captures<'_>, group: usize) -> Result<usize, PatchError> {
    match caps.get(group) {
        Some(m) => m
            .as_str()
            .parse::<usize>()
            .map_err(|_| {
                PatchError::MalformedHunk(format!("bad number in hunk header: {:?}", &caps[0]))
            }),
        None => Ok(1),
    }
}
