use regex::Regex;

use crate::error::PatchError;
use crate::types::{Block, BlockKind};

/// A block whose start marker was scanned but whose body never completed.
#[derive(Debug)]
pub struct ScanFailure {
    pub target: String,
    pub error: PatchError,
}

/// Splits an input stream into typed blocks, in document order.
///
/// Text outside any recognized block is model prose and is silently skipped.
/// An unterminated block (end of stream, or another start marker before the
/// end marker) is yielded as a failure; scanning resumes at the line that cut
/// it short, so a single malformed block never swallows the rest of the run.
pub struct BlockScanner<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    replace_start: Regex,
    patch_start: Regex,
    delete: Regex,
    block_end: Regex,
}

impl<'a> BlockScanner<'a> {
    pub fn new(input: &'a str) -> Self {
        BlockScanner {
            lines: input.split_inclusive('\n').collect(),
            pos: 0,
            replace_start: Regex::new(r"(?i)^##\s*replace-start:\s*(\S+)")
                .expect("hardcoded pattern"),
            patch_start: Regex::new(r"(?i)^##\s*patch-start:\s*(\S+)")
                .expect("hardcoded pattern"),
            delete: Regex::new(r"(?i)^##\s*delete:\s*(\S+)").expect("hardcoded pattern"),
            block_end: Regex::new(r"(?i)^##\s*(?:patch|replace)-end").expect("hardcoded pattern"),
        }
    }

    /// Collects body lines until an end marker. Payload keeps every line
    /// verbatim, ending in exactly one newline; the delimiter lines are
    /// dropped. A new start marker is left unconsumed for the next iteration.
    fn collect_body(&mut self, target: String, kind: BlockKind) -> Result<Block, ScanFailure> {
        let mut payload = String::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            if self.block_end.is_match(line) {
                self.pos += 1;
                if !payload.is_empty() && !payload.ends_with('\n') {
                    payload.push('\n');
                }
                return Ok(Block {
                    kind,
                    target,
                    payload,
                });
            }
            if self.replace_start.is_match(line) || self.patch_start.is_match(line) {
                return Err(ScanFailure {
                    target,
                    error: PatchError::MalformedBlock,
                });
            }
            payload.push_str(line);
            self.pos += 1;
        }
        Err(ScanFailure {
            target,
            error: PatchError::MalformedBlock,
        })
    }
}

impl<'a> Iterator for BlockScanner<'a> {
    type Item = Result<Block, ScanFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            self.pos += 1;

            if let Some(caps) = self.delete.captures(line) {
                return Some(Ok(Block {
                    kind: BlockKind::Delete,
                    target: caps[1].to_string(),
                    payload: String::new(),
                }));
            }
            if let Some(caps) = self.replace_start.captures(line) {
                return Some(self.collect_body(caps[1].to_string(), BlockKind::Replace));
            }
            if let Some(caps) = self.patch_start.captures(line) {
                return Some(self.collect_body(caps[1].to_string(), BlockKind::Patch));
            }
        }
        None
    }
}
