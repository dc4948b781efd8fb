use std::fmt;

use crate::error::PatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Replace,
    Patch,
    Delete,
}

/// One delimited unit of patch instruction, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    /// Relative path exactly as written in the marker line. Validation and
    /// root resolution happen in `operations`, not here.
    pub target: String,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HunkLine {
    Context(String),
    Add(String),
    Remove(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<HunkLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Written,
    Deleted,
    SkippedDryRun,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Written => "written",
            Outcome::Deleted => "deleted",
            Outcome::SkippedDryRun => "skipped (dry-run)",
            Outcome::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Per-block outcome, emitted in input order.
///
/// `reason` carries the error text for failures and the would-do summary for
/// dry-run outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchResult {
    pub target: String,
    pub outcome: Outcome,
    pub reason: Option<String>,
}

impl PatchResult {
    pub fn ok(target: String, outcome: Outcome, reason: Option<String>) -> Self {
        PatchResult {
            target,
            outcome,
            reason,
        }
    }

    pub fn failed(target: String, error: &PatchError) -> Self {
        PatchResult {
            target,
            outcome: Outcome::Failed,
            reason: Some(error.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::Failed
    }
}

impl fmt::Display for PatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Failed => write!(
                f,
                "{}: failed: {}",
                self.target,
                self.reason.as_deref().unwrap_or("unknown error")
            ),
            ref outcome => write!(f, "{}: {}", self.target, outcome),
        }
    }
}
