use std::path::PathBuf;

use thiserror::Error;

/// Everything that can fail while interpreting or applying a block.
/// Display output leads with the kind token: `failed: ContextMismatch: ...`.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("MalformedBlock: start marker has no matching end marker")]
    MalformedBlock,

    #[error("MalformedHunk: {0}")]
    MalformedHunk(String),

    #[error("ContextMismatch: hunk #{hunk} matched nowhere in the target file")]
    ContextMismatch { hunk: usize },

    #[error("TargetNotFound: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("UnsafePath: {0:?} escapes the project root")]
    UnsafePath(String),

    #[error("IOFailure: {0}")]
    Io(#[from] std::io::Error),
}
