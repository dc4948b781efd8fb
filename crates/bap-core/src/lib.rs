pub mod applier;
pub mod error;
pub mod operations;
pub mod parser;
pub mod scanner;
pub mod types;

pub use applier::apply_hunks;
pub use error::PatchError;
pub use operations::{apply_block, apply_blocks, resolve_target, ApplyOptions};
pub use parser::parse_hunks;
pub use scanner::{BlockScanner, ScanFailure};
pub use types::{Block, BlockKind, Hunk, HunkLine, Outcome, PatchResult};
