use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::applier::apply_hunks;
use crate::error::PatchError;
use crate::parser::parse_hunks;
use crate::scanner::BlockScanner;
use crate::types::{Block, BlockKind, Outcome, PatchResult};

/// Run-level configuration, threaded explicitly through every call.
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// All block targets resolve relative to this directory.
    pub root: PathBuf,
    /// Compute and report everything, persist nothing.
    pub dry_run: bool,
}

/// Scans `input` and applies every block in document order.
///
/// Block outcomes are independent: a failure is recorded and the run moves
/// on. The caller decides what "overall success" means (no failures).
pub fn apply_blocks(input: &str, opts: &ApplyOptions) -> Vec<PatchResult> {
    let mut results = Vec::new();
    for scanned in BlockScanner::new(input) {
        let result = match scanned {
            Ok(block) => apply_block(&block, opts),
            Err(failure) => PatchResult::failed(failure.target, &failure.error),
        };
        results.push(result);
    }
    results
}

pub fn apply_block(block: &Block, opts: &ApplyOptions) -> PatchResult {
    match run_block(block, opts) {
        Ok((outcome, detail)) => PatchResult::ok(block.target.clone(), outcome, detail),
        Err(error) => PatchResult::failed(block.target.clone(), &error),
    }
}

fn run_block(block: &Block, opts: &ApplyOptions) -> Result<(Outcome, Option<String>), PatchError> {
    let path = resolve_target(&opts.root, &block.target)?;

    match block.kind {
        BlockKind::Replace => {
            if opts.dry_run {
                return Ok((
                    Outcome::SkippedDryRun,
                    Some(format!("would write {} bytes", block.payload.len())),
                ));
            }
            write_file(&path, &block.payload)?;
            Ok((Outcome::Written, None))
        }
        BlockKind::Patch => {
            let current = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(error) if error.kind() == ErrorKind::NotFound => {
                    return Err(PatchError::TargetNotFound(PathBuf::from(&block.target)));
                }
                Err(error) => return Err(error.into()),
            };
            let hunks = parse_hunks(&block.payload)?;
            let patched = apply_hunks(&current, &hunks)?;
            if opts.dry_run {
                return Ok((
                    Outcome::SkippedDryRun,
                    Some(format!(
                        "would apply {} hunk(s), result {} lines",
                        hunks.len(),
                        patched.lines().count()
                    )),
                ));
            }
            fs::write(&path, patched)?;
            Ok((Outcome::Written, None))
        }
        BlockKind::Delete => {
            if opts.dry_run {
                let detail = if path.exists() {
                    "would delete"
                } else {
                    "not present, no-op"
                };
                return Ok((Outcome::SkippedDryRun, Some(detail.to_string())));
            }
            match fs::remove_file(&path) {
                Ok(()) => {}
                // Deleting what is already gone is a success.
                Err(error) if error.kind() == ErrorKind::NotFound => {}
                Err(error) => return Err(error.into()),
            }
            Ok((Outcome::Deleted, None))
        }
    }
}

fn write_file(path: &Path, payload: &str) -> Result<(), PatchError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, payload)?;
    Ok(())
}

/// Resolves a block target against the project root, lexically (no symlink
/// chasing; the target may not exist yet). Absolute paths and any `..` that
/// climbs above the root are rejected before touching the filesystem.
pub fn resolve_target(root: &Path, target: &str) -> Result<PathBuf, PatchError> {
    let mut resolved = PathBuf::new();
    for component in Path::new(target).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return Err(PatchError::UnsafePath(target.to_string()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(PatchError::UnsafePath(target.to_string()));
            }
        }
    }
    Ok(root.join(resolved))
}
