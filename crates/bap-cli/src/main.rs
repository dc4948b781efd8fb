use anyhow::Result;
use bap_core::{apply_blocks, ApplyOptions, Outcome};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut patch_file = None;
    let mut dry_run = false;
    let mut root = PathBuf::from(".");
    let mut help = false;

    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        if arg == "--dry-run" {
            dry_run = true;
        } else if arg == "--root" {
            match iter.next() {
                Some(dir) => root = PathBuf::from(dir),
                None => {
                    eprintln!("Error: --root requires a directory argument.");
                    process::exit(1);
                }
            }
        } else if arg == "--help" || arg == "-h" {
            help = true;
        } else {
            patch_file = Some(arg.clone());
        }
    }

    if help {
        println!("Usage: bap [PATCH_FILE] [--root DIR] [--dry-run]");
        println!("Apply patch blocks (## replace/patch/delete markers) to a source tree.");
        return Ok(());
    }

    let input = if let Some(path) = patch_file {
        fs::read_to_string(&path).unwrap_or_else(|_| {
            eprintln!("Error: Patch file not found at '{}'", path);
            process::exit(1);
        })
    } else {
        if atty::is(atty::Stream::Stdin) {
            eprintln!("Error: No patch file specified and no data piped from stdin.");
            process::exit(1);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let results = apply_blocks(&input, &ApplyOptions { root, dry_run });

    if results.is_empty() {
        println!("No patch blocks found in the input.");
        return Ok(());
    }

    let mut fail_count = 0;
    for result in &results {
        println!("{}", result);
        if result.outcome == Outcome::SkippedDryRun {
            if let Some(detail) = &result.reason {
                println!("    {}", detail);
            }
        }
        if result.is_failure() {
            fail_count += 1;
        }
    }

    println!("\n--- Summary ---");
    println!("Total blocks: {}", results.len());
    println!("Succeeded:    {}", results.len() - fail_count);
    println!("Failed:       {}", fail_count);

    if fail_count > 0 {
        process::exit(1);
    }

    Ok(())
}
