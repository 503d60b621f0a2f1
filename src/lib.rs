pub mod config;
pub mod docx;
pub mod error;
pub mod export;
pub mod inline;
pub mod ir;
pub mod layout;
pub mod metrics;
pub mod normalize;
pub mod parse;
pub mod pdf;
pub mod sanitize;

pub use error::{ExportError, Result};
pub use export::{export, ExportFormat, ExportedFile};
pub use inline::strip_inline;
pub use ir::Block;
pub use parse::parse_to_blocks;

use regex::Regex;
use std::io;
use std::path::PathBuf;
use std::sync::LazyLock;

static RE_MARKDOWN_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(md|markdown)$").unwrap());

fn is_markdown(path: &std::path::Path) -> bool {
    path.to_str().is_some_and(|s| RE_MARKDOWN_FILE.is_match(s))
}

/// Collects markdown files from files and directories, recursively, sorted.
pub fn list_files(inputs: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut out: Vec<PathBuf> = Vec::new();

    for p in inputs {
        if p.is_dir() {
            for entry in std::fs::read_dir(p)? {
                let sub_path = entry?.path();
                if sub_path.is_dir() {
                    out.extend(list_files(&[sub_path])?);
                } else if sub_path.is_file() && is_markdown(&sub_path) {
                    out.push(sub_path);
                }
            }
        } else if p.is_file() && is_markdown(p) {
            out.push(p.clone());
        }
    }

    out.sort();
    Ok(out)
}
