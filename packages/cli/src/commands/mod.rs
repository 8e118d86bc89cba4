pub mod compile;
pub mod format;
pub mod render;

pub use compile::{compile, CompileArgs};
pub use format::{format, FormatArgs};
pub use render::{render, RenderArgs};

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of Cila source files
pub const CILA_EXTENSION: &str = "cila";

/// Resolve a path argument against the working directory and read it
pub fn read_source(path: &str, cwd: &str) -> Result<(PathBuf, String)> {
    let path = PathBuf::from(cwd).join(path);
    if !path.is_file() {
        return Err(anyhow!("File does not exist: {}", path.display()));
    }
    let source = std::fs::read_to_string(&path)?;
    Ok((path, source))
}

pub fn find_cila_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some(CILA_EXTENSION))
        .collect();
    files.sort();
    files
}
