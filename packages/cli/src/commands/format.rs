use super::{find_cila_files, read_source};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use stencil_parser::{parse, Serializer};

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Cila file, or a directory to format every Cila file in
    #[arg(default_value = ".")]
    pub path: String,

    /// Rewrite files in place instead of printing
    #[arg(short, long)]
    pub write: bool,

    /// Fail if any file is not already formatted
    #[arg(long, conflicts_with = "write")]
    pub check: bool,
}

/// Regenerate Cila in canonical form
pub fn format(args: FormatArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let target = PathBuf::from(cwd).join(&args.path);

    if target.is_file() {
        let (path, source) = read_source(&args.path, cwd)?;
        let formatted = format_source(&source, &config);
        if args.check {
            return check_file(&path, &source, &formatted);
        }
        if args.write {
            write_file(&path, &source, &formatted)?;
        } else {
            println!("{}", formatted);
        }
        return Ok(());
    }

    if !target.is_dir() {
        return Err(anyhow!("Path does not exist: {}", target.display()));
    }

    let files = find_cila_files(&target);
    if files.is_empty() {
        println!("{}", "No .cila files found".yellow());
        return Ok(());
    }

    let mut unformatted = 0;
    for file in &files {
        let source = fs::read_to_string(file)?;
        let formatted = format_source(&source, &config);
        let relative = file.strip_prefix(&target).unwrap_or(file);
        if args.write {
            if write_file(file, &source, &formatted)? {
                println!("  {} {}", "✓".green(), relative.display());
            }
        } else if formatted.trim_end() != source.trim_end() {
            unformatted += 1;
            println!("  {} {}", "✗".red(), relative.display());
        }
    }

    if unformatted > 0 && (args.check || !args.write) {
        return Err(anyhow!("{} of {} files need formatting", unformatted, files.len()));
    }
    Ok(())
}

fn format_source(source: &str, config: &Config) -> String {
    Serializer::with_indent(&config.indent).serialize(&parse(source))
}

fn check_file(path: &Path, source: &str, formatted: &str) -> Result<()> {
    if formatted.trim_end() == source.trim_end() {
        Ok(())
    } else {
        Err(anyhow!("{} needs formatting", path.display()))
    }
}

/// Returns whether the file changed
fn write_file(path: &Path, source: &str, formatted: &str) -> Result<bool> {
    if formatted.trim_end() == source.trim_end() {
        return Ok(false);
    }
    fs::write(path, format!("{}\n", formatted))?;
    Ok(true)
}
