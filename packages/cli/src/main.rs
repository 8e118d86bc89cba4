mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{compile, format, render, CompileArgs, FormatArgs, RenderArgs};
use tracing_subscriber::EnvFilter;

/// Stencil CLI - compile, format and render Cila documents
#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a .cila file to Cila, HTML or a JSON tree
    Compile(CompileArgs),

    /// Rewrite .cila files in canonical form
    Format(FormatArgs),

    /// Render a .cila file against JSON data
    Render(RenderArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Compile(args) => compile(args, &cwd),
        Command::Format(args) => format(args, &cwd),
        Command::Render(args) => render(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
