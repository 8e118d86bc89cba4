use super::read_source;
use crate::config::Config;
use anyhow::{anyhow, Context as _, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use stencil_compiler_html::compile_to_html;
use stencil_evaluator::{scrub, strip, Evaluator, MapContext, MemoryResolver};
use stencil_parser::{parse, Serializer};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Cila file to render
    pub file: String,

    /// JSON file with the data to render against
    #[arg(short, long)]
    pub data: Option<String>,

    /// Include address and the Cila file it resolves to, as `name=path`
    #[arg(short, long = "include", value_name = "NAME=PATH")]
    pub includes: Vec<String>,

    /// Emit HTML
    #[arg(long)]
    pub html: bool,

    /// Pretty print HTML
    #[arg(long, requires = "html")]
    pub pretty: bool,

    /// Number of render passes (overrides config)
    #[arg(short, long)]
    pub passes: Option<usize>,

    /// Remove directives and flags from the output
    #[arg(long, conflicts_with = "scrub")]
    pub strip: bool,

    /// Remove completed directives from the output
    #[arg(long)]
    pub scrub: bool,
}

/// Render a Cila file against JSON data and write the result to stdout
pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let (path, source) = read_source(&args.file, cwd)?;

    let mut context = match &args.data {
        Some(data) => {
            let data_path = PathBuf::from(cwd).join(data);
            let content = fs::read_to_string(&data_path)
                .with_context(|| format!("Cannot read data file {}", data_path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&content)?;
            MapContext::from_json(value)?
        }
        None => MapContext::new(),
    };

    let mut resolver = MemoryResolver::new();
    let mut includes = config.include_paths(cwd);
    for include in &args.includes {
        let (address, file) = include
            .split_once('=')
            .ok_or_else(|| anyhow!("Include must be given as name=path: {}", include))?;
        includes.push((address.to_string(), PathBuf::from(cwd).join(file)));
    }
    for (address, file) in includes {
        let content = fs::read_to_string(&file)
            .with_context(|| format!("Cannot read include {} from {}", address, file.display()))?;
        resolver.insert_cila(address, &content);
    }

    let passes = args.passes.unwrap_or(config.passes).max(1);
    tracing::info!(path = %path.display(), passes, includes = resolver.len(), "rendering");

    let mut document = parse(&source);
    let mut evaluator = Evaluator::with_resolver(&resolver);
    for _ in 0..passes {
        evaluator.render(&mut document, &mut context)?;
    }

    let root = document.root();
    for node in document.filter_attr(root, "data-error") {
        if let Some(message) = document.attr(node, "data-error") {
            eprintln!("  {} <{}> {}", "✗".red(), document.name(node), message.red());
        }
    }

    if args.strip {
        strip(&mut document, root);
    } else if args.scrub {
        scrub(&mut document, root);
    }

    let output = if args.html {
        let mut options = config.html.clone();
        options.pretty |= args.pretty;
        compile_to_html(&document, &options)?
    } else {
        Serializer::with_indent(&config.indent).serialize(&document)
    };
    println!("{}", output);

    Ok(())
}
