use super::read_source;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use stencil_compiler_html::compile_to_html;
use stencil_parser::{parse, Serializer};

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Cila file to compile
    pub file: String,

    /// Emit HTML
    #[arg(long, conflicts_with = "json")]
    pub html: bool,

    /// Emit the document tree as JSON
    #[arg(long)]
    pub json: bool,

    /// Pretty print the output
    #[arg(long)]
    pub pretty: bool,
}

/// Compile a Cila file and write the result to stdout
///
/// Without `--html` or `--json` the compiled tree is generated back as
/// canonical Cila.
pub fn compile(args: CompileArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let (path, source) = read_source(&args.file, cwd)?;
    tracing::debug!(path = %path.display(), "compiling");

    let document = parse(&source);

    let output = if args.html {
        let mut options = config.html.clone();
        options.pretty |= args.pretty;
        compile_to_html(&document, &options)?
    } else if args.json {
        if args.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        }
    } else {
        Serializer::with_indent(&config.indent).serialize(&document)
    };

    println!("{}", output);
    Ok(())
}
