//! md2puki - Markdown to PukiWiki converter

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use md2puki::{ParseOptions, Renderer, parse_document};

#[derive(Parser)]
#[command(name = "md2puki")]
#[command(version, about = "Convert Markdown to PukiWiki markup", long_about = None)]
#[command(after_help = "EXAMPLES:
    md2puki README.md                Print PukiWiki markup to stdout
    md2puki notes.md -o notes.txt    Write to a file
    cat a.md | md2puki --gfm         Read stdin, enable all extensions")]
struct Cli {
    /// Markdown input (`-` or omitted for stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Enable every supported markdown extension
    #[arg(long)]
    gfm: bool,

    /// Parse ~~strikethrough~~
    #[arg(long)]
    strikethrough: bool,

    /// Parse task list checkboxes
    #[arg(long)]
    tasklists: bool,

    /// Parse footnotes
    #[arg(long)]
    footnotes: bool,

    /// Parse definition lists
    #[arg(long)]
    definition_lists: bool,

    /// Do not parse tables
    #[arg(long)]
    no_tables: bool,
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        if self.gfm {
            return ParseOptions::gfm();
        }
        ParseOptions {
            tables: !self.no_tables,
            strikethrough: self.strikethrough,
            tasklists: self.tasklists,
            footnotes: self.footnotes,
            definition_lists: self.definition_lists,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "md2puki=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let markdown = read_input(cli.input.as_ref())?;
    let doc = parse_document(&markdown, &cli.parse_options())
        .context("failed to parse markdown")?;
    let renderer = Renderer::new(markdown.as_bytes(), &doc);

    match &cli.output {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            renderer.render_to(&mut file, doc.root())?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            renderer.render_to(&mut stdout, doc.root())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            fs::read_to_string(p).with_context(|| format!("failed to read {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}
