// kodegen-mdconv: command-line front end for the conversion engine.
//
// Reads a file or stdin, writes the result to stdout. Logs go to stderr,
// filtered by RUST_LOG (default: warn).

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kodegen_markdown_bridge::{ConverterConfig, MarkdownConverter, is_markdown};

#[derive(Parser)]
#[command(name = "kodegen-mdconv")]
#[command(about = "Convert between Markdown and HTML")]
struct Cli {
    /// JSON file with converter settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Wrap task-list checkboxes and their text in a <label>
    #[arg(long, global = true)]
    task_labels: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render Markdown to HTML
    ToHtml {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,
    },
    /// Convert HTML to Markdown
    ToMarkdown {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,
    },
    /// Plain-text preview of Markdown
    Preview {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,

        /// Maximum preview length in characters
        #[arg(short, long)]
        length: Option<usize>,
    },
    /// Report whether the input looks like Markdown (exit code 1 if not)
    Sniff {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let converter = MarkdownConverter::new(load_config(cli.config.as_deref(), cli.task_labels)?);

    let output = match &cli.command {
        Command::ToHtml { input } => converter.markdown_to_html(&read_input(input.as_deref())?),
        Command::ToMarkdown { input } => {
            let mut markdown = converter.html_to_markdown(&read_input(input.as_deref())?);
            if !markdown.is_empty() {
                markdown.push('\n');
            }
            markdown
        }
        Command::Preview { input, length } => {
            let markdown = read_input(input.as_deref())?;
            let length = length.unwrap_or(converter.config().preview_length());
            format!("{}\n", converter.markdown_to_preview_text(&markdown, length))
        }
        Command::Sniff { input } => {
            let detected = is_markdown(&read_input(input.as_deref())?);
            println!("{}", if detected { "markdown" } else { "plain" });
            if !detected {
                std::process::exit(1);
            }
            return Ok(());
        }
    };

    io::stdout()
        .write_all(output.as_bytes())
        .context("Failed to write output")?;
    Ok(())
}

fn load_config(path: Option<&Path>, task_labels: bool) -> Result<ConverterConfig> {
    let base = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str::<ConverterConfig>(&raw)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => ConverterConfig::default(),
    };

    ConverterConfig::builder()
        .task_list_label(base.task_list_label() || task_labels)
        .hard_breaks(base.hard_breaks())
        .max_input_bytes(base.max_input_bytes())
        .max_nesting_depth(base.max_nesting_depth())
        .preview_length(base.preview_length())
        .build()
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}
