//! CLI binary: convert every `.docx` in a directory to individual
//! Markdown files.
//!
//! A thin shim over the library crate that maps CLI flags to the batch
//! driver and prints the final report.

use anyhow::Result;
use clap::Parser;
use docs2md::cli::{self, bold, green, CliProgress};
use docs2md::{
    convert_directory, convert_docx_to_markdown, BatchProgress, ImageMode, NoopProgress,
};
use std::path::PathBuf;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a folder of documents (output: ./reports_md/)
  docx2md ./reports

  # Choose the output directory
  docx2md ./reports -o ./markdown

  # Extract embedded images to files instead of inlining base64
  docx2md ./reports -o ./markdown --images-dir ./markdown/images

  # Machine-readable report
  docx2md ./reports --json > report.json

NOTES:
  Office lock files (~$name.docx) are skipped automatically.
  A file that fails to convert is logged and the batch continues;
  the exit code is non-zero only when no .docx files are found at all.
"#;

/// Convert a directory of DOCX files to Markdown, one .md per input.
#[derive(Parser, Debug)]
#[command(
    name = "docx2md",
    version,
    about = "Convert a directory of DOCX files to Markdown, one .md per input",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the .docx files to convert.
    input_dir: PathBuf,

    /// Output directory for the .md files.
    #[arg(short, long, long_help = "Output directory. Default: {input_dir_name}_md")]
    output: Option<PathBuf>,

    /// Directory for extracted images; omitted = embed images as base64 data URIs.
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Print the batch report as JSON to stdout.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    cli::init_logging(cli.verbose, cli.quiet, show_progress);

    let output_dir = cli
        .output
        .unwrap_or_else(|| cli::default_output_path(&cli.input_dir, "_md"));
    let images = ImageMode::from_option(cli.images_dir, ImageMode::Inline);

    let progress: Box<dyn BatchProgress> = if show_progress {
        Box::new(CliProgress::new("chars"))
    } else {
        Box::new(NoopProgress)
    };

    let report = convert_directory(
        &cli.input_dir,
        "docx",
        &output_dir,
        progress.as_ref(),
        |path| convert_docx_to_markdown(path, &images),
    )?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        eprintln!(
            "{} {}/{} files converted  →  {}",
            green("✔"),
            report.converted,
            report.total,
            bold(&output_dir.display().to_string()),
        );
    }

    Ok(())
}
