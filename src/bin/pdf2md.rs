//! CLI binary: convert every `.pdf` in a directory to individual Markdown
//! files.

use anyhow::Result;
use clap::Parser;
use docs2md::cli::{self, bold, green, CliProgress};
use docs2md::{
    convert_directory, convert_pdf_to_markdown, BatchProgress, ImageMode, NoopProgress,
};
use std::path::PathBuf;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a folder of PDFs (output: ./papers_pdf_md/)
  pdf2md ./papers

  # Choose the output directory
  pdf2md ./papers -o ./markdown

  # Also pull embedded JPEG images out of the documents
  pdf2md ./papers -o ./markdown --images-dir ./markdown/images

NOTES:
  Without --images-dir no images are emitted. With it, only images whose
  bytes can be written as-is (JPEG / JPEG 2000 streams) are extracted;
  other encodings are skipped with a warning.
"#;

/// Convert a directory of PDF files to Markdown, one .md per input.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md",
    version,
    about = "Convert a directory of PDF files to Markdown, one .md per input",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the .pdf files to convert.
    input_dir: PathBuf,

    /// Output directory for the .md files.
    #[arg(short, long, long_help = "Output directory. Default: {input_dir_name}_pdf_md")]
    output: Option<PathBuf>,

    /// Directory for extracted images; omitted = no image extraction.
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
        .unwrap_or_else(|| cli::default_output_path(&cli.input_dir, "_pdf_md"));
    let images = ImageMode::from_option(cli.images_dir, ImageMode::Skip);

    let progress: Box<dyn BatchProgress> = if show_progress {
        Box::new(CliProgress::new("chars"))
    } else {
        Box::new(NoopProgress)
    };

    let report = convert_directory(
        &cli.input_dir,
        "pdf",
        &output_dir,
        progress.as_ref(),
        |path| convert_pdf_to_markdown(path, &images),
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
