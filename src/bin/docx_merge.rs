//! CLI binary: compose every `.docx` in a directory into a single Word
//! document, preserving the original formatting.

use anyhow::Result;
use clap::Parser;
use docs2md::cli::{self, bold, green, CliProgress};
use docs2md::{compose_directory, BatchProgress, NoopProgress};
use std::path::PathBuf;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Compose a folder into one document (output: ./reports_merged.docx)
  docx-merge ./reports

  # Choose the output file
  docx-merge ./reports -o ./combined.docx

NOTES:
  Documents are appended in file-name order with a page break between
  them. A document that fails to load is logged and skipped; the run only
  fails when no document loads at all.
"#;

/// Compose a directory of DOCX files into a single Word document.
#[derive(Parser, Debug)]
#[command(
    name = "docx-merge",
    version,
    about = "Compose a directory of DOCX files into a single Word document",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the .docx files to compose.
    input_dir: PathBuf,

    /// Output .docx file.
    #[arg(short, long, long_help = "Output file. Default: {input_dir_name}_merged.docx")]
    output: Option<PathBuf>,

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

    let show_progress = !cli.quiet && !cli.no_progress;
    cli::init_logging(cli.verbose, cli.quiet, show_progress);

    let output_file = cli
        .output
        .unwrap_or_else(|| cli::default_output_path(&cli.input_dir, "_merged.docx"));

    let progress: Box<dyn BatchProgress> = if show_progress {
        Box::new(CliProgress::new("blocks"))
    } else {
        Box::new(NoopProgress)
    };

    let report = compose_directory(&cli.input_dir, &output_file, progress.as_ref())?;

    if !cli.quiet {
        eprintln!(
            "{} {}/{} documents composed  →  {}",
            green("✔"),
            report.composed,
            report.total,
            bold(&report.output.display().to_string()),
        );
    }

    Ok(())
}
