//! CLI binary: convert every `.docx` in a directory and merge the results
//! into one Markdown file.

use anyhow::Result;
use clap::Parser;
use docs2md::cli::{self, bold, green, CliProgress};
use docs2md::{
    convert_docx_to_markdown, merge_directory, BatchProgress, ImageMode, NoopProgress,
    DEFAULT_SEPARATOR,
};
use std::path::PathBuf;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Merge a folder into one Markdown file (output: ./reports_merged.md)
  docx2md-merge ./reports

  # Choose the output file and extract images
  docx2md-merge ./reports -o ./merged.md --images-dir ./images

  # Use a custom section separator
  docx2md-merge ./reports --separator "==="

OUTPUT FORMAT:
  A generated comment header records the timestamp, the source directory,
  and the number of sections included. Each section starts with a level-1
  heading named after the source file. Files that fail to convert are
  logged and left out; the header count reflects what is actually present.
"#;

/// Convert a directory of DOCX files and merge them into one Markdown file.
#[derive(Parser, Debug)]
#[command(
    name = "docx2md-merge",
    version,
    about = "Convert a directory of DOCX files and merge them into one Markdown file",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the .docx files to merge.
    input_dir: PathBuf,

    /// Output Markdown file.
    #[arg(short, long, long_help = "Output file. Default: {input_dir_name}_merged.md")]
    output: Option<PathBuf>,

    /// Directory for extracted images; omitted = embed images as base64 data URIs.
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// String inserted between sections.
    #[arg(long, default_value = DEFAULT_SEPARATOR)]
    separator: String,

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
        .unwrap_or_else(|| cli::default_output_path(&cli.input_dir, "_merged.md"));
    let images = ImageMode::from_option(cli.images_dir, ImageMode::Inline);

    let progress: Box<dyn BatchProgress> = if show_progress {
        Box::new(CliProgress::new("chars"))
    } else {
        Box::new(NoopProgress)
    };

    let report = merge_directory(
        &cli.input_dir,
        "docx",
        &output_file,
        &cli.separator,
        progress.as_ref(),
        |path| convert_docx_to_markdown(path, &images),
    )?;

    if !cli.quiet {
        eprintln!(
            "{} {}/{} files merged  →  {}",
            green("✔"),
            report.merged,
            report.total,
            bold(&report.output.display().to_string()),
        );
    }

    Ok(())
}
