//! Shared plumbing for the four binaries: ANSI colour helpers, logging
//! setup, the indicatif-backed progress implementation, and default output
//! naming.
//!
//! Kept in the library (behind the `cli` feature) so each binary stays a
//! thin flag-to-driver shim.

use crate::progress::BatchProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

pub fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
pub fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
pub fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
pub fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
pub fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Logging setup ────────────────────────────────────────────────────────────

/// Install the tracing subscriber.
///
/// When the progress bar is active, INFO-level library logs are suppressed
/// — the bar provides all the feedback that matters. `RUST_LOG` still wins
/// when set.
pub fn init_logging(verbose: bool, quiet: bool, show_progress: bool) {
    let filter = if verbose {
        "debug"
    } else if quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

// ── Default output naming ────────────────────────────────────────────────────

/// Derive the default output path `{input_dir_name}{suffix}` in the
/// current directory, e.g. `./documents` + `_md` → `documents_md`.
pub fn default_output_path(input_dir: &Path, suffix: &str) -> PathBuf {
    let name = input_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    PathBuf::from(format!("{name}{suffix}"))
}

// ── Terminal progress display ────────────────────────────────────────────────

/// Terminal progress: a live bar plus one `✓`/`✗` log line per file.
pub struct CliProgress {
    bar: ProgressBar,
    errors: AtomicUsize,
    /// Unit shown next to the per-file size ("chars" for Markdown output,
    /// "blocks" for composition).
    unit: &'static str,
}

impl CliProgress {
    /// Create a progress display whose bar length is set by
    /// `on_batch_start` once the file list is known.
    pub fn new(unit: &'static str) -> Self {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Collecting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            errors: AtomicUsize::new(0),
            unit,
        }
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
    }
}

impl BatchProgress for CliProgress {
    fn on_batch_start(&self, total: usize) {
        self.activate_bar(total);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total} files…"))
        ));
    }

    fn on_file_start(&self, _index: usize, _total: usize, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_file_complete(&self, index: usize, total: usize, name: &str, bytes: usize) {
        self.bar.println(format!(
            "  {} [{index:>3}/{total:<3}] {name}  {}",
            green("✓"),
            dim(&format!("{bytes} {}", self.unit)),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, index: usize, total: usize, name: &str, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            let cut = error
                .char_indices()
                .take_while(|(i, _)| *i < 79)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            format!("{}…", &error[..cut])
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} [{index:>3}/{total:<3}] {name}  {}",
            red("✗"),
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, succeeded: usize) {
        let failed = total.saturating_sub(succeeded);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} files processed successfully",
                green("✔"),
                bold(&succeeded.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files processed  ({} failed)",
                if failed == total { red("✘") } else { cyan("⚠") },
                bold(&succeeded.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_uses_directory_name() {
        assert_eq!(
            default_output_path(Path::new("./meeting notes"), "_md"),
            PathBuf::from("meeting notes_md")
        );
        assert_eq!(
            default_output_path(Path::new("/data/docs/"), "_merged.md"),
            PathBuf::from("docs_merged.md")
        );
    }

    #[test]
    fn default_output_path_survives_bare_dot() {
        assert_eq!(
            default_output_path(Path::new("."), "_md"),
            PathBuf::from("output_md")
        );
    }
}
