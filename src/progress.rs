//! Progress-callback trait for per-file batch events.
//!
//! The drivers report progress through a trait object rather than printing
//! directly, so the same driver can feed a terminal progress bar, a log
//! file, or nothing at all. All methods have default no-op implementations;
//! implementors override only what they care about.

/// Called by the batch drivers as each file is processed.
///
/// Indices are 1-based, matching the `[ 2/14]` style of console reporting.
pub trait BatchProgress: Send + Sync {
    /// Called once after collection, before any file is converted.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called just before a file's conversion begins.
    fn on_file_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called when a file converted (and, for per-file output, was written)
    /// successfully. `bytes` is the length of the produced content.
    fn on_file_complete(&self, index: usize, total: usize, name: &str, bytes: usize) {
        let _ = (index, total, name, bytes);
    }

    /// Called when a file failed; the batch continues with the next file.
    fn on_file_error(&self, index: usize, total: usize, name: &str, error: &str) {
        let _ = (index, total, name, error);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, total: usize, succeeded: usize) {
        let _ = (total, succeeded);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl BatchProgress for NoopProgress {}
