//! Metrics Collectors
//!
//! One collector per listing command. Each collector runs its command, parses
//! the output into records and serializes them into metric lines.
//!
//! # Error Handling
//!
//! Command failures are non-fatal: [`run_or_empty`](crate::zfs::run_or_empty)
//! logs them and the collector reports zero lines for that source. Only
//! unexpected failures (undecodable output, an empty command line) are returned
//! as `Err`, and the server turns those into a `# Error:` comment.

use crate::config::ZfsConfig;
use crate::error::Result;
use crate::metrics::{self, Exposable, MetricLine};
use crate::zfs::{run_or_empty, CommandRunner};
use tracing::info;

/// Shared context passed to all collectors
///
/// All fields are immutable references; nothing is shared between scrapes.
pub struct CollectionContext<'a, R: CommandRunner> {
    /// Runs the listing commands
    pub runner: &'a R,
    /// Which commands to run
    pub zfs: &'a ZfsConfig,
}

impl<R: CommandRunner> Clone for CollectionContext<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: CommandRunner> Copy for CollectionContext<'_, R> {}

/// Result type for collector functions
pub type CollectionResult = Result<Vec<MetricLine>>;

/// Run a command and turn its output into metric lines
///
/// # Arguments
///
/// * `name` - Name of the record type being collected (for logging)
/// * `runner` - Command runner
/// * `argv` - Command to run
/// * `parse` - Parser for the command's output
pub async fn collect_with_parser<R, T, P>(
    name: &str,
    runner: &R,
    argv: &[String],
    parse: P,
) -> CollectionResult
where
    R: CommandRunner,
    T: Exposable,
    P: FnOnce(&str) -> Vec<T>,
{
    let output = run_or_empty(runner, argv).await?;
    let records = parse(&output);
    let lines = metrics::serialize(&records);
    info!(
        "Collected {} {} ({} metric lines)",
        records.len(),
        name,
        lines.len()
    );
    Ok(lines)
}

// Collector modules
pub mod filesystem;
pub mod pool;

// Re-export collector functions for convenient access
pub use filesystem::collect_filesystem_metrics;
pub use pool::collect_pool_metrics;
