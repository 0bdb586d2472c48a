//! Pool Metrics Collector
//!
//! Collects ZFS pool size, usage and health from `zpool list -Hp`.
//!
//! # Metrics Produced
//! - `zfs_pool_size_bytes`, `zfs_pool_allocated_bytes`, `zfs_pool_free_bytes`
//!   - Labels: pool
//! - `zfs_pool_fragmentation_percent`, `zfs_pool_capacity_percent`
//!   - Labels: pool
//! - `zfs_pool_health_status` - Pool health (1=ONLINE, 0=anything else)
//!   - Labels: pool

use super::{collect_with_parser, CollectionContext, CollectionResult};
use crate::zfs::{parse_pools, CommandRunner};

/// Collects ZFS pool metrics
///
/// # Returns
///
/// * `Ok(lines)` - Pool metric lines; empty if the command failed (logged as error)
/// * `Err(_)` - Unexpected failure that should be reported in the scrape
pub async fn collect_pool_metrics<R: CommandRunner>(
    ctx: &CollectionContext<'_, R>,
) -> CollectionResult {
    collect_with_parser("pools", ctx.runner, &ctx.zfs.zpool_command, parse_pools).await
}
