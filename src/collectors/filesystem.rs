//! Filesystem Metrics Collector
//!
//! Collects ZFS dataset usage and mountpoints from `zfs list -Hp`.
//!
//! # Metrics Produced
//! - `zfs_filesystem_used_bytes`, `zfs_filesystem_available_bytes`, `zfs_filesystem_refer_bytes`
//!   - Labels: filesystem
//! - `zfs_filesystem_mountpoint` - Always 1
//!   - Labels: filesystem, mountpoint

use super::{collect_with_parser, CollectionContext, CollectionResult};
use crate::zfs::{parse_filesystems, CommandRunner};

pub async fn collect_filesystem_metrics<R: CommandRunner>(
    ctx: &CollectionContext<'_, R>,
) -> CollectionResult {
    collect_with_parser(
        "filesystems",
        ctx.runner,
        &ctx.zfs.zfs_command,
        parse_filesystems,
    )
    .await
}
