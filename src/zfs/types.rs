//! ZFS Record Types
//!
//! Typed rows of `zpool list -Hp` and `zfs list -Hp` output. Records live for
//! a single scrape: built by the parser, consumed by the serializer.
//!
//! Numeric fields are `Option<i128>`: `None` means the field was present but did
//! not parse as an integer (ZFS prints `-` for values it cannot report).
//! `i128` holds every unsigned 64-bit byte count as well as negative values.

/// Health state reported for a pool that is fully operational
pub const HEALTH_ONLINE: &str = "ONLINE";

/// One row of `zpool list -Hp`
///
/// Read from fixed columns: 0 name, 1 size, 2 allocated, 3 free,
/// 4 fragmentation, 5 capacity, 8 health. Other columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolRecord {
    pub name: String,
    pub size: Option<i128>,
    pub allocated: Option<i128>,
    pub free: Option<i128>,
    pub fragmentation: Option<i128>,
    pub capacity: Option<i128>,
    pub health: String,
}

impl PoolRecord {
    /// Only the exact, case-sensitive state `ONLINE` counts as healthy
    pub fn is_healthy(&self) -> bool {
        self.health == HEALTH_ONLINE
    }
}

/// One row of `zfs list -Hp`: `name used avail refer mountpoint`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemRecord {
    pub name: String,
    pub used: Option<i128>,
    pub available: Option<i128>,
    pub refer: Option<i128>,
    /// May be empty, `none` or `legacy`; passed through untouched
    pub mountpoint: String,
}
