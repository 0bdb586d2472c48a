//! Record Parser
//!
//! Turns the tab-delimited, header-less output of the listing commands into
//! typed records.
//!
//! # Tolerance
//!
//! - A row with too few fields is skipped with a warning naming the line; the
//!   remaining rows are still parsed.
//! - A numeric field that does not parse becomes `None`; the row is kept.
//! - Empty output yields no records and no warnings.
//!
//! Row order is preserved and duplicate names are passed through.

use crate::zfs::types::{FilesystemRecord, PoolRecord};
use tracing::warn;

/// Minimum number of fields in a `zpool list -Hp` row
pub const POOL_MIN_FIELDS: usize = 9;

/// Minimum number of fields in a `zfs list -Hp` row
pub const FILESYSTEM_MIN_FIELDS: usize = 5;

const FIELD_DELIMITER: char = '\t';

/// Best-effort integer parse, `None` on anything that is not an integer
pub fn parse_int(field: &str) -> Option<i128> {
    field.trim().parse::<i128>().ok()
}

/// Split raw command output into rows and map every well-formed row
///
/// # Arguments
///
/// * `raw` - Command output; surrounding whitespace is trimmed before splitting
/// * `min_fields` - Rows with fewer tab-separated fields are skipped
/// * `source` - Name used in log messages (e.g. `zpool`)
/// * `map` - Builds a record from the fields of a row; only called with
///   at least `min_fields` fields
pub fn parse_rows<T, F>(raw: &str, min_fields: usize, source: &str, map: F) -> Vec<T>
where
    F: Fn(&[&str]) -> T,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let mut records = Vec::new();
    for line in raw.split('\n') {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() < min_fields {
            warn!(
                "Unexpected {} output format (expected at least {} fields, got {}): {}",
                source,
                min_fields,
                fields.len(),
                line
            );
            continue;
        }
        records.push(map(&fields));
    }
    records
}

/// Parse `zpool list -Hp` output
pub fn parse_pools(raw: &str) -> Vec<PoolRecord> {
    parse_rows(raw, POOL_MIN_FIELDS, "zpool", |fields| PoolRecord {
        name: fields[0].to_string(),
        size: parse_int(fields[1]),
        allocated: parse_int(fields[2]),
        free: parse_int(fields[3]),
        fragmentation: parse_int(fields[4]),
        capacity: parse_int(fields[5]),
        health: fields[8].to_string(),
    })
}

/// Parse `zfs list -Hp` output
pub fn parse_filesystems(raw: &str) -> Vec<FilesystemRecord> {
    parse_rows(raw, FILESYSTEM_MIN_FIELDS, "zfs", |fields| FilesystemRecord {
        name: fields[0].to_string(),
        used: parse_int(fields[1]),
        available: parse_int(fields[2]),
        refer: parse_int(fields[3]),
        mountpoint: fields[4].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("1000"), Some(1000));
        assert_eq!(parse_int(" 42 "), Some(42));
        assert_eq!(parse_int("-7"), Some(-7));
        assert_eq!(parse_int("18446744073709551615"), Some(u64::MAX as i128));
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("NaN"), None);
        assert_eq!(parse_int("1.5"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn test_parse_pool_row() {
        let pools = parse_pools("tank\t1000\t200\t800\t5\t20\t-\t-\tONLINE\t-\n");
        assert_eq!(
            pools,
            vec![PoolRecord {
                name: "tank".to_string(),
                size: Some(1000),
                allocated: Some(200),
                free: Some(800),
                fragmentation: Some(5),
                capacity: Some(20),
                health: "ONLINE".to_string(),
            }]
        );
        assert!(pools[0].is_healthy());
    }

    #[test]
    fn test_non_numeric_field_becomes_none() {
        let pools = parse_pools("tank\tNaN\t200\t800\t5\t20\t-\t-\tONLINE");
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].size, None);
        assert_eq!(pools[0].allocated, Some(200));
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let raw = "tank\t1000\t200\t800\t5\t20\t-\t-\tONLINE\n\
                   broken\t1\t2\n\
                   backup\t10\t2\t8\t1\t20\t-\t-\tDEGRADED";
        let pools = parse_pools(raw);
        let names: Vec<&str> = pools.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["tank", "backup"]);
        assert!(!pools[1].is_healthy());
    }

    #[test]
    fn test_empty_output_yields_no_records() {
        assert!(parse_pools("").is_empty());
        assert!(parse_pools("\n  \n").is_empty());
        assert!(parse_filesystems("").is_empty());
    }

    #[test]
    fn test_parse_filesystem_row() {
        let filesystems = parse_filesystems("tank/data\t500\t1500\t500\t/mnt/data\n");
        assert_eq!(
            filesystems,
            vec![FilesystemRecord {
                name: "tank/data".to_string(),
                used: Some(500),
                available: Some(1500),
                refer: Some(500),
                mountpoint: "/mnt/data".to_string(),
            }]
        );
    }

    #[test]
    fn test_filesystem_with_empty_mountpoint() {
        let filesystems = parse_filesystems("tank/vol\t1\t2\t3\t\tignored");
        assert_eq!(filesystems.len(), 1);
        assert_eq!(filesystems[0].mountpoint, "");
    }

    #[test]
    fn test_duplicates_and_order_are_preserved() {
        let raw = "b\t1\t1\t1\tnone\na\t2\t2\t2\tnone\nb\t3\t3\t3\tnone";
        let names: Vec<String> = parse_filesystems(raw).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_parse_rows_only_maps_wide_enough_rows() {
        let widths = parse_rows("a\tb\tc\na\nx\ty", 2, "test", |fields| fields.len());
        assert_eq!(widths, vec![3, 2]);
    }
}
