//! Metric Serializer
//!
//! Maps parsed ZFS records to Prometheus text exposition lines.
//!
//! # Metrics Produced
//!
//! ## Pools (label: `pool`)
//! - `zfs_pool_size_bytes`, `zfs_pool_allocated_bytes`, `zfs_pool_free_bytes`
//! - `zfs_pool_fragmentation_percent`, `zfs_pool_capacity_percent`
//! - `zfs_pool_health_status` - 1 if the pool is `ONLINE`, 0 otherwise (always emitted)
//!
//! ## Filesystems (label: `filesystem`)
//! - `zfs_filesystem_used_bytes`, `zfs_filesystem_available_bytes`, `zfs_filesystem_refer_bytes`
//! - `zfs_filesystem_mountpoint` - constant 1, carries the `mountpoint` label (always emitted)
//!
//! A numeric metric is left out entirely when its source field did not parse;
//! no zero or stale value is substituted.
//!
//! # Line Format
//!
//! ```text
//! zfs_filesystem_mountpoint{filesystem="tank/data", mountpoint="/mnt/data"} 1
//! ```
//!
//! Labels keep insertion order and are joined by `", "`. No `# HELP`/`# TYPE`
//! comments are written.

use crate::zfs::types::{FilesystemRecord, PoolRecord};
use std::fmt::Write as _;

/// How label values are written into a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelEscaping {
    /// Escape `\`, `"` and newlines as the exposition format requires
    #[default]
    Escape,
    /// Interpolate values verbatim; names containing `"` or `\` corrupt the line
    Raw,
}

impl LabelEscaping {
    pub fn from_flag(escape: bool) -> Self {
        if escape {
            LabelEscaping::Escape
        } else {
            LabelEscaping::Raw
        }
    }
}

/// One exposition line: `name{labels} value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLine {
    pub name: String,
    pub labels: Vec<(&'static str, String)>,
    pub value: i128,
}

impl MetricLine {
    pub fn new(name: impl Into<String>, labels: Vec<(&'static str, String)>, value: i128) -> Self {
        Self {
            name: name.into(),
            labels,
            value,
        }
    }

    /// Render without the trailing newline
    pub fn render(&self, escaping: LabelEscaping) -> String {
        let mut out = String::new();
        self.write_to(&mut out, escaping);
        out
    }

    fn write_to(&self, out: &mut String, escaping: LabelEscaping) {
        out.push_str(&self.name);
        if !self.labels.is_empty() {
            out.push('{');
            for (i, (key, value)) in self.labels.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(key);
                out.push_str("=\"");
                match escaping {
                    LabelEscaping::Escape => push_escaped(out, value),
                    LabelEscaping::Raw => out.push_str(value),
                }
                out.push('"');
            }
            out.push('}');
        }
        // Writing to a String cannot fail
        let _ = write!(out, " {}", self.value);
    }
}

fn push_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
}

/// Records that map to a contiguous group of metric lines
pub trait Exposable {
    fn metric_lines(&self) -> Vec<MetricLine>;
}

fn pool_label(record: &PoolRecord) -> Vec<(&'static str, String)> {
    vec![("pool", record.name.clone())]
}

fn filesystem_label(record: &FilesystemRecord) -> Vec<(&'static str, String)> {
    vec![("filesystem", record.name.clone())]
}

impl Exposable for PoolRecord {
    fn metric_lines(&self) -> Vec<MetricLine> {
        let mut lines = Vec::with_capacity(6);
        let gauges = [
            ("zfs_pool_size_bytes", self.size),
            ("zfs_pool_allocated_bytes", self.allocated),
            ("zfs_pool_free_bytes", self.free),
            ("zfs_pool_fragmentation_percent", self.fragmentation),
            ("zfs_pool_capacity_percent", self.capacity),
        ];
        for (name, value) in gauges {
            if let Some(value) = value {
                lines.push(MetricLine::new(name, pool_label(self), value));
            }
        }
        lines.push(MetricLine::new(
            "zfs_pool_health_status",
            pool_label(self),
            i128::from(self.is_healthy()),
        ));
        lines
    }
}

impl Exposable for FilesystemRecord {
    fn metric_lines(&self) -> Vec<MetricLine> {
        let mut lines = Vec::with_capacity(4);
        let gauges = [
            ("zfs_filesystem_used_bytes", self.used),
            ("zfs_filesystem_available_bytes", self.available),
            ("zfs_filesystem_refer_bytes", self.refer),
        ];
        for (name, value) in gauges {
            if let Some(value) = value {
                lines.push(MetricLine::new(name, filesystem_label(self), value));
            }
        }
        let mut labels = filesystem_label(self);
        labels.push(("mountpoint", self.mountpoint.clone()));
        lines.push(MetricLine::new("zfs_filesystem_mountpoint", labels, 1));
        lines
    }
}

/// Serialize records in order, keeping each record's lines together
pub fn serialize<'a, R, I>(records: I) -> Vec<MetricLine>
where
    R: Exposable + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .flat_map(Exposable::metric_lines)
        .collect()
}

/// Render lines as an exposition document, one newline-terminated line each
pub fn render_lines(lines: &[MetricLine], escaping: LabelEscaping) -> String {
    let mut out = String::new();
    for line in lines {
        line.write_to(&mut out, escaping);
        out.push('\n');
    }
    out
}
