//! ZFS Prometheus Exporter
//!
//! Exposes point-in-time ZFS pool and filesystem metrics in the Prometheus text
//! exposition format.
//!
//! # Overview
//!
//! On every scrape the exporter runs `zpool list -Hp` and `zfs list -Hp`, parses
//! their tab-delimited output into typed records and serializes those records
//! into metric lines. Nothing is cached between scrapes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   zpool list -Hp   ┌──────────────────────────┐
//! │    ZFS      │ ◄────────────────  │         Exporter         │
//! │   (host)    │   zfs list -Hp     │                          │      HTTP      ┌────────────┐
//! └─────────────┘                    │ Runner → Parser → Lines  │ ◄────────────► │ Prometheus │
//!                                    │                          │   /metrics     └────────────┘
//!                                    └──────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`zfs`] - Command runner, record types and output parsers
//! - [`metrics`] - Metric line serialization
//! - [`collectors`] - Per-command collection (run, parse, serialize)
//! - [`server`] - HTTP server and scrape handling
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use zfs_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod zfs;
