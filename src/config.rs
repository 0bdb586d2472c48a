use crate::error::ExporterError;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Reserved for the liveness endpoint
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub zfs: ZfsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

/// External commands, as argument vectors (program first, no shell involved)
#[derive(Debug, Deserialize, Clone)]
pub struct ZfsConfig {
    #[serde(default = "default_zpool_command")]
    pub zpool_command: Vec<String>,
    #[serde(default = "default_zfs_command")]
    pub zfs_command: Vec<String>,
    /// Upper bound for a single command run; 0 waits forever
    #[serde(default = "default_command_timeout")]
    pub command_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub collect_pool_metrics: bool,
    #[serde(default = "default_true")]
    pub collect_filesystem_metrics: bool,
    #[serde(default = "default_true")]
    pub escape_label_values: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
            metrics_path: default_metrics_path(),
        }
    }
}

impl Default for ZfsConfig {
    fn default() -> Self {
        Self {
            zpool_command: default_zpool_command(),
            zfs_command: default_zfs_command(),
            command_timeout_seconds: default_command_timeout(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            collect_pool_metrics: true,
            collect_filesystem_metrics: true,
            escape_label_values: true,
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9134
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_zpool_command() -> Vec<String> {
    vec!["zpool".into(), "list".into(), "-Hp".into()]
}

fn default_zfs_command() -> Vec<String> {
    vec!["zfs".into(), "list".into(), "-Hp".into()]
}

fn default_command_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("ZFS_EXPORTER")
                    .separator("__")
                    .list_separator(" ")
                    .with_list_parse_key("zfs.zpool_command")
                    .with_list_parse_key("zfs.zfs_command")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the exporter cannot run with
    pub fn validate(&self) -> crate::error::Result<()> {
        for (key, argv) in [
            ("zfs.zpool_command", &self.zfs.zpool_command),
            ("zfs.zfs_command", &self.zfs.zfs_command),
        ] {
            match argv.first() {
                Some(program) if !program.trim().is_empty() => {}
                _ => {
                    return Err(ExporterError::Config(format!(
                        "{key} must name a program to run"
                    )))
                }
            }
        }
        if self.server.port == 0 {
            return Err(ExporterError::Config(
                "server.port must be between 1 and 65535".to_string(),
            ));
        }
        if !self.server.metrics_path.starts_with('/') {
            return Err(ExporterError::Config(format!(
                "server.metrics_path must start with '/', got '{}'",
                self.server.metrics_path
            )));
        }
        let has_route_syntax = self.server.metrics_path.contains(|c: char| c == '{' || c == '}')
            || self
                .server
                .metrics_path
                .split('/')
                .any(|segment| segment.starts_with(':') || segment.starts_with('*'));
        if has_route_syntax {
            return Err(ExporterError::Config(format!(
                "server.metrics_path must be a literal path, got '{}'",
                self.server.metrics_path
            )));
        }
        if self.server.metrics_path == HEALTH_PATH {
            return Err(ExporterError::Config(format!(
                "server.metrics_path cannot be {HEALTH_PATH}"
            )));
        }
        Ok(())
    }
}
