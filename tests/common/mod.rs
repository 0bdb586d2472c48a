//! Shared test helpers
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use zfs_exporter::error::{ExporterError, Result};
use zfs_exporter::zfs::CommandRunner;

pub const TANK_ONLINE: &str = "tank\t1000\t200\t800\t5\t20\t-\t-\tONLINE";
pub const TANK_DATA: &str = "tank/data\t500\t1500\t500\t/mnt/data";

/// Canned outcome for one command line
#[derive(Clone)]
pub enum Reply {
    Stdout(String),
    Exit(i32, String),
    InvalidUtf8,
}

/// Command runner that answers from a table instead of spawning processes
#[derive(Default)]
pub struct FakeRunner {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, command_line: &str, reply: Reply) -> Self {
        self.replies.insert(command_line.to_string(), reply);
        self
    }

    pub fn zpool(self, stdout: &str) -> Self {
        self.with("zpool list -Hp", Reply::Stdout(stdout.to_string()))
    }

    pub fn zfs(self, stdout: &str) -> Self {
        self.with("zfs list -Hp", Reply::Stdout(stdout.to_string()))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, argv: &[String]) -> Result<String> {
        let command = argv.join(" ");
        self.calls.lock().unwrap().push(command.clone());
        match self.replies.get(&command) {
            Some(Reply::Stdout(out)) => Ok(out.clone()),
            Some(Reply::Exit(code, stderr)) => Err(ExporterError::CommandFailed {
                command,
                status: format!("exit status: {code}"),
                stderr: stderr.clone(),
            }),
            Some(Reply::InvalidUtf8) => Err(ExporterError::InvalidUtf8 { command }),
            None => Err(ExporterError::Spawn {
                command,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
        }
    }
}

pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
