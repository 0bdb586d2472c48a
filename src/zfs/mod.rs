pub mod command;
pub mod parser;
pub mod types;

pub use command::{run_or_empty, CommandRunner, SystemCommandRunner};
pub use parser::{parse_filesystems, parse_pools};
pub use types::{FilesystemRecord, PoolRecord};
