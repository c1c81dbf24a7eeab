//! ctrcli: build container runtime CLI commands and run them on remote hosts.

pub mod command;
pub mod config;
pub mod exec;

pub use command::{BuildError, ContainerCli, Operation};
pub use exec::{ExecOptions, RemoteExecutor};
