// Command dispatch: execution options, the executor seam and the default
// ssh/local/dry-run executors.

pub mod run;
pub mod ssh;
pub mod types;

pub use ssh::{DispatchExecutor, LocalExecutor, SshExecutor, SshTarget};
pub use types::{DryRunExecutor, ExecOptions, RemoteExecutor};
