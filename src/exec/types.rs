use std::time::Duration;

use anyhow::Result;

/// How a rendered command should be dispatched.
///
/// `controller` is the program every command line starts with (`docker`,
/// `podman`, or an alias resolving to one of them on the target host).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    pub controller: String,
    pub with_sudo: bool,
    pub sudo_alias: String,
    pub in_local: bool,
    pub timeout: Duration,
}

impl ExecOptions {
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            ..Self::default()
        }
    }

    /// Prefix the command with the sudo alias when sudo is requested.
    pub fn wrap(&self, command: &str) -> String {
        if self.with_sudo {
            format!("{} {}", self.sudo_alias, command)
        } else {
            command.to_string()
        }
    }
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            controller: "docker".to_string(),
            with_sudo: false,
            sudo_alias: "sudo".to_string(),
            in_local: false,
            timeout: Duration::from_secs(300),
        }
    }
}

/// Runs a fully rendered command somewhere and returns its stdout.
///
/// Implementations own transport, timeouts and error classification. Callers
/// pass their result through untouched.
pub trait RemoteExecutor {
    fn run(&self, command: &str, options: &ExecOptions) -> Result<String>;
}

impl<E: RemoteExecutor + ?Sized> RemoteExecutor for &E {
    fn run(&self, command: &str, options: &ExecOptions) -> Result<String> {
        (**self).run(command, options)
    }
}

/// Echoes the command instead of running it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor;

impl RemoteExecutor for DryRunExecutor {
    fn run(&self, command: &str, options: &ExecOptions) -> Result<String> {
        Ok(options.wrap(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_docker_without_sudo() {
        let opts = ExecOptions::default();
        assert_eq!(opts.controller, "docker");
        assert!(!opts.with_sudo);
        assert!(!opts.in_local);
    }

    #[test]
    fn wrap_leaves_command_alone_without_sudo() {
        let opts = ExecOptions::new("podman");
        assert_eq!(opts.wrap("podman ps "), "podman ps ");
    }

    #[test]
    fn wrap_prefixes_sudo_alias() {
        let opts = ExecOptions {
            with_sudo: true,
            sudo_alias: "sudo -E".into(),
            ..ExecOptions::new("docker")
        };
        assert_eq!(opts.wrap("docker info"), "sudo -E docker info");
    }

    #[test]
    fn dry_run_returns_wrapped_command() {
        let opts = ExecOptions {
            with_sudo: true,
            ..ExecOptions::default()
        };
        let out = DryRunExecutor.run("docker info", &opts).unwrap();
        assert_eq!(out, "sudo docker info");
    }
}
