use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::info;

use super::run::run_to_completion;
use super::types::{ExecOptions, RemoteExecutor};

/// Where and how to reach the remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub host: String,
    pub user: Option<String>,
    pub port: u16,
    pub identity_file: Option<PathBuf>,
    pub connect_timeout: Duration,
    pub ssh_binary: String,
}

impl SshTarget {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: None,
            port: 22,
            identity_file: None,
            connect_timeout: Duration::from_secs(10),
            ssh_binary: "ssh".to_string(),
        }
    }

    fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{user}@{}", self.host),
            None => self.host.clone(),
        }
    }

    /// Argument list handed to the ssh client, ending with the remote command.
    pub fn args(&self, remote_command: &str) -> Vec<String> {
        let mut args = vec![
            "-o".into(),
            "BatchMode=yes".into(),
            "-o".into(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs()),
            "-p".into(),
            self.port.to_string(),
        ];
        if let Some(key) = &self.identity_file {
            args.extend(["-i".into(), key.display().to_string()]);
        }
        args.extend([self.destination(), remote_command.to_string()]);
        args
    }
}

/// Runs commands on a remote host through the system `ssh` client.
#[derive(Debug, Clone)]
pub struct SshExecutor {
    target: SshTarget,
}

impl SshExecutor {
    pub fn new(target: SshTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &SshTarget {
        &self.target
    }
}

impl RemoteExecutor for SshExecutor {
    fn run(&self, command: &str, options: &ExecOptions) -> Result<String> {
        let command = options.wrap(command);
        info!(host = %self.target.host, command = %command, "running remote command");

        let mut cmd = Command::new(&self.target.ssh_binary);
        cmd.args(self.target.args(&command));
        run_to_completion(cmd, options.timeout)?.into_result(&command, options.timeout)
    }
}

/// Runs commands on this machine through `bash -c`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalExecutor;

impl RemoteExecutor for LocalExecutor {
    fn run(&self, command: &str, options: &ExecOptions) -> Result<String> {
        let command = options.wrap(command);
        info!(command = %command, "running local command");

        let mut cmd = Command::new("bash");
        cmd.arg("-c").arg(&command);
        run_to_completion(cmd, options.timeout)?.into_result(&command, options.timeout)
    }
}

/// Picks the local executor when [`ExecOptions::in_local`] is set and the ssh
/// executor otherwise.
#[derive(Debug, Clone, Default)]
pub struct DispatchExecutor {
    remote: Option<SshExecutor>,
}

impl DispatchExecutor {
    pub fn new(remote: Option<SshExecutor>) -> Self {
        Self { remote }
    }
}

impl RemoteExecutor for DispatchExecutor {
    fn run(&self, command: &str, options: &ExecOptions) -> Result<String> {
        if options.in_local {
            return LocalExecutor.run(command, options);
        }
        match &self.remote {
            Some(ssh) => ssh.run(command, options),
            None => bail!("no remote host configured; set `ssh.host` or run with --local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_use_batch_mode_and_port() {
        let target = SshTarget {
            user: Some("curve".into()),
            port: 2222,
            ..SshTarget::new("10.0.0.1")
        };
        let args = target.args("docker info");
        assert_eq!(
            args,
            vec![
                "-o",
                "BatchMode=yes",
                "-o",
                "ConnectTimeout=10",
                "-p",
                "2222",
                "curve@10.0.0.1",
                "docker info",
            ]
        );
    }

    #[test]
    fn args_include_identity_file() {
        let target = SshTarget {
            identity_file: Some(PathBuf::from("/home/me/.ssh/id_ed25519")),
            ..SshTarget::new("host")
        };
        let args = target.args("docker ps ");
        let pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[pos + 1], "/home/me/.ssh/id_ed25519");
        assert_eq!(args.last().unwrap(), "docker ps ");
        assert_eq!(args[args.len() - 2], "host");
    }

    fn echo_target() -> SshTarget {
        SshTarget {
            user: Some("curve".into()),
            ssh_binary: "echo".into(),
            ..SshTarget::new("node1")
        }
    }

    fn sudo_options() -> ExecOptions {
        ExecOptions {
            with_sudo: true,
            timeout: Duration::from_secs(5),
            ..ExecOptions::default()
        }
    }

    const ECHOED: &str =
        "-o BatchMode=yes -o ConnectTimeout=10 -p 22 curve@node1 sudo docker ps \n";

    #[cfg(unix)]
    #[test]
    fn ssh_client_receives_wrapped_command_last() {
        let ssh = SshExecutor::new(echo_target());
        assert_eq!(ssh.target().host, "node1");
        let out = ssh.run("docker ps ", &sudo_options()).unwrap();
        assert_eq!(out, ECHOED);
    }

    #[cfg(unix)]
    #[test]
    fn dispatch_uses_ssh_unless_local() {
        let dispatch = DispatchExecutor::new(Some(SshExecutor::new(echo_target())));
        let out = dispatch.run("docker ps ", &sudo_options()).unwrap();
        assert_eq!(out, ECHOED);
    }

    #[test]
    fn dispatch_without_host_refuses_remote() {
        let err = DispatchExecutor::default()
            .run("docker info", &ExecOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("no remote host"));
    }

    #[cfg(unix)]
    #[test]
    fn dispatch_runs_locally_when_asked() {
        let opts = ExecOptions {
            in_local: true,
            timeout: Duration::from_secs(5),
            ..ExecOptions::default()
        };
        let out = DispatchExecutor::default().run("echo local", &opts).unwrap();
        assert_eq!(out, "local\n");
    }

    #[cfg(unix)]
    #[test]
    fn local_executor_passes_failure_through() {
        let opts = ExecOptions {
            timeout: Duration::from_secs(5),
            ..ExecOptions::default()
        };
        let err = LocalExecutor.run("exit 7", &opts).unwrap_err();
        assert!(err.to_string().contains("status 7"));
    }
}
