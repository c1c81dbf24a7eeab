use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::exec::{ExecOptions, SshTarget};

/// Connection settings for the remote host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub host: Option<String>,
    pub user: Option<String>,
    pub port: u16,
    pub identity_file: Option<PathBuf>,
    pub connect_timeout: u64,
    pub ssh_binary: String,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host: None,
            user: None,
            port: 22,
            identity_file: None,
            connect_timeout: 10,
            ssh_binary: "ssh".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub controller: String,
    pub sudo: bool,
    pub sudo_alias: String,
    pub local: bool,
    /// Seconds; 0 disables the timeout.
    pub timeout: u64,
    /// Global flags placed before any given on the command line.
    pub options: Vec<String>,
    pub ssh: SshConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            controller: "docker".to_string(),
            sudo: false,
            sudo_alias: "sudo".to_string(),
            local: false,
            timeout: 300,
            options: Vec::new(),
            ssh: SshConfig::default(),
        }
    }
}

impl Config {
    pub fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            controller: self.controller.clone(),
            with_sudo: self.sudo,
            sudo_alias: self.sudo_alias.clone(),
            in_local: self.local,
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// `None` when no host is configured.
    pub fn ssh_target(&self) -> Option<SshTarget> {
        let host = self.ssh.host.clone()?;
        Some(SshTarget {
            user: self.ssh.user.clone(),
            port: self.ssh.port,
            identity_file: self.ssh.identity_file.clone(),
            connect_timeout: Duration::from_secs(self.ssh.connect_timeout),
            ssh_binary: self.ssh.ssh_binary.clone(),
            ..SshTarget::new(host)
        })
    }
}
