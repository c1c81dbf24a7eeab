use anyhow::Result;
use tracing::debug;

use super::operation::{Operation, join_ids};
use crate::exec::{ExecOptions, RemoteExecutor};

/// Misuse of [`ContainerCli`] detected before anything is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("no container operation selected before execute")]
    NoOperation,
}

/// Fluent builder for a single container CLI command.
///
/// Global options accumulate in call order. Each operation method replaces
/// whatever operation was selected before it. The builder is consumed by
/// [`ContainerCli::execute`].
///
/// ```no_run
/// use ctrcli::command::ContainerCli;
/// use ctrcli::exec::{ExecOptions, LocalExecutor};
///
/// let out = ContainerCli::new(LocalExecutor)
///     .add_option("--all")
///     .list_containers()
///     .execute(&ExecOptions::new("docker"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct ContainerCli<E> {
    executor: E,
    options: Vec<String>,
    operation: Option<Operation>,
}

impl<E: RemoteExecutor> ContainerCli<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            options: Vec::new(),
            operation: None,
        }
    }

    /// Append one flag. Callers format it themselves:
    /// `cli.add_option(format!("--name={name}"))`.
    pub fn add_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Append several flags in order.
    pub fn add_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }

    /// Select an already built operation.
    pub fn select(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn container_info(self) -> Self {
        self.select(Operation::Info)
    }

    pub fn pull_image(self, image: impl Into<String>) -> Self {
        self.select(Operation::PullImage { name: image.into() })
    }

    pub fn create_container(self, image: impl Into<String>, command: impl Into<String>) -> Self {
        self.select(Operation::CreateContainer {
            image: image.into(),
            command: command.into(),
        })
    }

    pub fn start_container<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select(Operation::StartContainer {
            containers: join_ids(ids),
        })
    }

    pub fn stop_container<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select(Operation::StopContainer {
            containers: join_ids(ids),
        })
    }

    pub fn restart_container<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select(Operation::RestartContainer {
            containers: join_ids(ids),
        })
    }

    pub fn wait_container<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select(Operation::WaitContainer {
            containers: join_ids(ids),
        })
    }

    pub fn remove_container<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select(Operation::RemoveContainer {
            containers: join_ids(ids),
        })
    }

    pub fn list_containers(self) -> Self {
        self.select(Operation::ListContainers)
    }

    pub fn container_exec(self, id: impl Into<String>, command: impl Into<String>) -> Self {
        self.select(Operation::ContainerExec {
            container: id.into(),
            command: command.into(),
        })
    }

    pub fn copy_from_container(
        self,
        id: impl Into<String>,
        src_path: impl Into<String>,
        dest_path: impl Into<String>,
    ) -> Self {
        self.select(Operation::CopyFromContainer {
            container: id.into(),
            src_path: src_path.into(),
            dest_path: dest_path.into(),
        })
    }

    pub fn copy_into_container(
        self,
        src_path: impl Into<String>,
        id: impl Into<String>,
        dest_path: impl Into<String>,
    ) -> Self {
        self.select(Operation::CopyIntoContainer {
            src_path: src_path.into(),
            container: id.into(),
            dest_path: dest_path.into(),
        })
    }

    pub fn inspect_container(self, id: impl Into<String>) -> Self {
        self.select(Operation::InspectContainer {
            container: id.into(),
        })
    }

    pub fn container_logs(self, id: impl Into<String>) -> Self {
        self.select(Operation::ContainerLogs {
            container: id.into(),
        })
    }

    /// Render the selected operation for `controller`. Does not touch the
    /// builder, so repeated calls return the same text.
    pub fn render(&self, controller: &str) -> Result<String, BuildError> {
        let operation = self.operation.as_ref().ok_or(BuildError::NoOperation)?;
        Ok(operation.render(controller, &self.options.join(" ")))
    }

    /// Render and hand the command to the executor. The executor's output or
    /// error comes back unchanged.
    pub fn execute(self, options: &ExecOptions) -> Result<String> {
        let command = self.render(&options.controller)?;
        debug!(
            operation = self.operation.as_ref().map(Operation::name),
            command = %command,
            "rendered container command"
        );
        self.executor.run(&command, options)
    }
}
