/// One container CLI invocation, with the fields its command line needs.
///
/// Each variant renders to a fixed pattern. The patterns keep the exact
/// spacing the remote CLI has always been given, so an empty option list
/// leaves a doubled space behind (`docker pull  busybox`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Info,
    PullImage { name: String },
    CreateContainer { image: String, command: String },
    StartContainer { containers: String },
    StopContainer { containers: String },
    RestartContainer { containers: String },
    WaitContainer { containers: String },
    RemoveContainer { containers: String },
    ListContainers,
    ContainerExec { container: String, command: String },
    CopyFromContainer {
        container: String,
        src_path: String,
        dest_path: String,
    },
    CopyIntoContainer {
        src_path: String,
        container: String,
        dest_path: String,
    },
    InspectContainer { container: String },
    ContainerLogs { container: String },
}

impl Operation {
    /// Short name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Info => "info",
            Operation::PullImage { .. } => "pull",
            Operation::CreateContainer { .. } => "create",
            Operation::StartContainer { .. } => "start",
            Operation::StopContainer { .. } => "stop",
            Operation::RestartContainer { .. } => "restart",
            Operation::WaitContainer { .. } => "wait",
            Operation::RemoveContainer { .. } => "rm",
            Operation::ListContainers => "ps",
            Operation::ContainerExec { .. } => "exec",
            Operation::CopyFromContainer { .. } => "cp-from",
            Operation::CopyIntoContainer { .. } => "cp-into",
            Operation::InspectContainer { .. } => "inspect",
            Operation::ContainerLogs { .. } => "logs",
        }
    }

    /// Render the full command line for `controller` with the already
    /// space-joined global `options`.
    pub fn render(&self, controller: &str, options: &str) -> String {
        match self {
            Operation::Info => format!("{controller} info"),
            Operation::PullImage { name } => format!("{controller} pull {options} {name}"),
            Operation::CreateContainer { image, command } => {
                format!("{controller} create {options} {image} {command}")
            }
            Operation::StartContainer { containers } => {
                format!("{controller} start {options} {containers}")
            }
            Operation::StopContainer { containers } => {
                format!("{controller} stop {options} {containers}")
            }
            Operation::RestartContainer { containers } => {
                format!("{controller} restart {options} {containers}")
            }
            Operation::WaitContainer { containers } => {
                format!("{controller} wait {options} {containers}")
            }
            Operation::RemoveContainer { containers } => {
                format!("{controller} rm {options} {containers}")
            }
            Operation::ListContainers => format!("{controller} ps {options}"),
            Operation::ContainerExec { container, command } => {
                format!("{controller} exec {options} {container} {command}")
            }
            Operation::CopyFromContainer {
                container,
                src_path,
                dest_path,
            } => format!("{controller} cp {options} {container}:{src_path} {dest_path}"),
            // Two spaces after the options.
            Operation::CopyIntoContainer {
                src_path,
                container,
                dest_path,
            } => format!("{controller} cp {options}  {src_path} {container}:{dest_path}"),
            Operation::InspectContainer { container } => {
                format!("{controller} inspect {options} {container}")
            }
            Operation::ContainerLogs { container } => {
                format!("{controller} logs {options} {container}")
            }
        }
    }
}

/// Flatten container ids into the single whitespace-delimited token the
/// templates expect. Ids are not quoted.
pub fn join_ids<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .map(|id| id.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn containers(ids: &[&str]) -> String {
        join_ids(ids.iter())
    }

    #[test]
    fn info_ignores_options() {
        assert_eq!(Operation::Info.render("docker", "--debug"), "docker info");
    }

    #[test]
    fn list_keeps_trailing_space_without_options() {
        assert_eq!(Operation::ListContainers.render("docker", ""), "docker ps ");
        assert_eq!(
            Operation::ListContainers.render("docker", "-a -q"),
            "docker ps -a -q"
        );
    }

    #[test]
    fn lifecycle_verbs_render_their_subcommand() {
        let ids = containers(&["a", "b"]);
        let cases = [
            (
                Operation::StartContainer {
                    containers: ids.clone(),
                },
                "docker start  a b",
            ),
            (
                Operation::StopContainer {
                    containers: ids.clone(),
                },
                "docker stop  a b",
            ),
            (
                Operation::RestartContainer {
                    containers: ids.clone(),
                },
                "docker restart  a b",
            ),
            (
                Operation::WaitContainer {
                    containers: ids.clone(),
                },
                "docker wait  a b",
            ),
            (Operation::RemoveContainer { containers: ids }, "docker rm  a b"),
        ];
        for (op, expected) in cases {
            assert_eq!(op.render("docker", ""), expected, "{}", op.name());
        }
    }

    #[test]
    fn copy_into_has_double_space_after_options() {
        let op = Operation::CopyIntoContainer {
            src_path: "/tmp/a".into(),
            container: "c1".into(),
            dest_path: "/etc/a".into(),
        };
        assert_eq!(op.render("podman", "-a"), "podman cp -a  /tmp/a c1:/etc/a");
    }

    #[test]
    fn copy_from_puts_container_before_source() {
        let op = Operation::CopyFromContainer {
            container: "c1".into(),
            src_path: "/var/log/x".into(),
            dest_path: "/tmp/x".into(),
        };
        assert_eq!(op.render("docker", ""), "docker cp  c1:/var/log/x /tmp/x");
    }

    #[test]
    fn join_ids_uses_single_spaces() {
        assert_eq!(containers(&["a", "b", "c"]), "a b c");
        assert_eq!(containers(&["only"]), "only");
        assert_eq!(containers(&[]), "");
    }

    #[test]
    fn names_are_unique() {
        let empty = String::new;
        let ops = [
            Operation::Info,
            Operation::PullImage { name: empty() },
            Operation::CreateContainer {
                image: empty(),
                command: empty(),
            },
            Operation::StartContainer {
                containers: empty(),
            },
            Operation::StopContainer {
                containers: empty(),
            },
            Operation::RestartContainer {
                containers: empty(),
            },
            Operation::WaitContainer {
                containers: empty(),
            },
            Operation::RemoveContainer {
                containers: empty(),
            },
            Operation::ListContainers,
            Operation::ContainerExec {
                container: empty(),
                command: empty(),
            },
            Operation::CopyFromContainer {
                container: empty(),
                src_path: empty(),
                dest_path: empty(),
            },
            Operation::CopyIntoContainer {
                src_path: empty(),
                container: empty(),
                dest_path: empty(),
            },
            Operation::InspectContainer { container: empty() },
            Operation::ContainerLogs { container: empty() },
        ];
        let mut names: Vec<_> = ops.iter().map(Operation::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 14);
    }
}
