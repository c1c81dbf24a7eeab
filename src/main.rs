use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ctrcli::command::ContainerCli;
use ctrcli::config::{self, Config};
use ctrcli::exec::{DispatchExecutor, DryRunExecutor, RemoteExecutor, SshExecutor};

#[derive(Parser)]
#[command(name = "ctrcli")]
#[command(about = "Run container CLI commands on a remote host", long_about = None)]
struct Cli {
    /// Extra global option passed to the controller (repeatable)
    #[arg(short = 'o', long = "option", global = true, allow_hyphen_values = true)]
    options: Vec<String>,

    /// Controller program or alias, e.g. docker or podman
    #[arg(long, global = true)]
    controller: Option<String>,

    /// Remote host, overrides `ssh.host` from the config file
    #[arg(long, global = true)]
    host: Option<String>,

    /// Run on this machine instead of over ssh
    #[arg(long, global = true)]
    local: bool,

    /// Prefix the command with the sudo alias
    #[arg(long, global = true)]
    sudo: bool,

    /// Print the command instead of running it
    #[arg(long, global = true)]
    dry_run: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show runtime information
    Info,
    /// Pull an image
    Pull { image: String },
    /// Create a container
    Create {
        image: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Start containers
    Start {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Stop containers
    Stop {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Restart containers
    Restart {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Block until containers stop
    Wait {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Remove containers
    Rm {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List containers
    Ps,
    /// Run a command in a container
    Exec {
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// Copy a path out of a container
    CpFrom {
        id: String,
        src: String,
        dest: String,
    },
    /// Copy a path into a container
    CpInto {
        src: String,
        id: String,
        dest: String,
    },
    /// Show low-level container details
    Inspect { id: String },
    /// Fetch container logs
    Logs { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "ctrcli=debug" } else { "ctrcli=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()?;
    let mut cfg = config::load(&cwd)?;
    apply_overrides(&mut cfg, &cli);

    let output = if cli.dry_run {
        run(DryRunExecutor, &cfg, &cli)?
    } else {
        let remote = cfg.ssh_target().map(SshExecutor::new);
        run(DispatchExecutor::new(remote), &cfg, &cli)?
    };

    print!("{output}");
    if cli.dry_run {
        println!();
    }
    Ok(())
}

fn apply_overrides(cfg: &mut Config, cli: &Cli) {
    if let Some(controller) = &cli.controller {
        cfg.controller = controller.clone();
    }
    if let Some(host) = &cli.host {
        cfg.ssh.host = Some(host.clone());
    }
    cfg.local |= cli.local;
    cfg.sudo |= cli.sudo;
    cfg.options.extend(cli.options.iter().cloned());
}

fn run<E: RemoteExecutor>(executor: E, cfg: &Config, cli: &Cli) -> Result<String> {
    let builder = ContainerCli::new(executor).add_options(&cfg.options);
    let builder = match &cli.command {
        Commands::Info => builder.container_info(),
        Commands::Pull { image } => builder.pull_image(image),
        Commands::Create { image, command } => {
            builder.create_container(image, shell_words::join(command))
        }
        Commands::Start { ids } => builder.start_container(ids),
        Commands::Stop { ids } => builder.stop_container(ids),
        Commands::Restart { ids } => builder.restart_container(ids),
        Commands::Wait { ids } => builder.wait_container(ids),
        Commands::Rm { ids } => builder.remove_container(ids),
        Commands::Ps => builder.list_containers(),
        Commands::Exec { id, command } => builder.container_exec(id, shell_words::join(command)),
        Commands::CpFrom { id, src, dest } => builder.copy_from_container(id, src, dest),
        Commands::CpInto { src, id, dest } => builder.copy_into_container(src, id, dest),
        Commands::Inspect { id } => builder.inspect_container(id),
        Commands::Logs { id } => builder.container_logs(id),
    };
    builder.execute(&cfg.exec_options())
}
