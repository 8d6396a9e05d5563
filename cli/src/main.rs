//! Spaceport CLI - Manage the ports of remote development workspaces
//!
//! A command-line tool for listing shared ports, changing their privacy,
//! and forwarding them to local ports.

mod commands;

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "spaceport")]
#[command(author, version, about = "Manage the ports of remote development workspaces")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List, change and forward the ports of a workspace
    Ports {
        #[command(subcommand)]
        action: Option<PortsAction>,

        /// Name of the workspace (may be omitted when there is only one)
        #[arg(short, long, global = true, default_value = "")]
        workspace: String,
    },

    /// Manage local workspaces
    #[command(alias = "ws")]
    Workspace {
        #[command(subcommand)]
        action: WorkspaceAction,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum PortsAction {
    /// List shared ports with their labels and browse URLs
    #[command(alias = "ls")]
    List,

    /// Change the privacy of ports
    #[command(alias = "visibility")]
    Privacy {
        /// Port and privacy level, e.g. 8080:public
        #[arg(required = true, value_name = "PORT:PRIVACY")]
        specs: Vec<String>,
    },

    /// Forward remote ports to local ports until interrupted
    Forward {
        /// Remote and local port, e.g. 8080:18080
        #[arg(required = true, value_name = "REMOTE:LOCAL")]
        specs: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Change settings
    #[command(arg_required_else_help = true)]
    Set {
        /// Domain used to build browse URLs
        #[arg(long)]
        preview_domain: Option<String>,
        /// Address local forward listeners bind to
        #[arg(long)]
        bind_address: Option<IpAddr>,
    },
}

#[derive(Subcommand)]
enum WorkspaceAction {
    /// Add a workspace
    Add {
        name: String,
        /// Repository checkout backing the workspace
        #[arg(long)]
        root: PathBuf,
        /// Host forwarded connections are dialed on
        #[arg(long)]
        host: Option<String>,
    },
    /// Remove a workspace
    #[command(alias = "rm")]
    Remove { name: String },
    /// List all workspaces
    #[command(alias = "ls")]
    List,
}

/// Send logs to stderr, filtered by `RUST_LOG` or the verbosity flag.
fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    match cli.command {
        Commands::Ports { action, workspace } => match action.unwrap_or(PortsAction::List) {
            PortsAction::List => commands::ports::list(&workspace, cli.json, &cancel).await?,
            PortsAction::Privacy { specs } => {
                commands::ports::privacy(&workspace, &specs, &cancel).await?
            }
            PortsAction::Forward { specs } => {
                commands::ports::forward(&workspace, &specs, &cancel).await?
            }
        },
        Commands::Workspace { action } => match action {
            WorkspaceAction::Add { name, root, host } => {
                commands::workspace::add(name, root, host).await?
            }
            WorkspaceAction::Remove { name } => commands::workspace::remove(&name).await?,
            WorkspaceAction::List => commands::workspace::list(cli.json).await?,
        },
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => commands::config::show(cli.json).await?,
            ConfigAction::Set {
                preview_domain,
                bind_address,
            } => commands::config::set(preview_domain, bind_address).await?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_set_parses_settings() {
        let cli = Cli::try_parse_from([
            "spaceport",
            "config",
            "set",
            "--preview-domain",
            "preview.example",
            "--bind-address",
            "0.0.0.0",
        ])
        .unwrap();

        match cli.command {
            Commands::Config {
                action:
                    Some(ConfigAction::Set {
                        preview_domain,
                        bind_address,
                    }),
            } => {
                assert_eq!(preview_domain.as_deref(), Some("preview.example"));
                assert_eq!(bind_address, Some("0.0.0.0".parse().unwrap()));
            }
            _ => panic!("expected config set"),
        }
    }

    #[test]
    fn test_config_set_rejects_bad_address() {
        assert!(Cli::try_parse_from(["spaceport", "config", "set", "--bind-address", "nope"]).is_err());
    }

    #[test]
    fn test_ports_defaults_to_list() {
        let cli = Cli::try_parse_from(["spaceport", "ports", "-w", "app"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Ports { action: None, ref workspace } if workspace == "app"
        ));
    }
}
