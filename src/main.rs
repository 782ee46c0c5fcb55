#![deny(unsafe_code)]

mod actions;
mod backend;
mod common;
mod config;
mod constants;
mod daemon;
mod engine;
mod shortcuts;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use actions::{Dispatcher, RunActionData};
use constants::paths;

#[derive(Parser)]
#[command(name = "hotcornerd")]
#[command(version)]
#[command(about = "Hot corner daemon for X11 desktops", long_about = None)]
struct Cli {
    /// Dispatch a single action and exit instead of running the daemon
    #[arg(long, value_name = "ACTION")]
    dispatch: Option<String>,

    /// Shell command line for `--dispatch run-command`
    #[arg(long, default_value = "", value_name = "CMD")]
    command: String,

    /// Workspace index for `--dispatch move-to-workspace`
    #[arg(long, default_value_t = 0, value_name = "N")]
    workspace: u32,

    /// List the available action ids and exit
    #[arg(long)]
    list_actions: bool,

    /// Configuration file (defaults to the XDG config location)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level filter; the RUST_LOG environment variable takes precedence
    #[arg(long, default_value = "info", value_name = "FILTER")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    if cli.list_actions {
        list_actions();
        return Ok(());
    }

    if let Some(action) = cli.dispatch {
        return dispatch_once(&action, &cli.command, cli.workspace);
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    daemon::run(&config_path)
}

/// Print the catalog grouped by its section separators
fn list_actions() {
    for entry in actions::catalog::CATALOG {
        if entry.id.is_empty() {
            println!("{}:", entry.label);
        } else {
            println!("  {:<28} {}", entry.id, entry.label);
        }
    }
}

/// One-shot dispatch through the same registry the corners use
fn dispatch_once(action: &str, command: &str, workspace: u32) -> Result<()> {
    let (_compositor, mut shell) = backend::x11::connect()?;
    let dispatcher = Dispatcher::new();
    let data = RunActionData {
        action: action.to_string(),
        monitor_index: 0,
        workspace_index: workspace,
        command: command.to_string(),
        keyboard_origin: false,
    };
    if !dispatcher.dispatch(&mut shell, data) {
        anyhow::bail!("unknown action {action:?}, see --list-actions");
    }
    Ok(())
}

fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("No config directory for this user")?;
    Ok(base.join(paths::CONFIG_DIR).join(paths::CONFIG_FILE))
}
