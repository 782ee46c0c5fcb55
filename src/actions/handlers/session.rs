//! Session-level actions

use anyhow::Result;

use crate::actions::dispatcher::RunActionData;
use crate::backend::ShellOps;

pub fn toggle_overview(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    shell.toggle_overview()
}

pub fn show_desktop(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    shell.toggle_show_desktop()
}

/// Parametrized: spawn the command line carried in the invocation context
pub fn run_command(shell: &mut dyn ShellOps, data: &RunActionData) -> Result<()> {
    if data.command.is_empty() {
        return Ok(());
    }
    shell.spawn_command(&data.command)
}

pub fn lock_screen(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    shell.lock_screen()
}

pub fn suspend(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    shell.suspend()
}
