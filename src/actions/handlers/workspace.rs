//! Workspace switching actions

use anyhow::Result;

use crate::actions::dispatcher::RunActionData;
use crate::backend::ShellOps;

pub fn previous(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    switch_by(shell, -1)
}

pub fn next(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    switch_by(shell, 1)
}

/// Parametrized: jump straight to `data.workspace_index`
pub fn switch_to_index(shell: &mut dyn ShellOps, data: &RunActionData) -> Result<()> {
    let count = shell.workspace_count()?;
    if data.workspace_index >= count {
        return Ok(());
    }
    shell.switch_workspace(data.workspace_index)
}

fn switch_by(shell: &mut dyn ShellOps, delta: i64) -> Result<()> {
    let count = shell.workspace_count()? as i64;
    let target = shell.current_workspace()? as i64 + delta;
    if target < 0 || target >= count {
        return Ok(());
    }
    shell.switch_workspace(target as u32)
}
