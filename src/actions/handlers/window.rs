//! Window management actions
//!
//! All of these operate on the currently focused toplevel and do nothing
//! when no window has focus.

use anyhow::Result;

use crate::actions::dispatcher::RunActionData;
use crate::backend::ShellOps;

pub fn close(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    let Some(window) = shell.active_window()? else {
        return Ok(());
    };
    shell.close_window(window)
}

pub fn minimize(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    let Some(window) = shell.active_window()? else {
        return Ok(());
    };
    shell.minimize_window(window)
}

pub fn toggle_maximize(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    let Some(window) = shell.active_window()? else {
        return Ok(());
    };
    shell.toggle_maximize(window)
}

pub fn toggle_fullscreen(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    let Some(window) = shell.active_window()? else {
        return Ok(());
    };
    shell.toggle_fullscreen(window)
}

pub fn toggle_above(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    let Some(window) = shell.active_window()? else {
        return Ok(());
    };
    shell.toggle_above(window)
}

pub fn toggle_sticky(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    let Some(window) = shell.active_window()? else {
        return Ok(());
    };
    shell.toggle_sticky(window)
}

pub fn thumbnail(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    let Some(window) = shell.active_window()? else {
        return Ok(());
    };
    shell.create_window_thumbnail(window)
}

/// Compound: create a thumbnail of the focused window, then minimize it
pub fn minimize_to_thumbnail(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    let Some(window) = shell.active_window()? else {
        return Ok(());
    };
    shell.create_window_thumbnail(window)?;
    shell.minimize_window(window)
}

pub fn move_to_prev_workspace(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    move_by(shell, -1)
}

pub fn move_to_next_workspace(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    move_by(shell, 1)
}

fn move_by(shell: &mut dyn ShellOps, delta: i64) -> Result<()> {
    let Some(window) = shell.active_window()? else {
        return Ok(());
    };
    let count = shell.workspace_count()? as i64;
    let current = shell.current_workspace()? as i64;
    let target = current + delta;
    if target < 0 || target >= count {
        return Ok(());
    }
    shell.move_window_to_workspace(window, target as u32)?;
    shell.switch_workspace(target as u32)
}
