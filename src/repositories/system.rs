//! Explorer and Windows restarts. The caller confirms with the user first.

use crate::error::{PoleToWinError, Result};
use std::process::Command;

#[cfg_attr(not(windows), allow(dead_code))]
fn run(program: &str, args: &[&str]) -> Result<()> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| PoleToWinError::SystemCommand(format!("{program}: {e}")))?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let essential = stderr
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("no output");
    Err(PoleToWinError::SystemCommand(format!(
        "{program} exited with {}: {essential}",
        output.status
    )))
}

/// Kill explorer.exe and start a fresh instance so shell settings take effect.
///
/// # Errors
///
/// Returns `SystemCommand` if either step fails, `Unsupported` off Windows.
pub fn restart_explorer() -> Result<()> {
    #[cfg(windows)]
    {
        tracing::info!("Restarting explorer.exe");
        run("taskkill", &["/f", "/im", "explorer.exe"])?;
        run("cmd", &["/C", "start", "explorer.exe"])
    }

    #[cfg(not(windows))]
    {
        Err(PoleToWinError::Unsupported(
            "Restarting Explorer is only supported on Windows".to_string(),
        ))
    }
}

/// Reboot immediately. Unsaved data in other programs is lost.
///
/// # Errors
///
/// Returns `SystemCommand` if `shutdown` fails, `Unsupported` off Windows.
pub fn restart_windows() -> Result<()> {
    #[cfg(windows)]
    {
        tracing::info!("Restarting Windows");
        run("shutdown", &["/r", "/t", "0"])
    }

    #[cfg(not(windows))]
    {
        Err(PoleToWinError::Unsupported(
            "Restarting Windows is only supported on Windows".to_string(),
        ))
    }
}
