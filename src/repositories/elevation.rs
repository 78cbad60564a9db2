//! Elevation helpers - query the process token and relaunch as admin.

use crate::error::{PoleToWinError, Result};

/// Answers "is the current process elevated" before every mutating action.
pub trait Elevation {
    fn is_elevated(&self) -> bool;
}

/// Queries the token of the running process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessElevation;

impl Elevation for ProcessElevation {
    fn is_elevated(&self) -> bool {
        is_admin()
    }
}

/// A fixed answer, for hosts that decide elevation some other way.
impl Elevation for bool {
    fn is_elevated(&self) -> bool {
        *self
    }
}

/// Check if the current process is running with admin privileges
#[must_use]
pub fn is_admin() -> bool {
    #[cfg(windows)]
    {
        use windows::Win32::Foundation::{CloseHandle, HANDLE};
        use windows::Win32::Security::{
            GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
        };
        use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

        unsafe {
            let mut token = HANDLE::default();

            if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &raw mut token).is_err() {
                return false;
            }

            let mut elevation = TOKEN_ELEVATION::default();
            let mut return_length = 0u32;

            #[allow(clippy::cast_possible_truncation)]
            let result = GetTokenInformation(
                token,
                TokenElevation,
                Some((&raw mut elevation).cast()),
                std::mem::size_of::<TOKEN_ELEVATION>() as u32,
                &raw mut return_length,
            );

            let _ = CloseHandle(token);

            result.is_ok() && elevation.TokenIsElevated != 0
        }
    }

    #[cfg(not(windows))]
    {
        false
    }
}

/// Relaunch the current executable elevated, then exit this process.
///
/// # Errors
///
/// Returns error if the executable path cannot be determined, if PowerShell
/// fails to spawn, or when not running on Windows.
pub fn restart_as_admin() -> Result<()> {
    #[cfg(windows)]
    {
        let exe_path = std::env::current_exe().map_err(|e| {
            PoleToWinError::SystemCommand(format!("Failed to get executable path: {e}"))
        })?;

        std::process::Command::new("powershell")
            .args([
                "-Command",
                &format!(
                    "Start-Process -FilePath '{}' -Verb RunAs",
                    exe_path.display()
                ),
            ])
            .spawn()
            .map_err(|e| {
                PoleToWinError::SystemCommand(format!("Failed to restart as admin: {e}"))
            })?;

        tracing::info!("Relaunched elevated, exiting");
        std::process::exit(0);
    }

    #[cfg(not(windows))]
    {
        Err(PoleToWinError::Unsupported(
            "Restart as admin is only supported on Windows".to_string(),
        ))
    }
}
