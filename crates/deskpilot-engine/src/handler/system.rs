//! Shell command and timing handlers.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use deskpilot_core::paths;
use tracing::{debug, info};

use crate::error::ExecError;
use crate::handler::ExecContext;

/// Spawn a shell command and block until it exits, returning the exit code.
///
/// The first whitespace-delimited token is checked against the command
/// allow-list before anything is spawned. There is deliberately no timeout:
/// a hung child hangs the plan, and a caller who needs a bound wraps the
/// command with the platform's own timeout tool.
pub fn run_command(ctx: &ExecContext, command: &str, cwd: Option<&Path>) -> Result<i32, ExecError> {
    ctx.policy().check_command(command)?;
    info!(command = %command, "Running command");

    let mut cmd = shell_command(command);
    if let Some(cwd) = cwd {
        cmd.current_dir(paths::normalize(cwd));
    }
    let status = cmd.status()?;
    let code = status.code().unwrap_or(-1);
    info!(exit_code = code, "Command finished");
    Ok(code)
}

fn shell_command(command: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
    #[cfg(not(target_os = "windows"))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

/// Blocking sleep; negative durations clamp to zero.
pub fn wait(seconds: f64) {
    let secs = seconds.max(0.0);
    debug!(seconds = secs, "Sleeping");
    std::thread::sleep(Duration::from_secs_f64(secs));
}
