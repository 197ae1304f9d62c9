//! App launching and window control handlers.

use tracing::{debug, info};

use crate::error::ExecError;
use crate::handler::ExecContext;

/// Launch an app through the OS search surface, policy permitting.
pub fn open_app(ctx: &ExecContext, app: &str) -> Result<(), ExecError> {
    ctx.policy().check_app(app)?;
    info!(app = %app, "Launching app");
    ctx.launcher()?.launch_by_search(app)?;
    Ok(())
}

/// Open a URL in the default browser, policy permitting.
pub fn open_browser(ctx: &ExecContext, url: &str) -> Result<(), ExecError> {
    ctx.policy().check_url(url)?;
    info!(url = %url, "Opening URL");
    ctx.launcher()?.open_url(url)?;
    Ok(())
}

/// Activate the first window whose title matches.
///
/// Non-exact matching is case-insensitive substring; exact matching compares
/// the full title. Blank titles are never matched.
pub fn switch_window(ctx: &ExecContext, window_title: &str, exact: bool) -> Result<(), ExecError> {
    let windows = ctx.windows()?;
    let titles = windows.list_titles()?;
    let needle = window_title.to_lowercase();
    let target = titles.iter().find(|title| {
        if title.trim().is_empty() {
            return false;
        }
        if exact {
            title.as_str() == window_title
        } else {
            title.to_lowercase().contains(&needle)
        }
    });
    match target {
        Some(title) => {
            info!(window = %title, "Activating window");
            windows.activate(title)?;
            Ok(())
        }
        None => Err(ExecError::NotFound(format!(
            "window not found: {}",
            window_title
        ))),
    }
}

/// Close matching windows and/or terminate matching processes.
///
/// This handler is deliberately lenient: absent capabilities are skipped and
/// individual close/terminate failures are logged and ignored, because the
/// target may already be gone by the time we act on it.
pub fn close_app(
    ctx: &ExecContext,
    app: Option<&str>,
    window_title: Option<&str>,
) -> Result<(), ExecError> {
    if let Some(title) = window_title {
        if let Some(windows) = &ctx.caps.windows {
            let needle = title.to_lowercase();
            match windows.list_titles() {
                Ok(titles) => {
                    for t in titles.iter().filter(|t| t.to_lowercase().contains(&needle)) {
                        info!(window = %t, "Closing window");
                        if let Err(e) = windows.close(t) {
                            debug!(window = %t, error = %e, "Window close failed");
                        }
                    }
                }
                Err(e) => debug!(error = %e, "Window enumeration failed"),
            }
        } else {
            debug!("Window capability absent, skipping window close");
        }
    }

    if let Some(app) = app {
        if let Some(processes) = &ctx.caps.processes {
            let needle = app.to_lowercase();
            match processes.list() {
                Ok(procs) => {
                    for proc in procs.iter().filter(|p| p.name.to_lowercase().contains(&needle)) {
                        info!(process = %proc.name, "Terminating process");
                        if let Err(e) = processes.terminate(&proc.name) {
                            debug!(process = %proc.name, error = %e, "Terminate failed");
                        }
                    }
                }
                Err(e) => debug!(error = %e, "Process enumeration failed"),
            }
        } else {
            debug!("Process capability absent, skipping process terminate");
        }
    }

    Ok(())
}
