//! deskpilot binary — composition root.
//!
//! Ties the workspace crates into one executable:
//! 1. Parse CLI arguments
//! 2. Initialize tracing
//! 3. Load runtime config (TOML) and safety config (JSON)
//! 4. Load the plan from inline JSON or a file path
//! 5. Run (or dry-run) the plan through the interpreter
//!
//! The process exits non-zero when plan parsing or execution fails, and
//! zero on full (or dry-run) completion.
//!
//! No desktop backend is wired here: input injection, vision, OCR, window
//! and process control are external collaborators injected through the
//! library API (`DesktopCapabilities`). Without them the binary still
//! handles dry runs, filesystem steps, shell commands, waits, and
//! `file_exists` branching; desktop-facing steps fail fast naming the
//! missing capability.

mod cli;

use std::path::Path;

use clap::Parser;

use deskpilot_core::{PilotConfig, Plan, SafetyConfig};
use deskpilot_desktop::DesktopCapabilities;
use deskpilot_engine::Interpreter;

use cli::CliArgs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first, so the CLI log-level override can win over it.
    let config_path = args.resolve_config_path();
    let config = PilotConfig::load_or_default(&config_path);

    let log_level = args
        .resolve_log_level()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting deskpilot v{}", env!("CARGO_PKG_VERSION"));

    let safety = match args.safety {
        Some(ref path) => SafetyConfig::load(path)?,
        None => SafetyConfig::default(),
    };

    let plan = load_plan(&args.plan)?;
    tracing::info!(steps = plan.len(), "Plan loaded");

    let interpreter = Interpreter::new(DesktopCapabilities::none(), safety, config.engine);

    if args.dry {
        let report = interpreter.dry_run(&plan);
        tracing::info!(run_id = %report.run_id, steps = report.steps_completed, "Dry run complete");
    } else {
        let report = interpreter.run(&plan)?;
        tracing::info!(run_id = %report.run_id, steps = report.steps_completed, "Run complete");
    }

    Ok(())
}

/// Load a plan from a file path or inline JSON text.
///
/// If the argument names an existing file, its contents are the plan;
/// otherwise the argument itself is parsed as JSON.
fn load_plan(arg: &str) -> Result<Plan, Box<dyn std::error::Error>> {
    let path = Path::new(arg);
    let text = if path.exists() {
        tracing::info!(path = %path.display(), "Reading plan file");
        std::fs::read_to_string(path)?
    } else {
        arg.to_string()
    };
    Ok(Plan::from_json(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_plan_inline_json() {
        let plan = load_plan(r#"[{"action": "wait", "params": {"seconds": 1}}]"#).unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_load_plan_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"action": "scroll", "params": {"amount": 3}}]"#)
            .unwrap();
        let plan = load_plan(file.path().to_str().unwrap()).unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_load_plan_invalid_text() {
        assert!(load_plan("definitely not json or a file").is_err());
    }

    #[test]
    fn test_load_plan_malformed_step_fails() {
        let err = load_plan(r#"[{"action": ""}]"#).unwrap_err();
        assert!(err.to_string().contains("missing or empty 'action'"));
    }
}
