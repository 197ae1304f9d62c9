//! The step interpreter.
//!
//! Walks a validated [`Plan`] strictly in order on the calling thread:
//! no reordering, no parallelism, no state carried between steps beyond the
//! read-only configuration. A failing step aborts the whole run, wrapped
//! with its 1-based index and action name; branches recurse into their
//! sub-sequences, which re-count from 1.
//!
//! Dry-run is a pure audit pass: it records what would execute and touches
//! neither the safety policy nor any capability backend, so a plan that
//! would violate policy still dry-runs cleanly.

use chrono::{DateTime, Utc};
use deskpilot_core::plan::{Action, Plan};
use deskpilot_core::{EngineConfig, SafetyConfig};
use deskpilot_desktop::DesktopCapabilities;
use tracing::{debug, info};
use uuid::Uuid;

use crate::condition;
use crate::error::ExecError;
use crate::handler::{self, ExecContext};

/// One dry-run trace record: what step N would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    /// 1-based step index.
    pub index: usize,
    /// Wire name of the action.
    pub action: String,
    /// Human-readable description of the step.
    pub description: String,
}

/// Summary of one plan run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    /// Top-level steps completed (equals the plan length on success).
    pub steps_completed: usize,
    /// Populated for dry runs only.
    pub trace: Vec<TraceRecord>,
}

/// Sequential plan interpreter.
///
/// All collaborators are injected at construction; there is no ambient
/// default policy or provider.
pub struct Interpreter {
    caps: DesktopCapabilities,
    safety: SafetyConfig,
    config: EngineConfig,
}

impl Interpreter {
    pub fn new(caps: DesktopCapabilities, safety: SafetyConfig, config: EngineConfig) -> Self {
        Self {
            caps,
            safety,
            config,
        }
    }

    /// Execute every step of the plan, in order, aborting on first failure.
    pub fn run(&self, plan: &Plan) -> Result<RunReport, ExecError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, steps = plan.len(), "Plan execution started");

        self.execute_steps(plan.steps())?;

        info!(%run_id, "Plan execution completed");
        Ok(RunReport {
            run_id,
            started_at,
            dry_run: false,
            steps_completed: plan.len(),
            trace: Vec::new(),
        })
    }

    /// Record what the plan would do without executing anything.
    ///
    /// No handler runs, no policy check happens, no backend is touched.
    /// Branches are traced as single steps: taking one would require
    /// evaluating its condition against the live environment.
    pub fn dry_run(&self, plan: &Plan) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, steps = plan.len(), "Dry run started");

        let trace: Vec<TraceRecord> = plan
            .steps()
            .iter()
            .enumerate()
            .map(|(i, action)| {
                let record = TraceRecord {
                    index: i + 1,
                    action: action.name().to_string(),
                    description: action.describe(),
                };
                info!(
                    step = record.index,
                    action = %record.action,
                    detail = %record.description,
                    "DRY-RUN"
                );
                record
            })
            .collect();

        RunReport {
            run_id,
            started_at,
            dry_run: true,
            steps_completed: plan.len(),
            trace,
        }
    }

    fn execute_steps(&self, steps: &[Action]) -> Result<(), ExecError> {
        for (i, action) in steps.iter().enumerate() {
            self.execute_action(action).map_err(|e| ExecError::Step {
                index: i + 1,
                action: action.name().to_string(),
                source: Box::new(e),
            })?;
        }
        Ok(())
    }

    fn execute_action(&self, action: &Action) -> Result<(), ExecError> {
        debug!(action = %action.name(), detail = %action.describe(), "Executing step");
        let ctx = ExecContext {
            caps: &self.caps,
            safety: &self.safety,
            config: &self.config,
        };

        match action {
            Action::OpenApp { app } => handler::app_window::open_app(&ctx, app),
            Action::OpenBrowser { url } => handler::app_window::open_browser(&ctx, url),
            Action::SwitchWindow {
                window_title,
                exact,
            } => handler::app_window::switch_window(&ctx, window_title, *exact),
            Action::CloseApp { app, window_title } => handler::app_window::close_app(
                &ctx,
                app.as_deref(),
                window_title.as_deref(),
            ),
            Action::KeyboardType {
                text,
                interval_secs,
            } => handler::input::keyboard_type(&ctx, text, *interval_secs),
            Action::KeyboardPress { key } => handler::input::keyboard_press(&ctx, key),
            Action::KeyboardShortcut { keys } => {
                handler::input::keyboard_shortcut(&ctx, keys)
            }
            Action::MouseClick {
                position,
                button,
                clicks,
                interval_secs,
            } => handler::input::mouse_click(&ctx, *position, *button, *clicks, *interval_secs),
            Action::MouseMove {
                position,
                duration_secs,
            } => handler::input::mouse_move(&ctx, *position, *duration_secs),
            Action::MouseDrag {
                from,
                to,
                duration_secs,
                button,
            } => handler::input::mouse_drag(&ctx, *from, *to, *duration_secs, *button),
            Action::Scroll { amount } => handler::input::scroll(&ctx, *amount),
            Action::FindAndClickImage {
                image,
                confidence,
                timeout_secs,
                click,
            } => handler::vision::find_and_click_image(
                &ctx,
                image,
                *confidence,
                *timeout_secs,
                *click,
            ),
            Action::WaitForImage {
                image,
                confidence,
                timeout_secs,
            } => {
                // Timeout is a boolean result, never an error.
                let found =
                    handler::vision::wait_for_image(&ctx, image, *confidence, *timeout_secs)?;
                info!(image = %image.display(), found, "wait_for_image result");
                Ok(())
            }
            Action::ReadTextFromScreen { region, lang } => {
                let text = handler::vision::read_text_from_screen(&ctx, *region, lang)?;
                debug!(text = %text, "OCR result");
                Ok(())
            }
            Action::CopyFile { source, target } => {
                handler::filesystem::copy_file(source, target)
            }
            Action::MoveFile { source, target } => {
                handler::filesystem::move_file(source, target)
            }
            Action::DeleteFile { path, confirm } => {
                handler::filesystem::delete_file(&ctx, path, *confirm)
            }
            Action::CreateFolder { path } => handler::filesystem::create_folder(path),
            Action::RunCommand { command, cwd } => {
                handler::system::run_command(&ctx, command, cwd.as_deref())?;
                Ok(())
            }
            Action::TakeScreenshot { path, region } => {
                handler::vision::take_screenshot(&ctx, path, *region)
            }
            Action::Wait { seconds } => {
                handler::system::wait(*seconds);
                Ok(())
            }
            Action::IfCondition {
                condition: expr,
                then_steps,
                else_steps,
            } => {
                let taken = condition::evaluate(expr, &self.caps, &self.config);
                debug!(condition = %expr, result = taken, "Branch evaluated");
                if taken {
                    self.execute_steps(then_steps)
                } else {
                    self.execute_steps(else_steps)
                }
            }
        }
    }
}
