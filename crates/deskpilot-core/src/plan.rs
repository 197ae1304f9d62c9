//! Plan and step data model.
//!
//! A plan is an ordered sequence of `{action, params}` records. The wire
//! shape (`RawStep`) is validated into a closed, typed [`Action`] vocabulary
//! at parse time: unknown actions, missing parameters, wrong types, and
//! out-of-range values all fail the whole plan before anything executes.
//! The interpreter then dispatches on the enum exhaustively, so adding an
//! action is a compile-time exercise rather than a registry mutation.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PlanError;

/// Default pause between keystrokes for `keyboard_type`, in seconds.
pub const DEFAULT_TYPE_INTERVAL_SECS: f64 = 0.02;
/// Default pause between multi-clicks for `mouse_click`, in seconds.
pub const DEFAULT_CLICK_INTERVAL_SECS: f64 = 0.1;
/// Default cursor travel time for `mouse_move`, in seconds.
pub const DEFAULT_MOVE_DURATION_SECS: f64 = 0.2;
/// Default drag travel time for `mouse_drag`, in seconds.
pub const DEFAULT_DRAG_DURATION_SECS: f64 = 0.3;
/// Default match confidence for image location.
pub const DEFAULT_LOCATE_CONFIDENCE: f64 = 0.85;
/// Default timeout for `find_and_click_image`, in seconds.
pub const DEFAULT_FIND_TIMEOUT_SECS: f64 = 10.0;
/// Default timeout for `wait_for_image`, in seconds.
pub const DEFAULT_WAIT_TIMEOUT_SECS: f64 = 15.0;
/// Default OCR language for `read_text_from_screen`.
pub const DEFAULT_OCR_LANG: &str = "eng";

// =============================================================================
// Value types
// =============================================================================

/// Mouse button selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MouseButton::Left => write!(f, "left"),
            MouseButton::Middle => write!(f, "middle"),
            MouseButton::Right => write!(f, "right"),
        }
    }
}

impl std::str::FromStr for MouseButton {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(MouseButton::Left),
            "middle" => Ok(MouseButton::Middle),
            "right" => Ok(MouseButton::Right),
            _ => Err(format!("Unknown mouse button: {}", s)),
        }
    }
}

/// Rectangular screen region, `[x, y, width, height]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// Raw steps and typed actions
// =============================================================================

/// One unvalidated `{action, params}` record as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStep {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub params: Value,
}

/// The closed action vocabulary.
///
/// One variant per supported operation; parameter defaults and range checks
/// are applied when a [`Plan`] is parsed, so every carried value is already
/// validated by the time the interpreter sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenApp {
        app: String,
    },
    OpenBrowser {
        url: String,
    },
    SwitchWindow {
        window_title: String,
        exact: bool,
    },
    CloseApp {
        app: Option<String>,
        window_title: Option<String>,
    },
    KeyboardType {
        text: String,
        interval_secs: f64,
    },
    KeyboardPress {
        key: String,
    },
    KeyboardShortcut {
        keys: Vec<String>,
    },
    MouseClick {
        position: Option<(i32, i32)>,
        button: MouseButton,
        clicks: u32,
        interval_secs: f64,
    },
    MouseMove {
        position: (i32, i32),
        duration_secs: f64,
    },
    MouseDrag {
        from: (i32, i32),
        to: (i32, i32),
        duration_secs: f64,
        button: MouseButton,
    },
    Scroll {
        amount: i64,
    },
    FindAndClickImage {
        image: PathBuf,
        confidence: f64,
        timeout_secs: f64,
        click: bool,
    },
    WaitForImage {
        image: PathBuf,
        confidence: f64,
        timeout_secs: f64,
    },
    ReadTextFromScreen {
        region: Option<Region>,
        lang: String,
    },
    CopyFile {
        source: PathBuf,
        target: PathBuf,
    },
    MoveFile {
        source: PathBuf,
        target: PathBuf,
    },
    DeleteFile {
        path: PathBuf,
        confirm: bool,
    },
    CreateFolder {
        path: PathBuf,
    },
    RunCommand {
        command: String,
        cwd: Option<PathBuf>,
    },
    TakeScreenshot {
        path: PathBuf,
        region: Option<Region>,
    },
    Wait {
        seconds: f64,
    },
    IfCondition {
        condition: String,
        then_steps: Vec<Action>,
        else_steps: Vec<Action>,
    },
}

impl Action {
    /// The wire name of this action.
    pub fn name(&self) -> &'static str {
        match self {
            Action::OpenApp { .. } => "open_app",
            Action::OpenBrowser { .. } => "open_browser",
            Action::SwitchWindow { .. } => "switch_window",
            Action::CloseApp { .. } => "close_app",
            Action::KeyboardType { .. } => "keyboard_type",
            Action::KeyboardPress { .. } => "keyboard_press",
            Action::KeyboardShortcut { .. } => "keyboard_shortcut",
            Action::MouseClick { .. } => "mouse_click",
            Action::MouseMove { .. } => "mouse_move",
            Action::MouseDrag { .. } => "mouse_drag",
            Action::Scroll { .. } => "scroll",
            Action::FindAndClickImage { .. } => "find_and_click_image",
            Action::WaitForImage { .. } => "wait_for_image",
            Action::ReadTextFromScreen { .. } => "read_text_from_screen",
            Action::CopyFile { .. } => "copy_file",
            Action::MoveFile { .. } => "move_file",
            Action::DeleteFile { .. } => "delete_file",
            Action::CreateFolder { .. } => "create_folder",
            Action::RunCommand { .. } => "run_command",
            Action::TakeScreenshot { .. } => "take_screenshot",
            Action::Wait { .. } => "wait",
            Action::IfCondition { .. } => "if_condition",
        }
    }

    /// Human-readable one-liner for logs and dry-run traces.
    pub fn describe(&self) -> String {
        match self {
            Action::OpenApp { app } => format!("Launch app: {}", app),
            Action::OpenBrowser { url } => format!("Open URL: {}", url),
            Action::SwitchWindow { window_title, exact } => {
                if *exact {
                    format!("Activate window (exact): {}", window_title)
                } else {
                    format!("Activate window: {}", window_title)
                }
            }
            Action::CloseApp { app, window_title } => match (app, window_title) {
                (Some(a), Some(w)) => format!("Close app {} and window {}", a, w),
                (Some(a), None) => format!("Close app {}", a),
                (None, Some(w)) => format!("Close window {}", w),
                (None, None) => "Close app".to_string(),
            },
            Action::KeyboardType { text, .. } => format!("Type text: {}", text),
            Action::KeyboardPress { key } => format!("Press key: {}", key),
            Action::KeyboardShortcut { keys } => {
                format!("Press shortcut: {}", keys.join(" + "))
            }
            Action::MouseClick {
                position,
                button,
                clicks,
                ..
            } => match position {
                Some((x, y)) => format!("Click {} at ({}, {}) x{}", button, x, y, clicks),
                None => format!("Click {} at cursor x{}", button, clicks),
            },
            Action::MouseMove { position: (x, y), .. } => {
                format!("Move cursor to ({}, {})", x, y)
            }
            Action::MouseDrag {
                from: (x1, y1),
                to: (x2, y2),
                button,
                ..
            } => format!("Drag {} from ({}, {}) to ({}, {})", button, x1, y1, x2, y2),
            Action::Scroll { amount } => format!("Scroll by {}", amount),
            Action::FindAndClickImage { image, .. } => {
                format!("Find and click image {}", image.display())
            }
            Action::WaitForImage { image, .. } => {
                format!("Wait for image {}", image.display())
            }
            Action::ReadTextFromScreen { region, .. } => match region {
                Some(r) => format!(
                    "Read text from region ({}, {}, {}, {})",
                    r.x, r.y, r.width, r.height
                ),
                None => "Read text from full screen".to_string(),
            },
            Action::CopyFile { source, target } => {
                format!("Copy file {} to {}", source.display(), target.display())
            }
            Action::MoveFile { source, target } => {
                format!("Move file {} to {}", source.display(), target.display())
            }
            Action::DeleteFile { path, .. } => format!("Delete {}", path.display()),
            Action::CreateFolder { path } => format!("Create folder {}", path.display()),
            Action::RunCommand { command, .. } => format!("Run command: {}", command),
            Action::TakeScreenshot { path, .. } => {
                format!("Save screenshot to {}", path.display())
            }
            Action::Wait { seconds } => format!("Wait {} seconds", seconds),
            Action::IfCondition { condition, .. } => {
                format!("Branch on condition: {}", condition)
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Plan
// =============================================================================

/// A validated, ordered sequence of actions.
///
/// Owned by the caller and only read by the interpreter. Step order is
/// significant and defines execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    steps: Vec<Action>,
}

impl Plan {
    /// Parse and validate raw steps into a plan.
    pub fn parse(raw: &[RawStep]) -> Result<Self, PlanError> {
        Ok(Self {
            steps: parse_steps(raw)?,
        })
    }

    /// Parse a plan from JSON text (a JSON array of step records).
    pub fn from_json(text: &str) -> Result<Self, PlanError> {
        let raw: Vec<RawStep> = serde_json::from_str(text)?;
        Self::parse(&raw)
    }

    /// The validated steps, in execution order.
    pub fn steps(&self) -> &[Action] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn parse_steps(raw: &[RawStep]) -> Result<Vec<Action>, PlanError> {
    raw.iter()
        .enumerate()
        .map(|(i, step)| parse_step(i + 1, step))
        .collect()
}

fn parse_step(index: usize, step: &RawStep) -> Result<Action, PlanError> {
    let name = step.action.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        return Err(PlanError::MissingAction { index });
    }

    let p = Params::new(index, name, &step.params)?;
    match name {
        "open_app" => {
            let app = p.req_name("app")?;
            p.finish(&["app"])?;
            Ok(Action::OpenApp { app })
        }
        "open_browser" => {
            let url = p.req_name("url")?;
            p.finish(&["url"])?;
            Ok(Action::OpenBrowser { url })
        }
        "switch_window" => {
            let window_title = p.req_name("window_title")?;
            let exact = p.bool_or("exact", false)?;
            p.finish(&["window_title", "exact"])?;
            Ok(Action::SwitchWindow { window_title, exact })
        }
        "close_app" => {
            let app = p.opt_str("app")?;
            let window_title = p.opt_str("window_title")?;
            if app.is_none() && window_title.is_none() {
                return Err(p.err("requires 'app' or 'window_title'"));
            }
            p.finish(&["app", "window_title"])?;
            Ok(Action::CloseApp { app, window_title })
        }
        "keyboard_type" => {
            let text = p.req_str("text")?;
            let interval_secs =
                p.non_negative_or("interval", DEFAULT_TYPE_INTERVAL_SECS)?;
            p.finish(&["text", "interval"])?;
            Ok(Action::KeyboardType {
                text,
                interval_secs,
            })
        }
        "keyboard_press" => {
            let key = p.req_name("key")?;
            p.finish(&["key"])?;
            Ok(Action::KeyboardPress { key })
        }
        "keyboard_shortcut" => {
            let keys = p.req_keys("keys")?;
            p.finish(&["keys"])?;
            Ok(Action::KeyboardShortcut { keys })
        }
        "mouse_click" => {
            let position = p.opt_position("position")?;
            let button = p.button_or("button")?;
            let clicks = p.clicks_or("clicks", 1)?;
            let interval_secs =
                p.non_negative_or("interval", DEFAULT_CLICK_INTERVAL_SECS)?;
            p.finish(&["position", "button", "clicks", "interval"])?;
            Ok(Action::MouseClick {
                position,
                button,
                clicks,
                interval_secs,
            })
        }
        "mouse_move" => {
            let position = p.req_position("position")?;
            let duration_secs =
                p.non_negative_or("duration", DEFAULT_MOVE_DURATION_SECS)?;
            p.finish(&["position", "duration"])?;
            Ok(Action::MouseMove {
                position,
                duration_secs,
            })
        }
        "mouse_drag" => {
            let from = p.req_position("from_pos")?;
            let to = p.req_position("to_pos")?;
            let duration_secs =
                p.non_negative_or("duration", DEFAULT_DRAG_DURATION_SECS)?;
            let button = p.button_or("button")?;
            p.finish(&["from_pos", "to_pos", "duration", "button"])?;
            Ok(Action::MouseDrag {
                from,
                to,
                duration_secs,
                button,
            })
        }
        "scroll" => {
            let amount = p.req_i64("amount")?;
            p.finish(&["amount"])?;
            Ok(Action::Scroll { amount })
        }
        "find_and_click_image" => {
            let image = p.req_path("image")?;
            let confidence = p.confidence_or("confidence", DEFAULT_LOCATE_CONFIDENCE)?;
            let timeout_secs = p.non_negative_or("timeout", DEFAULT_FIND_TIMEOUT_SECS)?;
            let click = p.bool_or("click", true)?;
            p.finish(&["image", "confidence", "timeout", "click"])?;
            Ok(Action::FindAndClickImage {
                image,
                confidence,
                timeout_secs,
                click,
            })
        }
        "wait_for_image" => {
            let image = p.req_path("image")?;
            let confidence = p.confidence_or("confidence", DEFAULT_LOCATE_CONFIDENCE)?;
            let timeout_secs = p.non_negative_or("timeout", DEFAULT_WAIT_TIMEOUT_SECS)?;
            p.finish(&["image", "confidence", "timeout"])?;
            Ok(Action::WaitForImage {
                image,
                confidence,
                timeout_secs,
            })
        }
        "read_text_from_screen" => {
            let region = p.opt_region("region")?;
            let lang = p.str_or("lang", DEFAULT_OCR_LANG)?;
            p.finish(&["region", "lang"])?;
            Ok(Action::ReadTextFromScreen { region, lang })
        }
        "copy_file" => {
            let source = p.req_path("source")?;
            let target = p.req_path("target")?;
            p.finish(&["source", "target"])?;
            Ok(Action::CopyFile { source, target })
        }
        "move_file" => {
            let source = p.req_path("source")?;
            let target = p.req_path("target")?;
            p.finish(&["source", "target"])?;
            Ok(Action::MoveFile { source, target })
        }
        "delete_file" => {
            let path = p.req_path("path")?;
            let confirm = p.bool_or("confirm", false)?;
            p.finish(&["path", "confirm"])?;
            Ok(Action::DeleteFile { path, confirm })
        }
        "create_folder" => {
            let path = p.req_path("path")?;
            p.finish(&["path"])?;
            Ok(Action::CreateFolder { path })
        }
        "run_command" => {
            let command = p.req_name("command")?;
            let cwd = p.opt_str("cwd")?.map(PathBuf::from);
            p.finish(&["command", "cwd"])?;
            Ok(Action::RunCommand { command, cwd })
        }
        "take_screenshot" => {
            let path = p.req_path("path")?;
            let region = p.opt_region("region")?;
            p.finish(&["path", "region"])?;
            Ok(Action::TakeScreenshot { path, region })
        }
        "wait" => {
            let seconds = p.req_f64("seconds")?;
            p.finish(&["seconds"])?;
            Ok(Action::Wait { seconds })
        }
        "if_condition" => {
            let condition = p.req_str("condition")?;
            let then_steps = p.req_steps("then")?;
            let else_steps = p.opt_steps("else")?;
            p.finish(&["condition", "then", "else"])?;
            Ok(Action::IfCondition {
                condition,
                then_steps,
                else_steps,
            })
        }
        _ => Err(PlanError::UnknownAction {
            index,
            action: name.to_string(),
        }),
    }
}

// =============================================================================
// Parameter extraction
// =============================================================================

/// Typed access to a step's `params` object with uniform error reporting.
struct Params<'a> {
    index: usize,
    action: &'a str,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Params<'a> {
    fn new(index: usize, action: &'a str, value: &'a Value) -> Result<Self, PlanError> {
        let map = match value {
            Value::Null => None,
            Value::Object(map) => Some(map),
            _ => {
                return Err(PlanError::InvalidParams {
                    index,
                    action: action.to_string(),
                    reason: "'params' must be an object".to_string(),
                })
            }
        };
        Ok(Self { index, action, map })
    }

    fn err(&self, reason: impl Into<String>) -> PlanError {
        PlanError::InvalidParams {
            index: self.index,
            action: self.action.to_string(),
            reason: reason.into(),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.and_then(|m| m.get(key))
    }

    /// Reject parameters outside the action's schema.
    fn finish(&self, allowed: &[&str]) -> Result<(), PlanError> {
        if let Some(map) = self.map {
            for key in map.keys() {
                if !allowed.contains(&key.as_str()) {
                    return Err(self.err(format!("unexpected parameter '{}'", key)));
                }
            }
        }
        Ok(())
    }

    fn opt_str(&self, key: &str) -> Result<Option<String>, PlanError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.err(format!("parameter '{}' must be a string", key))),
        }
    }

    fn req_str(&self, key: &str) -> Result<String, PlanError> {
        self.opt_str(key)?
            .ok_or_else(|| self.err(format!("missing required parameter '{}'", key)))
    }

    /// Required string that must be non-empty (app names, URLs, keys, ...).
    fn req_name(&self, key: &str) -> Result<String, PlanError> {
        let s = self.req_str(key)?;
        if s.trim().is_empty() {
            return Err(self.err(format!("parameter '{}' must not be empty", key)));
        }
        Ok(s)
    }

    fn str_or(&self, key: &str, default: &str) -> Result<String, PlanError> {
        Ok(self.opt_str(key)?.unwrap_or_else(|| default.to_string()))
    }

    fn req_path(&self, key: &str) -> Result<PathBuf, PlanError> {
        Ok(PathBuf::from(self.req_name(key)?))
    }

    fn opt_f64(&self, key: &str) -> Result<Option<f64>, PlanError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => match v.as_f64() {
                Some(n) if n.is_finite() => Ok(Some(n)),
                _ => Err(self.err(format!("parameter '{}' must be a number", key))),
            },
        }
    }

    fn req_f64(&self, key: &str) -> Result<f64, PlanError> {
        self.opt_f64(key)?
            .ok_or_else(|| self.err(format!("missing required parameter '{}'", key)))
    }

    fn non_negative_or(&self, key: &str, default: f64) -> Result<f64, PlanError> {
        let value = self.opt_f64(key)?.unwrap_or(default);
        if value < 0.0 {
            return Err(self.err(format!("parameter '{}' must not be negative", key)));
        }
        Ok(value)
    }

    fn confidence_or(&self, key: &str, default: f64) -> Result<f64, PlanError> {
        let value = self.opt_f64(key)?.unwrap_or(default);
        if !(0.0..=1.0).contains(&value) {
            return Err(self.err(format!(
                "parameter '{}' must be between 0.0 and 1.0",
                key
            )));
        }
        Ok(value)
    }

    fn req_i64(&self, key: &str) -> Result<i64, PlanError> {
        match self.get(key) {
            None | Some(Value::Null) => {
                Err(self.err(format!("missing required parameter '{}'", key)))
            }
            Some(v) => v
                .as_i64()
                .ok_or_else(|| self.err(format!("parameter '{}' must be an integer", key))),
        }
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool, PlanError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(self.err(format!("parameter '{}' must be a boolean", key))),
        }
    }

    fn button_or(&self, key: &str) -> Result<MouseButton, PlanError> {
        match self.opt_str(key)? {
            None => Ok(MouseButton::default()),
            Some(s) => s.parse().map_err(|e: String| self.err(e)),
        }
    }

    fn clicks_or(&self, key: &str, default: u32) -> Result<u32, PlanError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(v) => match v.as_u64() {
                Some(n) if n >= 1 && n <= u32::MAX as u64 => Ok(n as u32),
                _ => Err(self.err(format!(
                    "parameter '{}' must be a positive integer",
                    key
                ))),
            },
        }
    }

    fn opt_position(&self, key: &str) -> Result<Option<(i32, i32)>, PlanError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) if items.len() == 2 => {
                let x = items[0].as_i64();
                let y = items[1].as_i64();
                match (x, y) {
                    (Some(x), Some(y)) => Ok(Some((x as i32, y as i32))),
                    _ => Err(self.err(format!(
                        "parameter '{}' must be an [x, y] pair of integers",
                        key
                    ))),
                }
            }
            Some(_) => Err(self.err(format!(
                "parameter '{}' must be an [x, y] pair of integers",
                key
            ))),
        }
    }

    fn req_position(&self, key: &str) -> Result<(i32, i32), PlanError> {
        self.opt_position(key)?
            .ok_or_else(|| self.err(format!("missing required parameter '{}'", key)))
    }

    fn opt_region(&self, key: &str) -> Result<Option<Region>, PlanError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) if items.len() == 4 => {
                let x = items[0].as_i64();
                let y = items[1].as_i64();
                let w = items[2].as_u64();
                let h = items[3].as_u64();
                match (x, y, w, h) {
                    (Some(x), Some(y), Some(w), Some(h)) => Ok(Some(Region {
                        x: x as i32,
                        y: y as i32,
                        width: w as u32,
                        height: h as u32,
                    })),
                    _ => Err(self.err(format!(
                        "parameter '{}' must be an [x, y, width, height] array",
                        key
                    ))),
                }
            }
            Some(_) => Err(self.err(format!(
                "parameter '{}' must be an [x, y, width, height] array",
                key
            ))),
        }
    }

    fn req_keys(&self, key: &str) -> Result<Vec<String>, PlanError> {
        match self.get(key) {
            None | Some(Value::Null) => {
                Err(self.err(format!("missing required parameter '{}'", key)))
            }
            Some(Value::Array(items)) => {
                let keys: Option<Vec<String>> = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect();
                match keys {
                    Some(keys) if !keys.is_empty() => Ok(keys),
                    Some(_) => Err(self.err(format!("parameter '{}' must not be empty", key))),
                    None => Err(self.err(format!(
                        "parameter '{}' must be an array of strings",
                        key
                    ))),
                }
            }
            Some(_) => Err(self.err(format!(
                "parameter '{}' must be an array of strings",
                key
            ))),
        }
    }

    /// Required nested step sequence (branch bodies).
    fn req_steps(&self, key: &str) -> Result<Vec<Action>, PlanError> {
        match self.get(key) {
            None | Some(Value::Null) => {
                Err(self.err(format!("missing required parameter '{}'", key)))
            }
            Some(v) => self.parse_branch(key, v),
        }
    }

    /// Optional nested step sequence; absent means an empty branch.
    fn opt_steps(&self, key: &str) -> Result<Vec<Action>, PlanError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(v) => self.parse_branch(key, v),
        }
    }

    fn parse_branch(&self, key: &str, value: &Value) -> Result<Vec<Action>, PlanError> {
        let raw: Vec<RawStep> = serde_json::from_value(value.clone())
            .map_err(|e| self.err(format!("parameter '{}' must be an array of steps: {}", key, e)))?;
        // Nested errors keep their own (branch-local) 1-based indices.
        parse_steps(&raw)
    }
}

// =============================================================================
// Tests
// =============================================================================
