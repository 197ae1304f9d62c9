//! Restricted boolean condition grammar for branching steps.
//!
//! Conditions are function-call-shaped text over live environment state:
//!
//! ```text
//! condition := "not" WS leaf | leaf
//! leaf      := "window_open" "(" ARGS ")"
//!            | "image_visible" "(" ARGS ")"
//!            | "file_exists" "(" ARGS ")"
//! ```
//!
//! Parsing is purely syntactic prefix/suffix matching — deliberately not a
//! general expression evaluator, so plan text can never execute code.
//! Unknown names and malformed text evaluate to `false` rather than failing
//! the plan: a branch not taken beats an aborted run when the producer is a
//! planner emitting a vocabulary slightly ahead of ours.
//!
//! Known grammar limitation: `not` is stripped once only, so `not not x`
//! does not parse (and therefore evaluates false like any unparseable
//! condition). Evaluation re-queries the capability provider every time;
//! nothing is cached between checks.

use std::path::{Path, PathBuf};

use deskpilot_core::{paths, EngineConfig};
use deskpilot_desktop::DesktopCapabilities;
use tracing::debug;

/// A parsed condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Any enumerable window title contains the substring, case-insensitive.
    WindowOpen(String),
    /// The image is on screen at or above the confidence threshold.
    /// Without an explicit confidence the engine default applies.
    ImageVisible {
        path: PathBuf,
        confidence: Option<f64>,
    },
    /// The normalized absolute path exists right now (TOCTOU accepted).
    FileExists(PathBuf),
    Not(Box<Condition>),
}

impl Condition {
    /// Parse a condition string. `None` means the text is not in the
    /// grammar; callers treat that as a false condition.
    pub fn parse(expr: &str) -> Option<Condition> {
        let s = expr.trim();
        if let Some(rest) = strip_not(s) {
            // Single-level negation only: the remainder must be a leaf.
            return parse_leaf(rest.trim()).map(|c| Condition::Not(Box::new(c)));
        }
        parse_leaf(s)
    }

    /// Evaluate against live environment state.
    pub fn eval(&self, caps: &DesktopCapabilities, config: &EngineConfig) -> bool {
        match self {
            Condition::Not(inner) => !inner.eval(caps, config),
            Condition::WindowOpen(substr) => window_open(caps, substr),
            Condition::ImageVisible { path, confidence } => image_visible(
                caps,
                path,
                confidence.unwrap_or(config.condition_image_confidence),
            ),
            Condition::FileExists(path) => paths::normalize(path).exists(),
        }
    }
}

/// Parse and evaluate in one step; unknown or malformed text is `false`.
pub fn evaluate(expr: &str, caps: &DesktopCapabilities, config: &EngineConfig) -> bool {
    match Condition::parse(expr) {
        Some(condition) => condition.eval(caps, config),
        None => {
            debug!(condition = %expr, "Unknown condition, evaluating to false");
            false
        }
    }
}

/// Strip a leading case-insensitive `not` followed by whitespace.
fn strip_not(s: &str) -> Option<&str> {
    let mut chars = s.char_indices();
    let (_, c1) = chars.next()?;
    let (_, c2) = chars.next()?;
    let (_, c3) = chars.next()?;
    let (i4, c4) = chars.next()?;
    if c1.eq_ignore_ascii_case(&'n')
        && c2.eq_ignore_ascii_case(&'o')
        && c3.eq_ignore_ascii_case(&'t')
        && c4.is_whitespace()
    {
        Some(&s[i4 + c4.len_utf8()..])
    } else {
        None
    }
}

fn parse_leaf(s: &str) -> Option<Condition> {
    if let Some(arg) = extract_call(s, "window_open") {
        return Some(Condition::WindowOpen(strip_quotes(arg).to_string()));
    }
    if let Some(arg) = extract_call(s, "image_visible") {
        return Some(parse_image_visible(arg));
    }
    if let Some(arg) = extract_call(s, "file_exists") {
        return Some(Condition::FileExists(PathBuf::from(strip_quotes(arg))));
    }
    None
}

/// Match `name(` ... `)` and return the raw argument text.
fn extract_call<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')
}

/// `image_visible` takes a path and an optional trailing confidence. The
/// split only happens when the tail actually parses as an in-range float;
/// anything else is treated as a single path argument.
fn parse_image_visible(arg: &str) -> Condition {
    if let Some((head, tail)) = arg.rsplit_once(',') {
        if let Ok(conf) = tail.trim().parse::<f64>() {
            if (0.0..=1.0).contains(&conf) {
                return Condition::ImageVisible {
                    path: PathBuf::from(strip_quotes(head)),
                    confidence: Some(conf),
                };
            }
        }
    }
    Condition::ImageVisible {
        path: PathBuf::from(strip_quotes(arg)),
        confidence: None,
    }
}

/// Strip a single layer of matching quotes, if present.
fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn window_open(caps: &DesktopCapabilities, substr: &str) -> bool {
    let Some(windows) = &caps.windows else {
        return false;
    };
    match windows.list_titles() {
        Ok(titles) => {
            let needle = substr.to_lowercase();
            titles
                .iter()
                .filter(|t| !t.trim().is_empty())
                .any(|t| t.to_lowercase().contains(&needle))
        }
        Err(e) => {
            debug!(error = %e, "Window enumeration failed, condition is false");
            false
        }
    }
}

fn image_visible(caps: &DesktopCapabilities, path: &Path, confidence: f64) -> bool {
    let Some(vision) = &caps.vision else {
        return false;
    };
    let normalized = paths::normalize(path);
    match vision.locate_image(&normalized, confidence) {
        Ok(found) => found.is_some(),
        Err(e) => {
            debug!(error = %e, "Image lookup failed, condition is false");
            false
        }
    }
}
