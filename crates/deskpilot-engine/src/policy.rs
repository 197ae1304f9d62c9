//! Safety policy gate.
//!
//! Four pure checks over the allow-lists in [`SafetyConfig`], evaluated
//! synchronously before a gated action reaches its backend. An absent list
//! means the category is unrestricted; an empty list denies the whole
//! category. No hidden state, no side effects.

use std::path::Path;

use deskpilot_core::SafetyConfig;

use crate::error::PolicyError;

/// Policy gate over a borrowed safety configuration.
pub struct PolicyGate<'a> {
    safety: &'a SafetyConfig,
}

impl<'a> PolicyGate<'a> {
    pub fn new(safety: &'a SafetyConfig) -> Self {
        Self { safety }
    }

    /// `open_app` gate: exact membership in `allow_apps`.
    pub fn check_app(&self, app: &str) -> Result<(), PolicyError> {
        match &self.safety.allow_apps {
            Some(allowed) if !allowed.iter().any(|a| a == app) => {
                Err(PolicyError::AppNotAllowed(app.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// `open_browser` gate: any listed prefix may match.
    pub fn check_url(&self, url: &str) -> Result<(), PolicyError> {
        match &self.safety.allow_urls {
            Some(prefixes) if !prefixes.iter().any(|p| url.starts_with(p.as_str())) => {
                Err(PolicyError::UrlNotAllowed(url.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// `run_command` gate: the first whitespace-delimited token must be listed.
    pub fn check_command(&self, command: &str) -> Result<(), PolicyError> {
        let Some(allowed) = &self.safety.allow_commands else {
            return Ok(());
        };
        match command.split_whitespace().next() {
            Some(token) if allowed.iter().any(|c| c == token) => Ok(()),
            Some(token) => Err(PolicyError::CommandNotAllowed(token.to_string())),
            // A blank command has no token to check against the list.
            None => Err(PolicyError::CommandNotAllowed(command.to_string())),
        }
    }

    /// `delete_file` gate: two-key safety. The policy requires confirmation
    /// and the step must carry explicit `confirm: true`.
    pub fn check_delete(&self, path: &Path, confirm: bool) -> Result<(), PolicyError> {
        if self.safety.destructive_confirm && !confirm {
            return Err(PolicyError::ConfirmRequired(path.display().to_string()));
        }
        Ok(())
    }
}
