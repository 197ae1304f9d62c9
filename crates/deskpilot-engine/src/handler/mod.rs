//! Action handlers, grouped by concern.
//!
//! Each handler is a free function over an [`ExecContext`]; the interpreter
//! dispatches to them from its exhaustive match over the action vocabulary.
//! Gated handlers check the safety policy first, then talk to the backend.

pub mod app_window;
pub mod filesystem;
pub mod input;
pub mod system;
pub mod vision;

use std::time::Duration;

use deskpilot_core::{EngineConfig, SafetyConfig};
use deskpilot_desktop::{
    DesktopCapabilities, InputService, LauncherService, OcrService, ProcessService,
    VisionService, WindowService,
};

use crate::error::ExecError;
use crate::policy::PolicyGate;

/// Read-only execution context shared by all handlers.
///
/// Holds the capability set and configuration for one run; handlers resolve
/// the backend they need through the accessors below, failing fast with
/// `CapabilityUnavailable` when it is absent.
pub struct ExecContext<'a> {
    pub caps: &'a DesktopCapabilities,
    pub safety: &'a SafetyConfig,
    pub config: &'a EngineConfig,
}

impl ExecContext<'_> {
    pub fn policy(&self) -> PolicyGate<'_> {
        PolicyGate::new(self.safety)
    }

    /// Poll interval for perception-gated actions.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.poll_interval_ms)
    }

    pub fn input(&self) -> Result<&dyn InputService, ExecError> {
        self.caps
            .input
            .as_deref()
            .ok_or(ExecError::CapabilityUnavailable("input"))
    }

    pub fn vision(&self) -> Result<&dyn VisionService, ExecError> {
        self.caps
            .vision
            .as_deref()
            .ok_or(ExecError::CapabilityUnavailable("vision"))
    }

    pub fn ocr(&self) -> Result<&dyn OcrService, ExecError> {
        self.caps
            .ocr
            .as_deref()
            .ok_or(ExecError::CapabilityUnavailable("ocr"))
    }

    pub fn windows(&self) -> Result<&dyn WindowService, ExecError> {
        self.caps
            .windows
            .as_deref()
            .ok_or(ExecError::CapabilityUnavailable("windows"))
    }

    pub fn processes(&self) -> Result<&dyn ProcessService, ExecError> {
        self.caps
            .processes
            .as_deref()
            .ok_or(ExecError::CapabilityUnavailable("processes"))
    }

    pub fn launcher(&self) -> Result<&dyn LauncherService, ExecError> {
        self.caps
            .launcher
            .as_deref()
            .ok_or(ExecError::CapabilityUnavailable("launcher"))
    }
}
