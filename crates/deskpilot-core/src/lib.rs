//! Core types for the deskpilot plan runner.
//!
//! Defines the step/plan data model, the typed action vocabulary with
//! strict parse-time validation, the safety and runtime configuration,
//! and shared path normalization.

pub mod config;
pub mod error;
pub mod paths;
pub mod plan;

pub use config::{EngineConfig, GeneralConfig, PilotConfig, SafetyConfig};
pub use error::{ConfigError, PlanError};
pub use plan::{Action, MouseButton, Plan, RawStep, Region};
