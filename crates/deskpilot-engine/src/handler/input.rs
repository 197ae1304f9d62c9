//! Keyboard, mouse, and scroll handlers.
//!
//! Thin policy-free wrappers over the input capability; there is nothing to
//! gate here beyond the capability itself being present.

use deskpilot_core::plan::MouseButton;
use tracing::info;

use crate::error::ExecError;
use crate::handler::ExecContext;

pub fn keyboard_type(ctx: &ExecContext, text: &str, interval_secs: f64) -> Result<(), ExecError> {
    info!(chars = text.chars().count(), "Typing text");
    ctx.input()?.type_text(text, interval_secs)?;
    Ok(())
}

pub fn keyboard_press(ctx: &ExecContext, key: &str) -> Result<(), ExecError> {
    info!(key = %key, "Pressing key");
    ctx.input()?.inject_key(key)?;
    Ok(())
}

pub fn keyboard_shortcut(ctx: &ExecContext, keys: &[String]) -> Result<(), ExecError> {
    info!(shortcut = %keys.join(" + "), "Pressing shortcut");
    ctx.input()?.inject_key_combo(keys)?;
    Ok(())
}

pub fn mouse_click(
    ctx: &ExecContext,
    position: Option<(i32, i32)>,
    button: MouseButton,
    clicks: u32,
    interval_secs: f64,
) -> Result<(), ExecError> {
    match position {
        Some((x, y)) => info!(x, y, button = %button, clicks, "Clicking"),
        None => info!(button = %button, clicks, "Clicking at cursor"),
    }
    ctx.input()?.click(position, button, clicks, interval_secs)?;
    Ok(())
}

pub fn mouse_move(
    ctx: &ExecContext,
    position: (i32, i32),
    duration_secs: f64,
) -> Result<(), ExecError> {
    info!(x = position.0, y = position.1, "Moving cursor");
    ctx.input()?.move_to(position, duration_secs)?;
    Ok(())
}

pub fn mouse_drag(
    ctx: &ExecContext,
    from: (i32, i32),
    to: (i32, i32),
    duration_secs: f64,
    button: MouseButton,
) -> Result<(), ExecError> {
    info!(
        from_x = from.0,
        from_y = from.1,
        to_x = to.0,
        to_y = to.1,
        button = %button,
        "Dragging"
    );
    ctx.input()?.drag_to(from, to, duration_secs, button)?;
    Ok(())
}

pub fn scroll(ctx: &ExecContext, amount: i64) -> Result<(), ExecError> {
    info!(amount, "Scrolling");
    ctx.input()?.scroll_by(amount)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskpilot_core::{EngineConfig, SafetyConfig};
    use deskpilot_desktop::{DesktopCapabilities, MockDesktop};
    use std::sync::Arc;

    #[test]
    fn test_input_handlers_reach_backend() {
        let mock = Arc::new(MockDesktop::new());
        let caps = mock.clone().into_capabilities();
        let safety = SafetyConfig::default();
        let config = EngineConfig::default();
        let ctx = ExecContext {
            caps: &caps,
            safety: &safety,
            config: &config,
        };

        keyboard_type(&ctx, "hi", 0.02).unwrap();
        keyboard_press(&ctx, "enter").unwrap();
        keyboard_shortcut(&ctx, &["ctrl".to_string(), "s".to_string()]).unwrap();
        mouse_click(&ctx, Some((5, 6)), MouseButton::Right, 2, 0.1).unwrap();
        mouse_move(&ctx, (7, 8), 0.2).unwrap();
        mouse_drag(&ctx, (0, 0), (9, 9), 0.3, MouseButton::Left).unwrap();
        scroll(&ctx, -4).unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                "type_text:hi",
                "inject_key:enter",
                "inject_key_combo:ctrl+s",
                "click:5,6:right:2",
                "move_to:7,8",
                "drag_to:0,0:9,9:left",
                "scroll_by:-4",
            ]
        );
    }

    #[test]
    fn test_input_handlers_fail_without_capability() {
        let caps = DesktopCapabilities::none();
        let safety = SafetyConfig::default();
        let config = EngineConfig::default();
        let ctx = ExecContext {
            caps: &caps,
            safety: &safety,
            config: &config,
        };

        let err = keyboard_press(&ctx, "enter").unwrap_err();
        assert!(matches!(err, ExecError::CapabilityUnavailable("input")));
        let err = scroll(&ctx, 1).unwrap_err();
        assert!(matches!(err, ExecError::CapabilityUnavailable("input")));
    }
}
