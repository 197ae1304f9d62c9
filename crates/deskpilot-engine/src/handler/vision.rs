//! Perception handlers: image polling, OCR, screenshots.
//!
//! The two polling handlers share a loop shape (fixed interval, hard
//! deadline) but differ on timeout by contract: `find_and_click_image`
//! raises `NotFound` because absence should abort the plan, while
//! `wait_for_image` reports a boolean because absence is a valid branch
//! signal for the caller. There is no cancellation; a poll runs until it
//! matches or its deadline passes.

use std::path::Path;
use std::time::{Duration, Instant};

use deskpilot_core::plan::{MouseButton, Region};
use deskpilot_core::paths;
use tracing::{debug, info};

use crate::error::ExecError;
use crate::handler::ExecContext;

/// Poll for an image and click its center once it appears.
pub fn find_and_click_image(
    ctx: &ExecContext,
    image: &Path,
    confidence: f64,
    timeout_secs: f64,
    click: bool,
) -> Result<(), ExecError> {
    let path = paths::normalize(image);
    info!(image = %path.display(), confidence, timeout_secs, "Searching screen for image");

    match poll_locate(ctx, &path, confidence, timeout_secs)? {
        Some(region) => {
            let center = (
                region.x + region.width as i32 / 2,
                region.y + region.height as i32 / 2,
            );
            debug!(x = center.0, y = center.1, "Image found");
            if click {
                ctx.input()?.click(Some(center), MouseButton::Left, 1, 0.0)?;
            }
            Ok(())
        }
        None => Err(ExecError::NotFound(format!(
            "image not found on screen: {}",
            path.display()
        ))),
    }
}

/// Poll for an image; report whether it appeared before the timeout.
///
/// Never errors on timeout — absence is a result here, not a failure.
pub fn wait_for_image(
    ctx: &ExecContext,
    image: &Path,
    confidence: f64,
    timeout_secs: f64,
) -> Result<bool, ExecError> {
    let path = paths::normalize(image);
    info!(image = %path.display(), confidence, timeout_secs, "Waiting for image");
    let found = poll_locate(ctx, &path, confidence, timeout_secs)?.is_some();
    debug!(found, "Wait for image finished");
    Ok(found)
}

/// Shared poll loop: locate every poll interval until hit or deadline.
/// Lookup errors are treated as misses and retried; only a missing vision
/// capability fails the poll itself.
fn poll_locate(
    ctx: &ExecContext,
    path: &Path,
    confidence: f64,
    timeout_secs: f64,
) -> Result<Option<Region>, ExecError> {
    let vision = ctx.vision()?;
    let deadline = Instant::now() + Duration::from_secs_f64(timeout_secs.max(0.0));
    loop {
        match vision.locate_image(path, confidence) {
            Ok(Some(region)) => return Ok(Some(region)),
            Ok(None) => {}
            Err(e) => debug!(error = %e, "Image lookup failed, retrying"),
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        std::thread::sleep(ctx.poll_interval());
    }
}

/// Capture a region (or the full screen) and run OCR over it.
pub fn read_text_from_screen(
    ctx: &ExecContext,
    region: Option<Region>,
    lang: &str,
) -> Result<String, ExecError> {
    let vision = ctx.vision()?;
    let ocr = ctx.ocr()?;
    let shot = vision.screenshot(region)?;
    let text = ocr.recognize(&shot, lang)?;
    info!(chars = text.chars().count(), "Read text from screen");
    Ok(text)
}

/// Capture a region (or the full screen) and save it to disk.
pub fn take_screenshot(
    ctx: &ExecContext,
    path: &Path,
    region: Option<Region>,
) -> Result<(), ExecError> {
    let vision = ctx.vision()?;
    let target = paths::normalize(path);
    info!(path = %target.display(), "Taking screenshot");
    let shot = vision.screenshot(region)?;
    shot.save(&target)?;
    Ok(())
}
