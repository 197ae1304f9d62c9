//! Mock desktop backend for testing.
//!
//! Implements every capability trait, records each call in invocation
//! order, and returns deterministic, configurable responses. Tests use the
//! recorded call log to assert that the interpreter drives backends in
//! exactly plan order, and that dry-run drives them not at all.

use std::path::Path;
use std::sync::{Arc, Mutex};

use deskpilot_core::plan::{MouseButton, Region};

use crate::error::DesktopError;
use crate::{
    DesktopCapabilities, InputService, LauncherService, OcrService, ProcessInfo,
    ProcessService, Screenshot, VisionService, WindowService,
};

/// Recording mock implementation of all desktop capabilities.
pub struct MockDesktop {
    calls: Mutex<Vec<String>>,
    window_titles: Vec<String>,
    process_names: Vec<String>,
    /// Region returned by `locate_image`; `None` simulates a miss.
    locate_result: Option<Region>,
    ocr_text: String,
    screenshot_data: Vec<u8>,
}

impl MockDesktop {
    /// Create a mock with default responses: no windows, no processes,
    /// image lookups miss, OCR returns placeholder text.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            window_titles: Vec::new(),
            process_names: Vec::new(),
            locate_result: None,
            ocr_text: "mock ocr text".to_string(),
            screenshot_data: b"mock-screenshot-bytes".to_vec(),
        }
    }

    /// Configure the window titles reported by `list_titles`.
    pub fn with_windows(mut self, titles: &[&str]) -> Self {
        self.window_titles = titles.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Configure the process names reported by `list`.
    pub fn with_processes(mut self, names: &[&str]) -> Self {
        self.process_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Make `locate_image` hit, returning the given region.
    pub fn with_image_at(mut self, region: Region) -> Self {
        self.locate_result = Some(region);
        self
    }

    /// Configure the text returned by `recognize`.
    pub fn with_ocr_text(mut self, text: &str) -> Self {
        self.ocr_text = text.to_string();
        self
    }

    /// Wrap this mock as a fully-populated capability set.
    pub fn into_capabilities(self: Arc<Self>) -> DesktopCapabilities {
        DesktopCapabilities {
            input: Some(self.clone()),
            vision: Some(self.clone()),
            ocr: Some(self.clone()),
            windows: Some(self.clone()),
            processes: Some(self.clone()),
            launcher: Some(self),
        }
    }

    /// Every backend call so far, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockDesktop {
    fn default() -> Self {
        Self::new()
    }
}

impl InputService for MockDesktop {
    fn inject_key(&self, key: &str) -> Result<(), DesktopError> {
        self.record(format!("inject_key:{}", key));
        Ok(())
    }

    fn inject_key_combo(&self, keys: &[String]) -> Result<(), DesktopError> {
        self.record(format!("inject_key_combo:{}", keys.join("+")));
        Ok(())
    }

    fn type_text(&self, text: &str, _interval_secs: f64) -> Result<(), DesktopError> {
        self.record(format!("type_text:{}", text));
        Ok(())
    }

    fn click(
        &self,
        position: Option<(i32, i32)>,
        button: MouseButton,
        clicks: u32,
        _interval_secs: f64,
    ) -> Result<(), DesktopError> {
        match position {
            Some((x, y)) => self.record(format!("click:{},{}:{}:{}", x, y, button, clicks)),
            None => self.record(format!("click:cursor:{}:{}", button, clicks)),
        }
        Ok(())
    }

    fn move_to(&self, position: (i32, i32), _duration_secs: f64) -> Result<(), DesktopError> {
        self.record(format!("move_to:{},{}", position.0, position.1));
        Ok(())
    }

    fn drag_to(
        &self,
        from: (i32, i32),
        to: (i32, i32),
        _duration_secs: f64,
        button: MouseButton,
    ) -> Result<(), DesktopError> {
        self.record(format!(
            "drag_to:{},{}:{},{}:{}",
            from.0, from.1, to.0, to.1, button
        ));
        Ok(())
    }

    fn scroll_by(&self, amount: i64) -> Result<(), DesktopError> {
        self.record(format!("scroll_by:{}", amount));
        Ok(())
    }
}

impl VisionService for MockDesktop {
    fn locate_image(
        &self,
        image: &Path,
        confidence: f64,
    ) -> Result<Option<Region>, DesktopError> {
        self.record(format!("locate_image:{}:{}", image.display(), confidence));
        Ok(self.locate_result)
    }

    fn screenshot(&self, region: Option<Region>) -> Result<Screenshot, DesktopError> {
        match region {
            Some(r) => self.record(format!("screenshot:{},{},{},{}", r.x, r.y, r.width, r.height)),
            None => self.record("screenshot:full".to_string()),
        }
        Ok(Screenshot {
            data: self.screenshot_data.clone(),
        })
    }
}

impl OcrService for MockDesktop {
    fn recognize(&self, image: &Screenshot, lang: &str) -> Result<String, DesktopError> {
        self.record(format!("recognize:{}", lang));
        if image.data.is_empty() {
            return Err(DesktopError::Backend("empty image data".to_string()));
        }
        Ok(self.ocr_text.clone())
    }
}

impl WindowService for MockDesktop {
    fn list_titles(&self) -> Result<Vec<String>, DesktopError> {
        self.record("list_titles".to_string());
        Ok(self.window_titles.clone())
    }

    fn activate(&self, title: &str) -> Result<(), DesktopError> {
        self.record(format!("activate:{}", title));
        Ok(())
    }

    fn close(&self, title: &str) -> Result<(), DesktopError> {
        self.record(format!("close:{}", title));
        Ok(())
    }
}

impl ProcessService for MockDesktop {
    fn list(&self) -> Result<Vec<ProcessInfo>, DesktopError> {
        self.record("list_processes".to_string());
        Ok(self
            .process_names
            .iter()
            .map(|name| ProcessInfo { name: name.clone() })
            .collect())
    }

    fn terminate(&self, name: &str) -> Result<(), DesktopError> {
        self.record(format!("terminate:{}", name));
        Ok(())
    }
}

impl LauncherService for MockDesktop {
    fn launch_by_search(&self, app: &str) -> Result<(), DesktopError> {
        self.record(format!("launch:{}", app));
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<(), DesktopError> {
        self.record(format!("open_url:{}", url));
        Ok(())
    }
}
