//! Desktop capability provider interfaces.
//!
//! Defines one narrow, synchronous trait per desktop I/O concern (input
//! injection, screen vision, OCR, window control, process control, app
//! launching) plus the [`DesktopCapabilities`] bundle the interpreter
//! consumes. Backends are platform-specific and plug in from outside this
//! workspace; the [`MockDesktop`] in [`mock`] is the in-tree implementation
//! used by tests.
//!
//! The traits are deliberately synchronous. The interpreter guarantees
//! strict step ordering, so any backend concurrency (an async display
//! client, a worker thread) must be hidden behind these blocking calls.

pub mod error;
pub mod mock;

use std::path::Path;
use std::sync::Arc;

use deskpilot_core::plan::{MouseButton, Region};

pub use error::DesktopError;
pub use mock::MockDesktop;

/// An encoded screenshot as produced by a vision backend.
///
/// The byte format is backend-defined (typically PNG); this crate treats it
/// as opaque and only moves it between capture, OCR, and disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub data: Vec<u8>,
}

impl Screenshot {
    /// Write the encoded bytes to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), DesktopError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}

/// A running process as reported by the process backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub name: String,
}

/// Keyboard and mouse input injection.
pub trait InputService: Send + Sync {
    fn inject_key(&self, key: &str) -> Result<(), DesktopError>;
    fn inject_key_combo(&self, keys: &[String]) -> Result<(), DesktopError>;
    fn type_text(&self, text: &str, interval_secs: f64) -> Result<(), DesktopError>;
    /// Click at `position`, or at the current cursor position when `None`.
    fn click(
        &self,
        position: Option<(i32, i32)>,
        button: MouseButton,
        clicks: u32,
        interval_secs: f64,
    ) -> Result<(), DesktopError>;
    fn move_to(&self, position: (i32, i32), duration_secs: f64) -> Result<(), DesktopError>;
    fn drag_to(
        &self,
        from: (i32, i32),
        to: (i32, i32),
        duration_secs: f64,
        button: MouseButton,
    ) -> Result<(), DesktopError>;
    fn scroll_by(&self, amount: i64) -> Result<(), DesktopError>;
}

/// Screen capture and on-screen image location.
pub trait VisionService: Send + Sync {
    /// Locate `image` on screen at or above `confidence`.
    ///
    /// Returns the bounding region of the best match, or `None` when no
    /// match clears the threshold.
    fn locate_image(&self, image: &Path, confidence: f64)
        -> Result<Option<Region>, DesktopError>;
    /// Capture `region`, or the full screen when `None`.
    fn screenshot(&self, region: Option<Region>) -> Result<Screenshot, DesktopError>;
}

/// Text recognition over captured screenshots.
pub trait OcrService: Send + Sync {
    fn recognize(&self, image: &Screenshot, lang: &str) -> Result<String, DesktopError>;
}

/// Window enumeration and activation.
pub trait WindowService: Send + Sync {
    /// Titles of all enumerable windows, blank ones included.
    fn list_titles(&self) -> Result<Vec<String>, DesktopError>;
    fn activate(&self, title: &str) -> Result<(), DesktopError>;
    fn close(&self, title: &str) -> Result<(), DesktopError>;
}

/// Process enumeration and termination.
pub trait ProcessService: Send + Sync {
    fn list(&self) -> Result<Vec<ProcessInfo>, DesktopError>;
    fn terminate(&self, name: &str) -> Result<(), DesktopError>;
}

/// OS-level app launching and URL opening.
pub trait LauncherService: Send + Sync {
    /// Launch an app through the OS search surface (the win-key flow).
    fn launch_by_search(&self, app: &str) -> Result<(), DesktopError>;
    /// Open a URL in the default browser.
    fn open_url(&self, url: &str) -> Result<(), DesktopError>;
}

/// The set of capability backends available to an interpreter.
///
/// Each field is independently optional: a provider implements the subset
/// its platform supports, and actions whose capability is absent fail fast
/// at dispatch time instead of probing mid-handler.
#[derive(Clone, Default)]
pub struct DesktopCapabilities {
    pub input: Option<Arc<dyn InputService>>,
    pub vision: Option<Arc<dyn VisionService>>,
    pub ocr: Option<Arc<dyn OcrService>>,
    pub windows: Option<Arc<dyn WindowService>>,
    pub processes: Option<Arc<dyn ProcessService>>,
    pub launcher: Option<Arc<dyn LauncherService>>,
}

impl DesktopCapabilities {
    /// No backends at all. Filesystem, command, wait, and dry-run steps
    /// still work; everything desktop-facing reports unavailable.
    pub fn none() -> Self {
        Self::default()
    }

    /// A fully-populated capability set backed by a fresh [`MockDesktop`].
    pub fn mock() -> Self {
        Arc::new(MockDesktop::new()).into_capabilities()
    }

    pub fn with_input(mut self, svc: Arc<dyn InputService>) -> Self {
        self.input = Some(svc);
        self
    }

    pub fn with_vision(mut self, svc: Arc<dyn VisionService>) -> Self {
        self.vision = Some(svc);
        self
    }

    pub fn with_ocr(mut self, svc: Arc<dyn OcrService>) -> Self {
        self.ocr = Some(svc);
        self
    }

    pub fn with_windows(mut self, svc: Arc<dyn WindowService>) -> Self {
        self.windows = Some(svc);
        self
    }

    pub fn with_processes(mut self, svc: Arc<dyn ProcessService>) -> Self {
        self.processes = Some(svc);
        self
    }

    pub fn with_launcher(mut self, svc: Arc<dyn LauncherService>) -> Self {
        self.launcher = Some(svc);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_has_no_backends() {
        let caps = DesktopCapabilities::none();
        assert!(caps.input.is_none());
        assert!(caps.vision.is_none());
        assert!(caps.ocr.is_none());
        assert!(caps.windows.is_none());
        assert!(caps.processes.is_none());
        assert!(caps.launcher.is_none());
    }

    #[test]
    fn test_mock_has_all_backends() {
        let caps = DesktopCapabilities::mock();
        assert!(caps.input.is_some());
        assert!(caps.vision.is_some());
        assert!(caps.ocr.is_some());
        assert!(caps.windows.is_some());
        assert!(caps.processes.is_some());
        assert!(caps.launcher.is_some());
    }

    #[test]
    fn test_with_single_capability() {
        let mock = Arc::new(MockDesktop::new());
        let caps = DesktopCapabilities::none().with_windows(mock);
        assert!(caps.windows.is_some());
        assert!(caps.input.is_none());
    }

    #[test]
    fn test_screenshot_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captures").join("shot.png");

        let shot = Screenshot {
            data: vec![1, 2, 3],
        };
        shot.save(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }
}
