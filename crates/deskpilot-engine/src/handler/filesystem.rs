//! Filesystem handlers.
//!
//! These act on the local filesystem directly rather than through the
//! capability provider. Copy and move create the target's parent
//! directories first; delete is the one destructive operation and sits
//! behind the two-key confirm gate.

use std::fs;
use std::path::Path;

use deskpilot_core::paths;
use tracing::{debug, info};

use crate::error::ExecError;
use crate::handler::ExecContext;

pub fn copy_file(source: &Path, target: &Path) -> Result<(), ExecError> {
    let src = paths::normalize(source);
    let dst = paths::normalize(target);
    info!(source = %src.display(), target = %dst.display(), "Copying file");
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(&src, &dst)?;
    Ok(())
}

pub fn move_file(source: &Path, target: &Path) -> Result<(), ExecError> {
    let src = paths::normalize(source);
    let dst = paths::normalize(target);
    info!(source = %src.display(), target = %dst.display(), "Moving file");
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    if let Err(rename_err) = fs::rename(&src, &dst) {
        // rename cannot cross filesystems; fall back to copy+remove for files.
        if src.is_file() {
            fs::copy(&src, &dst)?;
            fs::remove_file(&src)?;
        } else {
            return Err(rename_err.into());
        }
    }
    Ok(())
}

/// Delete a file or a whole directory tree, confirm gate permitting.
/// Deleting a path that does not exist is a no-op.
pub fn delete_file(ctx: &ExecContext, path: &Path, confirm: bool) -> Result<(), ExecError> {
    let target = paths::normalize(path);
    ctx.policy().check_delete(&target, confirm)?;
    info!(path = %target.display(), "Deleting");
    if target.is_dir() {
        fs::remove_dir_all(&target)?;
    } else if target.exists() {
        fs::remove_file(&target)?;
    } else {
        debug!(path = %target.display(), "Delete target does not exist, nothing to do");
    }
    Ok(())
}

/// Idempotent directory creation.
pub fn create_folder(path: &Path) -> Result<(), ExecError> {
    let target = paths::normalize(path);
    info!(path = %target.display(), "Creating folder");
    fs::create_dir_all(&target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskpilot_core::{EngineConfig, SafetyConfig};
    use deskpilot_desktop::DesktopCapabilities;

    #[test]
    fn test_copy_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, b"payload").unwrap();
        let dst = dir.path().join("deep").join("nested").join("b.txt");

        copy_file(&src, &dst).unwrap();

        assert_eq!(fs::read(&dst).unwrap(), b"payload");
        assert!(src.exists(), "copy must not remove the source");
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(
            &dir.path().join("missing.txt"),
            &dir.path().join("out.txt"),
        )
        .unwrap_err();
        assert!(matches!(err, ExecError::Io(_)));
    }

    #[test]
    fn test_move_removes_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, b"payload").unwrap();
        let dst = dir.path().join("moved").join("a.txt");

        move_file(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn test_move_directory() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("folder");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("inner.txt"), b"x").unwrap();
        let dst = dir.path().join("renamed");

        move_file(&src, &dst).unwrap();

        assert!(!src.exists());
        assert!(dst.join("inner.txt").exists());
    }

    #[test]
    fn test_create_folder_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("r").join("sub");

        create_folder(&target).unwrap();
        create_folder(&target).unwrap();

        assert!(target.is_dir());
    }

    #[test]
    fn test_delete_blocked_without_confirm_leaves_file() {
        let caps = DesktopCapabilities::none();
        let safety = SafetyConfig::default(); // destructive_confirm = true
        let config = EngineConfig::default();
        let ctx = ExecContext {
            caps: &caps,
            safety: &safety,
            config: &config,
        };

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("keep.txt");
        fs::write(&file, b"data").unwrap();

        let err = delete_file(&ctx, &file, false).unwrap_err();
        assert!(matches!(err, ExecError::Policy(_)));
        // Rejected before any filesystem mutation.
        assert!(file.exists());
    }

    #[test]
    fn test_delete_with_confirm_removes_file() {
        let caps = DesktopCapabilities::none();
        let safety = SafetyConfig::default();
        let config = EngineConfig::default();
        let ctx = ExecContext {
            caps: &caps,
            safety: &safety,
            config: &config,
        };

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gone.txt");
        fs::write(&file, b"data").unwrap();

        delete_file(&ctx, &file, true).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_delete_directory_tree() {
        let caps = DesktopCapabilities::none();
        let safety = SafetyConfig {
            destructive_confirm: false,
            ..SafetyConfig::default()
        };
        let config = EngineConfig::default();
        let ctx = ExecContext {
            caps: &caps,
            safety: &safety,
            config: &config,
        };

        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("tree");
        fs::create_dir_all(tree.join("inner")).unwrap();
        fs::write(tree.join("inner").join("f.txt"), b"x").unwrap();

        delete_file(&ctx, &tree, false).unwrap();
        assert!(!tree.exists());
    }

    #[test]
    fn test_delete_nonexistent_is_noop() {
        let caps = DesktopCapabilities::none();
        let safety = SafetyConfig::default();
        let config = EngineConfig::default();
        let ctx = ExecContext {
            caps: &caps,
            safety: &safety,
            config: &config,
        };

        let dir = tempfile::tempdir().unwrap();
        assert!(delete_file(&ctx, &dir.path().join("never-existed"), true).is_ok());
    }
}
