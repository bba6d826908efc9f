//! Pre-flight checks for renderprof
//!
//! Validates the target and the external tools before anything is launched.
//! A bad target is fatal; a missing tool only produces a warning because the
//! failure stays local to the sessions that need it.

use log::warn;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::domain::LaunchError;

/// Run all pre-flight checks before the target is launched
///
/// Returns the resolved target path.
///
/// # Errors
/// Returns a [`LaunchError`] if the target is not an executable file
pub fn run_preflight_checks(target: &Path, tools: &[&str]) -> Result<PathBuf, LaunchError> {
    let resolved = check_target_executable(target)?;
    for tool in tools {
        check_tool_available(tool);
    }
    Ok(resolved)
}

/// Resolve the target the way `execvp` would: a bare name is looked up in
/// `PATH`, anything with a directory part is taken relative to the working
/// directory.
///
/// # Errors
/// Returns [`LaunchError::NotFound`] if a bare name is not on `PATH`
pub fn resolve_target(target: &Path) -> Result<PathBuf, LaunchError> {
    let is_bare_name = target.components().count() == 1 && target.parent() == Some(Path::new(""));
    if !is_bare_name {
        return Ok(target.to_path_buf());
    }
    which::which(target).map_err(|_| LaunchError::NotFound(target.to_path_buf()))
}

/// Check that the target resolves to an executable regular file
///
/// Returns the resolved path, which is what should be spawned.
///
/// # Errors
/// Returns [`LaunchError::NotFound`] or [`LaunchError::NotExecutable`]
pub fn check_target_executable(target: &Path) -> Result<PathBuf, LaunchError> {
    let resolved = resolve_target(target)?;
    let metadata =
        std::fs::metadata(&resolved).map_err(|_| LaunchError::NotFound(target.to_path_buf()))?;
    if !metadata.is_file() || metadata.permissions().mode() & 0o111 == 0 {
        return Err(LaunchError::NotExecutable(resolved));
    }
    Ok(resolved)
}

/// Check if an external tool can be found, warning when it cannot
pub fn check_tool_available(tool: &str) -> bool {
    match which::which(tool) {
        Ok(_) => true,
        Err(e) => {
            warn!("{tool} not found ({e}); sessions that need it will fail");
            false
        }
    }
}
