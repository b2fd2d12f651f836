//! Platform-specific functionality for active app detection

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
mod linux;

use frontmost_core::{ActiveApp, QueryError, RunningApp};

/// Get the application currently holding input focus
#[cfg(target_os = "macos")]
pub fn frontmost_app() -> Result<Option<ActiveApp>, QueryError> {
    macos::frontmost_app()
}

#[cfg(target_os = "windows")]
pub fn frontmost_app() -> Result<Option<ActiveApp>, QueryError> {
    windows::frontmost_app()
}

#[cfg(target_os = "linux")]
pub fn frontmost_app() -> Result<Option<ActiveApp>, QueryError> {
    linux::frontmost_app()
}

#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
pub fn frontmost_app() -> Result<Option<ActiveApp>, QueryError> {
    Err(QueryError::Unsupported)
}

/// List running applications with their focus state
#[cfg(target_os = "macos")]
pub fn running_apps() -> Result<Vec<RunningApp>, QueryError> {
    macos::running_apps()
}

#[cfg(target_os = "linux")]
pub fn running_apps() -> Result<Vec<RunningApp>, QueryError> {
    linux::running_apps()
}

#[cfg(target_os = "windows")]
pub fn running_apps() -> Result<Vec<RunningApp>, QueryError> {
    Err(QueryError::EnumerationUnsupported)
}

#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
pub fn running_apps() -> Result<Vec<RunningApp>, QueryError> {
    Err(QueryError::Unsupported)
}
