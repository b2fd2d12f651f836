//! Native frontmost-application queries
//!
//! [`NativeQuery`] implements [`AppQuery`] with whatever facility the target
//! OS exposes: AppKit on macOS, EWMH window properties on X11, and the
//! foreground window on Windows.

pub mod platform;

use frontmost_core::{ActiveApp, AppQuery, QueryError, RunningApp};

/// The host platform's application query
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeQuery;

impl NativeQuery {
    pub fn new() -> Self {
        Self
    }
}

impl AppQuery for NativeQuery {
    fn frontmost_app(&self) -> Result<Option<ActiveApp>, QueryError> {
        platform::frontmost_app()
    }

    fn running_apps(&self) -> Result<Vec<RunningApp>, QueryError> {
        platform::running_apps()
    }
}
