//! frontmost Core Library
//!
//! Provides the application model, the query seam implemented by each
//! platform, lookup strategies, and output rendering for the `frontmost`
//! tool.

pub mod config;
pub mod output;
pub mod query;

pub use config::{Config, ConfigError};
pub use output::{OutputFormat, Separator};
pub use query::{AppQuery, QueryError, Strategy};

use serde::{Serialize, Serializer};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Information about the currently active application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveApp {
    /// Display name of the application
    pub name: Option<String>,
    /// Bundle ID (macOS), application id or WM_CLASS (X11), executable name (Windows)
    pub bundle_id: Option<String>,
    /// Location of the application bundle or executable
    #[serde(serialize_with = "serialize_lossy_path")]
    pub path: Option<PathBuf>,
}

/// Paths from the OS need not be UTF-8; replace invalid sequences instead of failing
fn serialize_lossy_path<S: Serializer>(path: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error> {
    match path {
        Some(path) => serializer.serialize_some(&path.to_string_lossy()),
        None => serializer.serialize_none(),
    }
}

impl ActiveApp {
    /// Build from raw platform values, treating empty strings as absent.
    pub fn new(name: Option<String>, bundle_id: Option<String>, path: Option<PathBuf>) -> Self {
        Self {
            name: name.filter(|s| !s.is_empty()),
            bundle_id: bundle_id.filter(|s| !s.is_empty()),
            path: path.filter(|p| !p.as_os_str().is_empty()),
        }
    }

    /// Names of the attributes the platform did not report
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.bundle_id.is_none() {
            missing.push("bundle_id");
        }
        if self.path.is_none() {
            missing.push("path");
        }
        missing
    }
}

/// One entry of a running-application listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningApp {
    pub app: ActiveApp,
    pub active: bool,
}

impl RunningApp {
    pub fn new(app: ActiveApp, active: bool) -> Self {
        Self { app, active }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Look up the active application and write it to `out`.
///
/// Nothing is written unless the lookup succeeded, so callers never see a
/// partial record on failure.
pub fn report<Q, W>(query: Q, config: &Config, out: &mut W) -> Result<ActiveApp, ReportError>
where
    Q: AppQuery + 'static,
    W: Write,
{
    let app = query::lookup_with_timeout(query, config.strategy, config.timeout)?;

    let missing = app.missing_fields();
    if !missing.is_empty() {
        debug!(?missing, "active application is missing attributes");
    }

    let rendered = output::render(&app, config)?;
    out.write_all(rendered.as_bytes())?;
    out.flush()?;

    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct FakeQuery(Option<ActiveApp>);

    impl AppQuery for FakeQuery {
        fn frontmost_app(&self) -> Result<Option<ActiveApp>, QueryError> {
            Ok(self.0.clone())
        }
    }

    fn finder() -> ActiveApp {
        ActiveApp::new(
            Some("Finder".to_string()),
            Some("com.apple.finder".to_string()),
            Some(PathBuf::from("/System/Library/CoreServices/Finder.app")),
        )
    }

    fn config() -> Config {
        Config {
            timeout: Some(Duration::from_secs(5)),
            ..Config::default()
        }
    }

    #[test]
    fn test_report_prints_fields_in_order() {
        let mut out = Vec::new();
        report(FakeQuery(Some(finder())), &config(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Finder\ncom.apple.finder\n/System/Library/CoreServices/Finder.app"
        );
    }

    #[test]
    fn test_report_writes_nothing_without_active_app() {
        let mut out = Vec::new();
        let result = report(FakeQuery(None), &config(), &mut out);

        assert!(matches!(
            result,
            Err(ReportError::Query(QueryError::NoActiveApplication))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_report_substitutes_missing_path() {
        let mut app = finder();
        app.path = None;
        let config = Config {
            placeholder: "unknown".to_string(),
            ..config()
        };

        let mut out = Vec::new();
        report(FakeQuery(Some(app)), &config, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Finder\ncom.apple.finder\nunknown"
        );
    }

    #[test]
    fn test_report_is_repeatable() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        report(FakeQuery(Some(finder())), &config(), &mut first).unwrap();
        report(FakeQuery(Some(finder())), &config(), &mut second).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let app = ActiveApp::new(Some(String::new()), Some("org.gnome.Nautilus".to_string()), None);

        assert_eq!(app.name, None);
        assert_eq!(app.missing_fields(), vec!["name", "path"]);
    }
}
