//! Output rendering
//!
//! Formats an [`ActiveApp`] for standard output.

use crate::{ActiveApp, Config};
use std::str::FromStr;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Name, identifier and path, one per line
    #[default]
    Lines,
    /// A single JSON object
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" | "text" => Ok(OutputFormat::Lines),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Separator placed between fields in [`OutputFormat::Lines`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Lf,
    Cr,
    CrLf,
    Custom(String),
}

impl Separator {
    pub fn as_str(&self) -> &str {
        match self {
            Separator::Lf => "\n",
            Separator::Cr => "\r",
            Separator::CrLf => "\r\n",
            Separator::Custom(s) => s,
        }
    }

    /// Named separators, anything else is taken literally
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "lf" | "\n" => Separator::Lf,
            "cr" | "\r" => Separator::Cr,
            "crlf" | "\r\n" => Separator::CrLf,
            _ => Separator::Custom(s.to_string()),
        }
    }
}

/// Render `app` according to `config`. The result never ends with a separator.
pub fn render(app: &ActiveApp, config: &Config) -> Result<String, serde_json::Error> {
    match config.format {
        OutputFormat::Lines => Ok(render_lines(app, &config.separator, &config.placeholder)),
        OutputFormat::Json => serde_json::to_string(app),
    }
}

fn render_lines(app: &ActiveApp, separator: &Separator, placeholder: &str) -> String {
    let path = app.path.as_ref().map(|p| p.to_string_lossy());

    [
        app.name.as_deref(),
        app.bundle_id.as_deref(),
        path.as_deref(),
    ]
    .iter()
    .map(|field| field.unwrap_or(placeholder))
    .collect::<Vec<_>>()
    .join(separator.as_str())
}
