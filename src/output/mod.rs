mod cli;
mod json;

pub use cli::{print_text, render_verdict};
pub use json::print_json;

use crate::model::CheckReport;
use anyhow::Result;

/// Output format for check results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable console output
    Text,
    /// JSON report for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'text' or 'json'", s)),
        }
    }
}

pub fn print_report(report: &CheckReport, format: OutputFormat, verbose: bool) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print_text(report, verbose);
            Ok(())
        }
        OutputFormat::Json => print_json(report),
    }
}
