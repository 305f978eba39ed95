//! Package-manager report sources.
//!
//! This module provides the [`ReportSource`] trait and the command-backed
//! implementation that asks a package manager for its outdated and audit
//! reports.
//!
//! # Available Sources
//!
//! | Kind | Outdated query | Audit query |
//! |------|----------------|-------------|
//! | [`PackageManagerKind::Npm`] | `npm outdated --json` | `npm audit --json` |
//! | [`PackageManagerKind::Pnpm`] | `pnpm outdated --format json` | `pnpm audit --json` |
//!
//! # Example
//!
//! ```no_run
//! use depgate::source::{CommandSource, PackageManagerKind, ReportSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = CommandSource::new(PackageManagerKind::Npm, ".");
//!     for entry in source.outdated().await? {
//!         println!("{}: {} -> {}", entry.package_name, entry.current_version, entry.latest_version);
//!     }
//!     Ok(())
//! }
//! ```

mod command;
mod parse;

pub use command::CommandSource;
pub use parse::{parse_audit, parse_outdated};

use crate::checker::AuditReport;
use crate::model::OutdatedEntry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    Npm,
    Pnpm,
}

impl PackageManagerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManagerKind::Npm => "npm",
            PackageManagerKind::Pnpm => "pnpm",
        }
    }

    /// Executable name on the current platform.
    pub fn program(&self) -> String {
        if cfg!(target_os = "windows") {
            format!("{}.cmd", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }

    pub fn outdated_args(&self) -> &'static [&'static str] {
        match self {
            PackageManagerKind::Npm => &["outdated", "--json"],
            PackageManagerKind::Pnpm => &["outdated", "--format", "json"],
        }
    }

    pub fn audit_args(&self) -> &'static [&'static str] {
        match self {
            PackageManagerKind::Npm => &["audit", "--json"],
            PackageManagerKind::Pnpm => &["audit", "--json"],
        }
    }
}

impl std::str::FromStr for PackageManagerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(PackageManagerKind::Npm),
            "pnpm" => Ok(PackageManagerKind::Pnpm),
            _ => Err(format!("Unknown package manager: {}. Use 'npm' or 'pnpm'", s)),
        }
    }
}

impl std::fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why an external query produced no usable report.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("registry unreachable: {0}")]
    Unreachable(String),

    #[error("malformed output: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Parse(err.to_string())
    }
}

/// A package manager that can report outdated packages and audit results.
///
/// Implementations only fetch and parse; deciding what a failure means is
/// left to [`crate::degrade::DegradationController`].
#[async_trait]
pub trait ReportSource: Send + Sync {
    fn kind(&self) -> PackageManagerKind;

    /// Packages behind their latest version. Empty when all are current.
    async fn outdated(&self) -> Result<Vec<OutdatedEntry>, QueryError>;

    /// The audit mapping. Empty when nothing is known to be vulnerable.
    async fn audit(&self) -> Result<AuditReport, QueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("npm".parse::<PackageManagerKind>(), Ok(PackageManagerKind::Npm));
        assert_eq!("PNPM".parse::<PackageManagerKind>(), Ok(PackageManagerKind::Pnpm));
        assert!("yarn".parse::<PackageManagerKind>().is_err());
    }

    #[test]
    fn test_kind_args() {
        assert_eq!(PackageManagerKind::Npm.outdated_args(), &["outdated", "--json"]);
        assert_eq!(
            PackageManagerKind::Pnpm.outdated_args(),
            &["outdated", "--format", "json"]
        );
    }

    #[test]
    fn test_query_error_display() {
        let err = QueryError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "timed out after 1.5s");

        let err: QueryError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("malformed output"));
    }
}
