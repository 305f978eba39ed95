//! Configuration file handling.
//!
//! This module provides loading and saving of depgate configuration from a
//! TOML file. A configuration value is built once per run and never mutated
//! afterwards; command-line flags are folded in with [`Config::with_overrides`].
//!
//! # Configuration Location
//!
//! A `.depgate.toml` in the project directory wins. Otherwise the user-level
//! file is used:
//! - Linux: `~/.config/depgate/config.toml`
//! - macOS: `~/Library/Application Support/depgate/config.toml`
//! - Windows: `%APPDATA%\depgate\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! package_manager = "npm"
//! query_timeout_secs = 10
//! allow_network_failure = true
//! default_format = "text"
//!
//! [thresholds]
//! major_days = 180
//! minor_days = 60
//! patch_days = 7
//! security_days = 0
//!
//! [policy]
//! major = "warning"
//! minor = "warning"
//! patch = "blocking"
//!
//! [ignore]
//! packages = ["@types/*"]
//! outdated = ["typescript"]
//! vulnerabilities = ["1096482"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::FindingSeverity;
use crate::source::PackageManagerKind;

/// File name looked up in the project directory.
pub const PROJECT_CONFIG_FILE: &str = ".depgate.toml";

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use depgate::Config;
///
/// let config = Config::load(".").unwrap();
///
/// println!("Timeout: {:?}", config.query_timeout());
/// println!("Network failure allowed: {}", config.allow_network_failure);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which package manager answers the outdated and audit queries.
    ///
    /// Default: npm
    pub package_manager: PackageManagerKind,

    /// Upper bound for each external query, in seconds.
    ///
    /// Default: 10
    pub query_timeout_secs: u64,

    /// Whether an unreachable registry lets the commit through.
    ///
    /// Default: true
    pub allow_network_failure: bool,

    /// Verbose console output. When unset, output is verbose unless the
    /// `CI` environment variable is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,

    /// Output format when no `--format` flag is provided.
    ///
    /// Valid values: "text", "json"
    /// Default: "text"
    pub default_format: String,

    /// Age thresholds quoted in finding messages.
    pub thresholds: Thresholds,

    /// Finding severity for each version delta.
    pub policy: FreshnessPolicy,

    /// Ignore list configuration for suppressing known issues.
    pub ignore: IgnoreConfig,
}

/// How many days an update of each kind may wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub major_days: u32,
    pub minor_days: u32,
    pub patch_days: u32,
    pub security_days: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            major_days: 180,
            minor_days: 60,
            patch_days: 7,
            security_days: 0,
        }
    }
}

/// Maps a version delta to the severity of the finding it produces.
///
/// The default blocks on patch updates and only warns on minor and major
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessPolicy {
    pub major: FindingSeverity,
    pub minor: FindingSeverity,
    pub patch: FindingSeverity,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            major: FindingSeverity::Warning,
            minor: FindingSeverity::Warning,
            patch: FindingSeverity::Blocking,
        }
    }
}

/// Configuration for ignoring specific packages or advisories.
///
/// Use this to suppress known false positives or accepted risks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Package names excluded from every check.
    ///
    /// Supports glob patterns (e.g., "lodash*", "@types/*").
    pub packages: Vec<String>,

    /// Package names excluded from the freshness check only.
    ///
    /// Useful for packages intentionally pinned to older versions.
    pub outdated: Vec<String>,

    /// Advisory ids or package names excluded from the audit check.
    pub vulnerabilities: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a package should be ignored everywhere.
    pub fn should_ignore_package(&self, name: &str) -> bool {
        matches_any(&self.packages, name)
    }

    /// Check if the freshness check should skip a package.
    pub fn should_ignore_outdated(&self, name: &str) -> bool {
        self.should_ignore_package(name) || matches_any(&self.outdated, name)
    }

    /// Check if an audit entry should be ignored, by advisory id or package.
    pub fn should_ignore_vulnerability(&self, package: &str, advisory_id: Option<&str>) -> bool {
        if self.should_ignore_package(package) {
            return true;
        }
        if let Some(id) = advisory_id {
            if self.vulnerabilities.iter().any(|v| v == id) {
                return true;
            }
        }
        matches_any(&self.vulnerabilities, package)
    }
}

fn matches_any(patterns: &[String], text: &str) -> bool {
    patterns.iter().any(|pattern| {
        if pattern.contains('*') {
            glob_match(pattern, text)
        } else {
            pattern == text
        }
    })
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    // Prefix before the first *
    if !parts[0].is_empty() {
        match remaining.strip_prefix(parts[0]) {
            Some(rest) => remaining = rest,
            None => return false,
        }
    }

    // Suffix after the last *
    let last_part = parts[parts.len() - 1];
    if !last_part.is_empty() {
        match remaining.strip_suffix(last_part) {
            Some(rest) => remaining = rest,
            None => return false,
        }
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    true
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub package_manager: Option<PackageManagerKind>,
    pub query_timeout_secs: Option<u64>,
    pub allow_network_failure: Option<bool>,
    pub verbose: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package_manager: PackageManagerKind::Npm,
            query_timeout_secs: 10,
            allow_network_failure: true,
            verbose: None,
            default_format: "text".to_string(),
            thresholds: Thresholds::default(),
            policy: FreshnessPolicy::default(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration for a project directory.
    ///
    /// Looks for [`PROJECT_CONFIG_FILE`] in `project_dir`, then the user
    /// config file. Returns defaults when neither exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load(project_dir: impl AsRef<Path>) -> Result<Self> {
        let project_file = project_dir.as_ref().join(PROJECT_CONFIG_FILE);
        if project_file.exists() {
            return Self::load_from(&project_file);
        }

        let user_file = Self::config_path();
        if user_file.exists() {
            return Self::load_from(&user_file);
        }

        Ok(Self::default())
    }

    /// Loads configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Saves the configuration to the user config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the user configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("depgate")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Returns a new configuration with command-line values applied.
    pub fn with_overrides(self, overrides: Overrides) -> Self {
        Self {
            package_manager: overrides.package_manager.unwrap_or(self.package_manager),
            query_timeout_secs: overrides
                .query_timeout_secs
                .unwrap_or(self.query_timeout_secs),
            allow_network_failure: overrides
                .allow_network_failure
                .unwrap_or(self.allow_network_failure),
            verbose: overrides.verbose.or(self.verbose),
            ..self
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Verbose unless configured otherwise or running under CI.
    pub fn is_verbose(&self) -> bool {
        self.verbose.unwrap_or_else(|| !running_in_ci())
    }
}

/// The generic "running in automation" signal.
pub fn running_in_ci() -> bool {
    std::env::var_os("CI").is_some_and(|v| !v.is_empty() && v != "0" && v != "false")
}
