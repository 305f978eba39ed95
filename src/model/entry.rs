use serde::{Deserialize, Serialize};

/// A dependency whose installed version is behind the registry's latest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutdatedEntry {
    pub package_name: String,
    pub current_version: String,
    pub latest_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wanted_version: Option<String>,
}

impl OutdatedEntry {
    pub fn new(
        package_name: impl Into<String>,
        current_version: impl Into<String>,
        latest_version: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            current_version: current_version.into(),
            latest_version: latest_version.into(),
            wanted_version: None,
        }
    }

    pub fn with_wanted(mut self, wanted: impl Into<String>) -> Self {
        self.wanted_version = Some(wanted.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    Low,
    Moderate,
    High,
    Critical,
}

impl AuditSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditSeverity::Low => "low",
            AuditSeverity::Moderate => "moderate",
            AuditSeverity::High => "high",
            AuditSeverity::Critical => "critical",
        }
    }

    /// Returns true for severities that block a commit.
    pub fn is_blocking(&self) -> bool {
        matches!(self, AuditSeverity::High | AuditSeverity::Critical)
    }
}

impl std::str::FromStr for AuditSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(AuditSeverity::Low),
            "moderate" | "medium" => Ok(AuditSeverity::Moderate),
            "high" => Ok(AuditSeverity::High),
            "critical" => Ok(AuditSeverity::Critical),
            _ => Err(format!("Unknown audit severity: {}", s)),
        }
    }
}

impl std::fmt::Display for AuditSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityEntry {
    pub package_name: String,
    pub severity: AuditSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl VulnerabilityEntry {
    pub fn new(package_name: impl Into<String>, severity: AuditSeverity) -> Self {
        Self {
            package_name: package_name.into(),
            severity,
            advisory_id: None,
            title: None,
        }
    }
}
