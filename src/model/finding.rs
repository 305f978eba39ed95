use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    Info,
    Warning,
    Blocking,
}

impl FindingSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingSeverity::Info => "info",
            FindingSeverity::Warning => "warning",
            FindingSeverity::Blocking => "blocking",
        }
    }
}

impl std::str::FromStr for FindingSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(FindingSeverity::Info),
            "warning" | "warn" => Ok(FindingSeverity::Warning),
            "blocking" | "error" => Ok(FindingSeverity::Blocking),
            _ => Err(format!(
                "Unknown finding severity: {}. Use 'info', 'warning', or 'blocking'",
                s
            )),
        }
    }
}

/// Which check produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Freshness,
    Security,
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub message: String,
    pub severity: FindingSeverity,
    pub kind: FindingKind,
}

impl Finding {
    pub fn new(message: impl Into<String>, severity: FindingSeverity, kind: FindingKind) -> Self {
        Self {
            message: message.into(),
            severity,
            kind,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, FindingSeverity::Info, FindingKind::Freshness)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, FindingSeverity::Warning, FindingKind::Freshness)
    }

    pub fn blocking(message: impl Into<String>) -> Self {
        Self::new(message, FindingSeverity::Blocking, FindingKind::Freshness)
    }

    pub fn with_kind(mut self, kind: FindingKind) -> Self {
        self.kind = kind;
        self
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The pass/fail decision for a single check run.
///
/// `exit_code` is 1 exactly when `errors` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub exit_code: u8,
    pub warnings: Vec<Finding>,
    pub errors: Vec<Finding>,
}

impl Verdict {
    /// Builds a verdict from blocking and warning findings, dropping the rest.
    ///
    /// See [`crate::checker::aggregate`] for the variant that logs dropped
    /// info findings.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        for finding in findings {
            match finding.severity {
                FindingSeverity::Blocking => errors.push(finding),
                FindingSeverity::Warning => warnings.push(finding),
                FindingSeverity::Info => {}
            }
        }

        let exit_code = if errors.is_empty() { 0 } else { 1 };

        Self {
            exit_code,
            warnings,
            errors,
        }
    }

    pub fn passed(&self) -> bool {
        self.exit_code == 0
    }
}
