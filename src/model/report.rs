use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OutdatedEntry, Verdict, VulnerabilityEntry};
use crate::degrade::QueryState;
use crate::source::PackageManagerKind;

/// How one external query ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryReport {
    pub name: String,
    pub state: QueryState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Everything observed by one check run.
///
/// The verdict carries no timestamp; `checked_at` lives here so that the
/// verdict for a given input never changes between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub checked_at: DateTime<Utc>,
    pub package_manager: PackageManagerKind,
    pub verdict: Verdict,
    pub outdated: Vec<OutdatedEntry>,
    pub vulnerabilities: Vec<VulnerabilityEntry>,
    pub queries: Vec<QueryReport>,
}

impl CheckReport {
    pub fn new(package_manager: PackageManagerKind, verdict: Verdict) -> Self {
        Self {
            checked_at: Utc::now(),
            package_manager,
            verdict,
            outdated: Vec::new(),
            vulnerabilities: Vec::new(),
            queries: Vec::new(),
        }
    }
}
