//! The classification and decision engine.
//!
//! Everything here is pure: inputs are well-formed (possibly empty) reports,
//! outputs are findings and a verdict.

mod audit;
mod freshness;
mod verdict;
mod version;

pub use audit::{classify_vulnerabilities, vulnerability_finding, AuditReport};
pub use freshness::FreshnessAnalyzer;
pub use verdict::aggregate;
pub use version::{parse_version, version_delta, ParsedVersion, VersionDelta};
