use crate::model::{Finding, FindingSeverity, Verdict};

/// Merges findings into a verdict.
///
/// Blocking findings become errors and warnings stay warnings, both in input
/// order. Info findings are logged and dropped. Any error fails the check.
pub fn aggregate(findings: Vec<Finding>) -> Verdict {
    for finding in findings
        .iter()
        .filter(|f| f.severity == FindingSeverity::Info)
    {
        tracing::info!(kind = ?finding.kind, "{}", finding.message);
    }

    Verdict::from_findings(findings)
}
