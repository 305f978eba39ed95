use crate::model::{AuditSeverity, Finding, FindingKind, FindingSeverity, VulnerabilityEntry};
use serde_json::{Map, Value};

/// A raw audit report: identifier (package name or advisory id) to record.
pub type AuditReport = Map<String, Value>;

/// Extracts the audit entries that block a commit.
///
/// Only `high` and `critical` entries are returned. Records without a
/// recognizable `severity` are skipped rather than reported as errors.
/// Output follows the report's iteration order.
pub fn classify_vulnerabilities(report: &AuditReport) -> Vec<VulnerabilityEntry> {
    report
        .iter()
        .filter_map(|(key, record)| parse_entry(key, record))
        .filter(|entry| entry.severity.is_blocking())
        .collect()
}

fn parse_entry(key: &str, record: &Value) -> Option<VulnerabilityEntry> {
    let record = record.as_object()?;
    let severity: AuditSeverity = record.get("severity")?.as_str()?.parse().ok()?;

    // npm >= 7 keys by package and repeats it as `name`; npm 6 and pnpm key
    // by advisory id and carry `module_name`.
    let package_name = record
        .get("name")
        .or_else(|| record.get("module_name"))
        .and_then(Value::as_str)
        .unwrap_or(key)
        .to_string();

    let advisory_id = record
        .get("id")
        .or_else(|| record.get("source"))
        .and_then(id_to_string);

    let title = record
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| first_via_title(record));

    Some(VulnerabilityEntry {
        package_name,
        severity,
        advisory_id,
        title,
    })
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// npm >= 7 lists advisories under `via`; plain strings there name other
// vulnerable packages and carry no title.
fn first_via_title(record: &Map<String, Value>) -> Option<String> {
    record
        .get("via")?
        .as_array()?
        .iter()
        .find_map(|via| via.get("title")?.as_str().map(str::to_string))
}

/// Turns a blocking audit entry into a finding.
///
/// `security_days` is the configured grace period quoted in the message.
pub fn vulnerability_finding(entry: &VulnerabilityEntry, security_days: u32) -> Finding {
    let mut message = format!(
        "{}: {} severity vulnerability",
        entry.package_name, entry.severity
    );
    if let Some(title) = &entry.title {
        message.push_str(&format!(" ({})", title));
    }
    if security_days == 0 {
        message.push_str(" (policy: fix immediately)");
    } else {
        message.push_str(&format!(" (policy: fix within {} days)", security_days));
    }

    Finding::new(message, FindingSeverity::Blocking, FindingKind::Security)
}
