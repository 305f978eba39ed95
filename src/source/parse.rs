use super::QueryError;
use crate::checker::AuditReport;
use crate::model::OutdatedEntry;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize)]
struct OutdatedRecord {
    current: Option<String>,
    wanted: Option<String>,
    latest: Option<String>,
}

/// Parses `npm outdated --json` / `pnpm outdated --format json` output.
///
/// Empty output means nothing is outdated. Entries keep the report's order.
pub fn parse_outdated(stdout: &str) -> Result<Vec<OutdatedEntry>, QueryError> {
    let Some(report) = parse_object(stdout)? else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::new();
    for (name, value) in report {
        // npm workspaces report one record per location as an array
        let records = match value {
            Value::Array(items) => items,
            other => vec![other],
        };

        for record in records {
            let record: OutdatedRecord = serde_json::from_value(record)?;
            let mut entry = OutdatedEntry::new(
                &name,
                record.current.unwrap_or_default(),
                record.latest.unwrap_or_default(),
            );
            entry.wanted_version = record.wanted;
            entries.push(entry);
        }
    }

    Ok(entries)
}

/// Parses `npm audit --json` / `pnpm audit --json` output into the audit
/// mapping.
///
/// npm 7+ nests the mapping under `vulnerabilities`; npm 6 and pnpm use
/// `advisories`. A bare mapping is accepted as-is.
pub fn parse_audit(stdout: &str) -> Result<AuditReport, QueryError> {
    let Some(mut report) = parse_object(stdout)? else {
        return Ok(AuditReport::new());
    };

    for key in ["vulnerabilities", "advisories"] {
        if let Some(value) = report.remove(key) {
            return match value {
                Value::Object(map) => Ok(map),
                Value::Null => Ok(AuditReport::new()),
                _ => Err(QueryError::Parse(format!("'{}' is not an object", key))),
            };
        }
    }

    Ok(report)
}

/// Parses a top-level JSON object, turning npm's `{"error": ...}` payload
/// into [`QueryError::Unreachable`]. Blank input yields `None`.
fn parse_object(stdout: &str) -> Result<Option<Map<String, Value>>, QueryError> {
    if stdout.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(stdout)?;
    let Value::Object(mut map) = value else {
        return Err(QueryError::Parse("expected a JSON object".to_string()));
    };

    if let Some(error) = map.remove("error") {
        return Err(QueryError::Unreachable(describe_error(&error)));
    }

    Ok(Some(map))
}

fn describe_error(error: &Value) -> String {
    let field = |key: &str| error.get(key).and_then(Value::as_str);

    match (field("code"), field("summary")) {
        (Some(code), Some(summary)) => format!("{}: {}", code, summary),
        (Some(code), None) => code.to_string(),
        (None, Some(summary)) => summary.to_string(),
        (None, None) => error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| "unknown registry error".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_outdated_empty_is_current() {
        assert!(parse_outdated("").unwrap().is_empty());
        assert!(parse_outdated("  \n").unwrap().is_empty());
        assert!(parse_outdated("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_outdated_npm() {
        let stdout = r#"{
          "lodash": {"current": "4.17.20", "wanted": "4.17.21", "latest": "4.17.21", "dependent": "app", "location": "node_modules/lodash"},
          "react": {"current": "17.0.2", "wanted": "17.0.2", "latest": "18.2.0", "dependent": "app"}
        }"#;

        let entries = parse_outdated(stdout).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            OutdatedEntry::new("lodash", "4.17.20", "4.17.21").with_wanted("4.17.21")
        );
        assert_eq!(entries[1].package_name, "react");
        assert_eq!(entries[1].latest_version, "18.2.0");
    }

    #[test]
    fn test_parse_outdated_missing_current() {
        let entries = parse_outdated(r#"{"chalk": {"wanted": "5.3.0", "latest": "5.3.0"}}"#).unwrap();
        assert_eq!(entries[0].current_version, "");
    }

    #[test]
    fn test_parse_outdated_workspace_arrays() {
        let stdout = r#"{"typescript": [
            {"current": "5.0.0", "latest": "5.4.0", "dependent": "a"},
            {"current": "5.3.0", "latest": "5.4.0", "dependent": "b"}
        ]}"#;

        let entries = parse_outdated(stdout).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].current_version, "5.3.0");
    }

    #[test]
    fn test_parse_outdated_malformed() {
        assert!(matches!(parse_outdated("{not json"), Err(QueryError::Parse(_))));
        assert!(matches!(parse_outdated("[1, 2]"), Err(QueryError::Parse(_))));
        assert!(matches!(
            parse_outdated(r#"{"x": {"current": 5}}"#),
            Err(QueryError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_registry_error() {
        let stdout = r#"{"error": {"code": "ENOTFOUND", "summary": "request to https://registry.npmjs.org failed"}}"#;

        let err = parse_outdated(stdout).unwrap_err();
        match err {
            QueryError::Unreachable(reason) => assert!(reason.starts_with("ENOTFOUND")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(parse_audit(stdout), Err(QueryError::Unreachable(_))));
    }

    #[test]
    fn test_parse_audit_npm7() {
        let stdout = r#"{
          "auditReportVersion": 2,
          "vulnerabilities": {
            "minimist": {"name": "minimist", "severity": "critical", "via": []}
          },
          "metadata": {"vulnerabilities": {"critical": 1}}
        }"#;

        let report = parse_audit(stdout).unwrap();
        assert_eq!(report.len(), 1);
        assert!(report.contains_key("minimist"));
    }

    #[test]
    fn test_parse_audit_advisories() {
        let stdout = r#"{"advisories": {"1179": {"module_name": "minimist", "severity": "high"}}, "metadata": {}}"#;
        let report = parse_audit(stdout).unwrap();
        assert!(report.contains_key("1179"));
    }

    #[test]
    fn test_parse_audit_empty() {
        assert!(parse_audit("").unwrap().is_empty());
        assert!(parse_audit(r#"{"vulnerabilities": {}}"#).unwrap().is_empty());
        assert!(parse_audit(r#"{"advisories": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_audit_bad_shape() {
        assert!(matches!(
            parse_audit(r#"{"vulnerabilities": []}"#),
            Err(QueryError::Parse(_))
        ));
    }
}
