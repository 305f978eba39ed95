//! One full check run: query, classify, aggregate.

use crate::checker::{aggregate, classify_vulnerabilities, vulnerability_finding, FreshnessAnalyzer};
use crate::config::Config;
use crate::degrade::{DegradationController, QueryOutcome, QueryState};
use crate::model::{CheckReport, Finding, FindingKind, FindingSeverity, QueryReport};
use crate::source::ReportSource;
use futures::future::join;

pub const OUTDATED_QUERY: &str = "outdated";
pub const AUDIT_QUERY: &str = "audit";

/// Runs both queries concurrently and builds the report for this run.
///
/// Query failures are already resolved by the degradation policy here: a
/// fatal query becomes a blocking network finding, a degraded one an info
/// finding that is only logged.
pub async fn run_check(source: &dyn ReportSource, config: &Config) -> CheckReport {
    let controller = DegradationController::from_config(config);

    let (outdated, audit) = join(
        controller.run(OUTDATED_QUERY, source.outdated()),
        controller.run(AUDIT_QUERY, source.audit()),
    )
    .await;

    let queries = vec![
        query_report(OUTDATED_QUERY, &outdated),
        query_report(AUDIT_QUERY, &audit),
    ];

    let mut findings: Vec<Finding> = queries.iter().filter_map(query_finding).collect();

    let outdated = outdated.into_value();
    findings.extend(FreshnessAnalyzer::from_config(config).analyze(&outdated));

    let vulnerabilities: Vec<_> = classify_vulnerabilities(&audit.into_value())
        .into_iter()
        .filter(|v| {
            !config
                .ignore
                .should_ignore_vulnerability(&v.package_name, v.advisory_id.as_deref())
        })
        .collect();
    findings.extend(
        vulnerabilities
            .iter()
            .map(|v| vulnerability_finding(v, config.thresholds.security_days)),
    );

    let verdict = aggregate(findings);

    let mut report = CheckReport::new(source.kind(), verdict);
    report.outdated = outdated;
    report.vulnerabilities = vulnerabilities;
    report.queries = queries;
    report
}

fn query_report<T>(name: &str, outcome: &QueryOutcome<T>) -> QueryReport {
    QueryReport {
        name: name.to_string(),
        state: outcome.state(),
        detail: outcome.reason().map(str::to_string),
    }
}

fn query_finding(query: &QueryReport) -> Option<Finding> {
    let detail = query.detail.as_deref().unwrap_or("unknown failure");
    let (message, severity) = match query.state {
        QueryState::Fatal => (
            format!("{} query failed: {}", query.name, detail),
            FindingSeverity::Blocking,
        ),
        QueryState::Degraded => (
            format!("{} query skipped: {}", query.name, detail),
            FindingSeverity::Info,
        ),
        _ => return None,
    };

    Some(Finding::new(message, severity, FindingKind::Network))
}
