use crate::checker::{version_delta, VersionDelta};
use crate::degrade::QueryState;
use crate::model::{CheckReport, Finding, Verdict};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct OutdatedRow {
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Wanted")]
    wanted: String,
    #[tabled(rename = "Latest")]
    latest: String,
    #[tabled(rename = "Type")]
    update_type: String,
}

/// Prints the report for a terminal.
///
/// Verbose output adds the outdated-package table and notes about degraded
/// queries before the verdict.
pub fn print_text(report: &CheckReport, verbose: bool) {
    if verbose {
        print_outdated_table(report);
        print_degraded_queries(report);
    }

    print!("{}", render_verdict(&report.verdict));
}

/// Renders the verdict: errors always come before warnings.
pub fn render_verdict(verdict: &Verdict) -> String {
    let mut out = String::new();

    if !verdict.errors.is_empty() {
        out.push_str(&format!(
            "Dependency check FAILED ({}, {})\n",
            plural(verdict.errors.len(), "error"),
            plural(verdict.warnings.len(), "warning")
        ));
        out.push_str("\nErrors:\n");
        push_findings(&mut out, &verdict.errors, "x");
        if !verdict.warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            push_findings(&mut out, &verdict.warnings, "!");
        }
    } else if !verdict.warnings.is_empty() {
        out.push_str(&format!(
            "Dependency check passed with {}\n",
            plural(verdict.warnings.len(), "warning")
        ));
        out.push_str("\nWarnings:\n");
        push_findings(&mut out, &verdict.warnings, "!");
    } else {
        out.push_str("Dependency check passed: dependencies are fresh and no blocking vulnerabilities found\n");
    }

    out
}

fn push_findings(out: &mut String, findings: &[Finding], marker: &str) {
    for finding in findings {
        out.push_str(&format!("  {} {}\n", marker, finding.message));
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn print_outdated_table(report: &CheckReport) {
    if report.outdated.is_empty() {
        return;
    }

    println!("Found {} outdated packages:", report.outdated.len());
    println!();

    let rows: Vec<OutdatedRow> = report
        .outdated
        .iter()
        .map(|o| OutdatedRow {
            package: truncate(&o.package_name, 40),
            current: format_version(&o.current_version),
            wanted: o
                .wanted_version
                .as_deref()
                .map(format_version)
                .unwrap_or_else(|| "-".to_string()),
            latest: format_version(&o.latest_version),
            update_type: format_delta(version_delta(&o.current_version, &o.latest_version)),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
    println!();
}

fn print_degraded_queries(report: &CheckReport) {
    for query in report
        .queries
        .iter()
        .filter(|q| q.state == QueryState::Degraded)
    {
        println!(
            "Note: {} query skipped ({}); treating it as having no findings.",
            query.name,
            query.detail.as_deref().unwrap_or("unknown failure")
        );
    }
}

fn format_delta(delta: VersionDelta) -> String {
    match delta {
        VersionDelta::Major => "\x1b[31mMAJOR\x1b[0m".to_string(),
        VersionDelta::Minor => "\x1b[33mminor\x1b[0m".to_string(),
        VersionDelta::Patch => "\x1b[32mpatch\x1b[0m".to_string(),
        VersionDelta::None => "-".to_string(),
        VersionDelta::Unknown => "unknown".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn format_version(version: &str) -> String {
    if version.is_empty() {
        "-".to_string()
    } else {
        version.to_string()
    }
}
