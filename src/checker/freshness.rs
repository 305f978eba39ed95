use super::version::{version_delta, VersionDelta};
use crate::config::{Config, FreshnessPolicy, IgnoreConfig, Thresholds};
use crate::model::{Finding, FindingKind, OutdatedEntry};

/// Turns outdated entries into findings according to the freshness policy.
#[derive(Debug, Clone, Default)]
pub struct FreshnessAnalyzer {
    policy: FreshnessPolicy,
    thresholds: Thresholds,
    ignore: IgnoreConfig,
}

impl FreshnessAnalyzer {
    pub fn new(policy: FreshnessPolicy) -> Self {
        Self {
            policy,
            thresholds: Thresholds::default(),
            ignore: IgnoreConfig::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            policy: config.policy,
            thresholds: config.thresholds,
            ignore: config.ignore.clone(),
        }
    }

    /// Classifies every entry, in input order.
    ///
    /// Entries that are up to date produce nothing. Entries whose versions
    /// cannot be compared produce an info finding.
    pub fn analyze(&self, entries: &[OutdatedEntry]) -> Vec<Finding> {
        entries
            .iter()
            .filter(|entry| !self.ignore.should_ignore_outdated(&entry.package_name))
            .filter_map(|entry| self.classify(entry))
            .collect()
    }

    fn classify(&self, entry: &OutdatedEntry) -> Option<Finding> {
        let delta = version_delta(&entry.current_version, &entry.latest_version);

        let (severity, summary, days) = match delta {
            VersionDelta::None => return None,
            VersionDelta::Unknown => {
                return Some(Finding::info(format!(
                    "{}: unable to compare versions '{}' and '{}'",
                    entry.package_name, entry.current_version, entry.latest_version
                )));
            }
            VersionDelta::Major => (
                self.policy.major,
                "major version available",
                self.thresholds.major_days,
            ),
            VersionDelta::Minor => (
                self.policy.minor,
                "minor version available",
                self.thresholds.minor_days,
            ),
            VersionDelta::Patch => (
                self.policy.patch,
                "patch version available, consider updating soon",
                self.thresholds.patch_days,
            ),
        };

        let message = format!(
            "{} {} -> {}: {} (policy: within {} days)",
            entry.package_name, entry.current_version, entry.latest_version, summary, days
        );

        Some(Finding::new(message, severity, FindingKind::Freshness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FindingSeverity;

    fn severities(findings: &[Finding]) -> Vec<FindingSeverity> {
        findings.iter().map(|f| f.severity).collect()
    }

    #[test]
    fn test_default_policy_mapping() {
        let analyzer = FreshnessAnalyzer::default();
        let entries = vec![
            OutdatedEntry::new("react", "17.0.2", "18.2.0"),
            OutdatedEntry::new("eslint", "8.1.0", "8.4.0"),
            OutdatedEntry::new("lodash", "4.17.20", "4.17.21"),
        ];

        let findings = analyzer.analyze(&entries);
        assert_eq!(
            severities(&findings),
            vec![
                FindingSeverity::Warning,
                FindingSeverity::Warning,
                FindingSeverity::Blocking
            ]
        );
        assert!(findings[0].message.contains("major version available"));
        assert!(findings[1].message.contains("minor version available"));
        assert!(findings[2].message.contains("patch version available"));
    }

    #[test]
    fn test_up_to_date_produces_nothing() {
        let analyzer = FreshnessAnalyzer::default();
        let entries = vec![
            OutdatedEntry::new("typescript", "5.4.2", "5.4.2"),
            OutdatedEntry::new("vite", "6.0.0", "5.9.0"),
        ];

        assert!(analyzer.analyze(&entries).is_empty());
    }

    #[test]
    fn test_unknown_is_info() {
        let analyzer = FreshnessAnalyzer::default();
        let entries = vec![OutdatedEntry::new("left-pad", "", "1.3.0")];

        let findings = analyzer.analyze(&entries);
        assert_eq!(severities(&findings), vec![FindingSeverity::Info]);
        assert!(findings[0].message.contains("unable to compare"));
    }

    #[test]
    fn test_message_format() {
        let analyzer = FreshnessAnalyzer::default();
        let findings = analyzer.analyze(&[OutdatedEntry::new("lodash", "4.17.20", "4.17.21")]);

        assert_eq!(
            findings[0].message,
            "lodash 4.17.20 -> 4.17.21: patch version available, consider updating soon (policy: within 7 days)"
        );
    }

    #[test]
    fn test_preserves_input_order() {
        let analyzer = FreshnessAnalyzer::default();
        let entries = vec![
            OutdatedEntry::new("zod", "3.0.0", "3.0.1"),
            OutdatedEntry::new("axios", "0.1.0", "1.0.0"),
            OutdatedEntry::new("moment", "2.0.0", "2.1.0"),
        ];

        let names: Vec<_> = analyzer
            .analyze(&entries)
            .iter()
            .map(|f| f.message.split(' ').next().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["zod", "axios", "moment"]);
    }

    #[test]
    fn test_custom_policy() {
        let analyzer = FreshnessAnalyzer::new(FreshnessPolicy {
            major: FindingSeverity::Blocking,
            minor: FindingSeverity::Info,
            patch: FindingSeverity::Warning,
        });
        let entries = vec![
            OutdatedEntry::new("a", "1.0.0", "2.0.0"),
            OutdatedEntry::new("b", "1.0.0", "1.1.0"),
            OutdatedEntry::new("c", "1.0.0", "1.0.1"),
        ];

        assert_eq!(
            severities(&analyzer.analyze(&entries)),
            vec![
                FindingSeverity::Blocking,
                FindingSeverity::Info,
                FindingSeverity::Warning
            ]
        );
    }

    #[test]
    fn test_ignored_packages_are_skipped() {
        let mut config = Config::default();
        config.ignore.outdated = vec!["@types/*".to_string()];
        config.ignore.packages = vec!["lodash".to_string()];
        let analyzer = FreshnessAnalyzer::from_config(&config);

        let entries = vec![
            OutdatedEntry::new("@types/node", "20.1.0", "20.1.1"),
            OutdatedEntry::new("lodash", "4.17.20", "4.17.21"),
            OutdatedEntry::new("express", "4.18.1", "4.18.2"),
        ];

        let findings = analyzer.analyze(&entries);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.starts_with("express"));
    }
}
