pub mod check;
pub mod checker;
pub mod config;
pub mod degrade;
pub mod model;
pub mod output;
pub mod source;

pub use check::run_check;
pub use config::Config;
pub use degrade::{DegradationController, QueryOutcome, QueryState};
pub use model::{CheckReport, Finding, FindingSeverity, OutdatedEntry, Verdict, VulnerabilityEntry};
pub use source::{CommandSource, PackageManagerKind, ReportSource};
