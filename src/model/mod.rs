//! Core data types for dependency reports, findings, and verdicts.
//!
//! This module contains the fundamental types used throughout depgate:
//!
//! - [`OutdatedEntry`] - A dependency behind the registry's latest version
//! - [`VulnerabilityEntry`] - An audit entry with its severity
//! - [`Finding`] - A single categorized message produced by a check
//! - [`Verdict`] - The pass/fail decision for one run
//! - [`CheckReport`] - Everything one run observed, for output
//!
//! # Example
//!
//! ```
//! use depgate::{Finding, Verdict};
//!
//! let finding = Finding::warning("react 17.0.2 -> 18.2.0: major version available");
//! let verdict = Verdict::from_findings(vec![finding]);
//!
//! assert_eq!(verdict.exit_code, 0);
//! assert_eq!(verdict.warnings.len(), 1);
//! ```

mod entry;
mod finding;
mod report;

pub use entry::*;
pub use finding::*;
pub use report::*;
