//! Timeout and failure policy for external queries.
//!
//! Every query runs through [`DegradationController::run`], which moves a
//! small state machine from `idle` through `querying` to one of three
//! terminal states:
//!
//! | State | Reached when |
//! |-------|--------------|
//! | `succeeded` | the query returned parseable output in time |
//! | `degraded` | the query failed and network failure is allowed; the result is empty |
//! | `fatal` | the query failed and network failure is not allowed |
//!
//! Timeouts, spawn failures, registry errors and malformed output are all
//! failures. Nothing past this module sees a [`QueryError`].

use crate::config::Config;
use crate::source::QueryError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryState {
    Idle,
    Querying,
    Succeeded,
    Degraded,
    Fatal,
}

impl QueryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryState::Idle => "idle",
            QueryState::Querying => "querying",
            QueryState::Succeeded => "succeeded",
            QueryState::Degraded => "degraded",
            QueryState::Fatal => "fatal",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QueryState::Succeeded | QueryState::Degraded | QueryState::Fatal
        )
    }

    pub fn can_transition_to(&self, next: QueryState) -> bool {
        matches!(
            (self, next),
            (QueryState::Idle, QueryState::Querying)
                | (
                    QueryState::Querying,
                    QueryState::Succeeded | QueryState::Degraded | QueryState::Fatal
                )
        )
    }
}

impl std::fmt::Display for QueryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a query ended, with its result where there is one.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    Succeeded(T),
    /// Failed under a tolerant policy; `value` is the empty result.
    Degraded { value: T, reason: String },
    Fatal { reason: String },
}

impl<T> QueryOutcome<T> {
    pub fn state(&self) -> QueryState {
        match self {
            QueryOutcome::Succeeded(_) => QueryState::Succeeded,
            QueryOutcome::Degraded { .. } => QueryState::Degraded,
            QueryOutcome::Fatal { .. } => QueryState::Fatal,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            QueryOutcome::Succeeded(value) | QueryOutcome::Degraded { value, .. } => Some(value),
            QueryOutcome::Fatal { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            QueryOutcome::Succeeded(_) => None,
            QueryOutcome::Degraded { reason, .. } | QueryOutcome::Fatal { reason } => Some(reason),
        }
    }
}

impl<T: Default> QueryOutcome<T> {
    /// The query's data, or the empty value when it is fatal.
    pub fn into_value(self) -> T {
        match self {
            QueryOutcome::Succeeded(value) | QueryOutcome::Degraded { value, .. } => value,
            QueryOutcome::Fatal { .. } => T::default(),
        }
    }
}

struct QueryTracker {
    name: &'static str,
    state: QueryState,
}

impl QueryTracker {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            state: QueryState::Idle,
        }
    }

    fn advance(&mut self, next: QueryState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid query transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(query = self.name, from = %self.state, to = %next, "query state");
        self.state = next;
    }
}

/// Applies the timeout and network-failure policy to queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegradationController {
    timeout: Duration,
    allow_network_failure: bool,
}

impl DegradationController {
    pub fn new(timeout: Duration, allow_network_failure: bool) -> Self {
        Self {
            timeout,
            allow_network_failure,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.query_timeout(), config.allow_network_failure)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs one query under the timeout and resolves it to an outcome.
    ///
    /// On timeout the query future is dropped and never retried.
    pub async fn run<T, F>(&self, name: &'static str, query: F) -> QueryOutcome<T>
    where
        T: Default,
        F: Future<Output = Result<T, QueryError>>,
    {
        let mut tracker = QueryTracker::new(name);
        tracker.advance(QueryState::Querying);

        let result = match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::Timeout(self.timeout)),
        };

        match result {
            Ok(value) => {
                tracker.advance(QueryState::Succeeded);
                QueryOutcome::Succeeded(value)
            }
            Err(err) => self.fail(&mut tracker, err),
        }
    }

    fn fail<T: Default>(&self, tracker: &mut QueryTracker, err: QueryError) -> QueryOutcome<T> {
        let reason = err.to_string();

        if self.allow_network_failure {
            tracker.advance(QueryState::Degraded);
            tracing::info!(query = tracker.name, %reason, "query degraded, treating as empty");
            QueryOutcome::Degraded {
                value: T::default(),
                reason,
            }
        } else {
            tracker.advance(QueryState::Fatal);
            tracing::warn!(query = tracker.name, %reason, "query failed");
            QueryOutcome::Fatal { reason }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(allow_network_failure: bool) -> DegradationController {
        DegradationController::new(Duration::from_millis(20), allow_network_failure)
    }

    async fn never_answers() -> Result<Vec<String>, QueryError> {
        std::future::pending().await
    }

    #[test]
    fn test_transitions() {
        assert!(QueryState::Idle.can_transition_to(QueryState::Querying));
        assert!(QueryState::Querying.can_transition_to(QueryState::Succeeded));
        assert!(QueryState::Querying.can_transition_to(QueryState::Degraded));
        assert!(QueryState::Querying.can_transition_to(QueryState::Fatal));

        assert!(!QueryState::Idle.can_transition_to(QueryState::Succeeded));
        assert!(!QueryState::Succeeded.can_transition_to(QueryState::Querying));
        assert!(!QueryState::Degraded.can_transition_to(QueryState::Fatal));
        assert!(!QueryState::Fatal.can_transition_to(QueryState::Degraded));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!QueryState::Idle.is_terminal());
        assert!(!QueryState::Querying.is_terminal());
        assert!(QueryState::Succeeded.is_terminal());
        assert!(QueryState::Degraded.is_terminal());
        assert!(QueryState::Fatal.is_terminal());
    }

    #[tokio::test]
    async fn test_success() {
        let outcome = controller(false)
            .run("outdated", async { Ok(vec!["lodash".to_string()]) })
            .await;

        assert_eq!(outcome.state(), QueryState::Succeeded);
        assert_eq!(outcome.value(), Some(&vec!["lodash".to_string()]));
        assert_eq!(outcome.reason(), None);
    }

    #[tokio::test]
    async fn test_timeout_degrades_when_allowed() {
        let outcome = controller(true).run("outdated", never_answers()).await;

        assert_eq!(outcome.state(), QueryState::Degraded);
        assert_eq!(outcome.value(), Some(&Vec::new()));
        assert!(outcome.reason().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_timeout_is_fatal_when_strict() {
        let outcome = controller(false).run("audit", never_answers()).await;

        assert_eq!(outcome.state(), QueryState::Fatal);
        assert_eq!(outcome.value(), None);
        assert!(outcome.reason().unwrap().contains("timed out"));
        assert!(outcome.into_value().is_empty());
    }

    #[tokio::test]
    async fn test_parse_error_follows_policy() {
        let failing = || async { Err::<Vec<String>, _>(QueryError::Parse("expected value".into())) };

        let degraded = controller(true).run("audit", failing()).await;
        assert_eq!(degraded.state(), QueryState::Degraded);

        let fatal = controller(false).run("audit", failing()).await;
        assert_eq!(fatal.state(), QueryState::Fatal);
        assert_eq!(fatal.reason(), Some("malformed output: expected value"));
    }

    #[tokio::test]
    async fn test_unreachable_registry_degrades() {
        let outcome = controller(true)
            .run("outdated", async {
                Err::<Vec<String>, _>(QueryError::Unreachable("ENOTFOUND".into()))
            })
            .await;

        assert_eq!(outcome.state(), QueryState::Degraded);
        assert_eq!(outcome.reason(), Some("registry unreachable: ENOTFOUND"));
    }
}
