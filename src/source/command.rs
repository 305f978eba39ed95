use super::{parse_audit, parse_outdated, PackageManagerKind, QueryError, ReportSource};
use crate::checker::AuditReport;
use crate::model::OutdatedEntry;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

/// Runs the package manager's CLI in a project directory.
pub struct CommandSource {
    kind: PackageManagerKind,
    project_dir: PathBuf,
}

impl CommandSource {
    pub fn new(kind: PackageManagerKind, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            project_dir: project_dir.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String, QueryError> {
        let program = self.kind.program();
        tracing::debug!(%program, ?args, dir = %self.project_dir.display(), "running query");

        // The child is killed if the query future is dropped on timeout.
        let output = Command::new(&program)
            .args(args)
            .current_dir(&self.project_dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| QueryError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        // `npm outdated` exits 1 whenever something is outdated, and `npm
        // audit` whenever something is vulnerable, so only a non-zero exit
        // with nothing on stdout counts as a failure.
        if !output.status.success() && stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} exited with {}", program, output.status));
            return Err(QueryError::Unreachable(reason));
        }

        Ok(stdout)
    }
}

#[async_trait]
impl ReportSource for CommandSource {
    fn kind(&self) -> PackageManagerKind {
        self.kind
    }

    async fn outdated(&self) -> Result<Vec<OutdatedEntry>, QueryError> {
        let stdout = self.run(self.kind.outdated_args()).await?;
        parse_outdated(&stdout)
    }

    async fn audit(&self) -> Result<AuditReport, QueryError> {
        let stdout = self.run(self.kind.audit_args()).await?;
        parse_audit(&stdout)
    }
}
