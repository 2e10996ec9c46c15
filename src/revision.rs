/*!
 * Source-control revision lookup.
 *
 * Resolves the revision that last touched a file. Lookups are fallible by
 * nature (untracked files, no repository, git not installed) and callers
 * are expected to fall back to modification times on any error.
 */

use async_trait::async_trait;
use log::debug;
use std::fmt::Debug;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::errors::RevisionLookupError;

/// Capability resolving the latest revision that touched a path
#[async_trait]
pub trait RevisionSource: Send + Sync + Debug {
    /// Return the revision identifier for `path`
    async fn latest_revision(&self, path: &Path) -> Result<String, RevisionLookupError>;
}

/// Revision lookup backed by `git log`
#[derive(Debug, Clone)]
pub struct GitRevisionSource {
    /// Upper bound on a single lookup
    timeout: Duration,
}

impl GitRevisionSource {
    /// Create a git lookup with the given timeout
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl RevisionSource for GitRevisionSource {
    async fn latest_revision(&self, path: &Path) -> Result<String, RevisionLookupError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file_name = path.file_name().unwrap_or(path.as_os_str());

        let child = Command::new("git")
            .args(["log", "-1", "--format=%H", "--"])
            .arg(file_name)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RevisionLookupError::Timeout(self.timeout.as_secs()))??;

        if !output.status.success() {
            return Err(RevisionLookupError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if revision.is_empty() {
            return Err(RevisionLookupError::Untracked(path.to_path_buf()));
        }

        debug!("Resolved {:?} to revision {}", path, revision);
        Ok(revision)
    }
}
