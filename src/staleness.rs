//! Staleness detection for translation artifacts.
//!
//! Verdict rules per policy:
//! - `NoCheck`: `Missing` if there is no artifact, otherwise `Fresh`.
//! - `ContentHash`: `Missing`, else `StaleHashMismatch` unless the artifact's
//!   `source_hash` equals the SHA-256 of the source bytes.
//! - `SourceRevision`: `Missing`, else `StaleNoMarker` unless the artifact's
//!   leading `source_commit` equals the last revision of the source. When the
//!   revision cannot be resolved the source is stale only if its mtime is
//!   strictly newer than the artifact's.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::app_config::{Config, StalenessPolicy};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::provenance::{self, Provenance};
use crate::revision::RevisionSource;

/// Classification of an artifact relative to its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalenessVerdict {
    /// No artifact exists yet
    Missing,
    /// The artifact's `source_hash` is absent or differs from the source
    StaleHashMismatch,
    /// The artifact's revision marker is absent or outdated, or the source
    /// is newer by modification time
    StaleNoMarker,
    /// The artifact reflects the current source
    Fresh,
}

impl StalenessVerdict {
    /// Whether the document must be (re)translated
    pub fn needs_translation(&self) -> bool {
        !matches!(self, Self::Fresh)
    }
}

/// Result of assessing one source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// Verdict under the active policy
    pub verdict: StalenessVerdict,
    /// Where the translation lives (or will live)
    pub artifact_path: PathBuf,
    /// Marker to stamp into a fresh translation
    pub provenance: Provenance,
}

/// Decides whether source documents need translating
#[derive(Debug, Clone)]
pub struct StalenessOracle {
    policy: StalenessPolicy,
    target_language: String,
    revisions: Arc<dyn RevisionSource>,
}

impl StalenessOracle {
    /// Create an oracle for a policy and target language
    pub fn new(
        policy: StalenessPolicy,
        target_language: impl Into<String>,
        revisions: Arc<dyn RevisionSource>,
    ) -> Self {
        Self {
            policy,
            target_language: target_language.into(),
            revisions,
        }
    }

    /// Create an oracle from the application configuration
    pub fn from_config(config: &Config, revisions: Arc<dyn RevisionSource>) -> Self {
        Self::new(config.policy, config.target_language.clone(), revisions)
    }

    /// Active policy
    pub fn policy(&self) -> StalenessPolicy {
        self.policy
    }

    /// Assess a source document against its artifact
    pub async fn assess(&self, source: &Path) -> Result<Assessment, AppError> {
        let artifact_path = FileManager::artifact_path(source, &self.target_language);
        let artifact_exists = FileManager::file_exists(&artifact_path);

        let (verdict, provenance) = match self.policy {
            StalenessPolicy::NoCheck => {
                let verdict = if artifact_exists {
                    StalenessVerdict::Fresh
                } else {
                    StalenessVerdict::Missing
                };
                (verdict, Provenance::None)
            }
            StalenessPolicy::ContentHash => {
                let hash = provenance::content_hash(&FileManager::read_bytes(source)?);
                let verdict = if !artifact_exists {
                    StalenessVerdict::Missing
                } else {
                    let artifact = read_artifact(&artifact_path)?;
                    match artifact.as_deref().and_then(provenance::read_source_hash) {
                        Some(recorded) if recorded == hash => StalenessVerdict::Fresh,
                        _ => StalenessVerdict::StaleHashMismatch,
                    }
                };
                (verdict, Provenance::SourceHash(hash))
            }
            StalenessPolicy::SourceRevision => {
                self.assess_revision(source, &artifact_path, artifact_exists)
                    .await?
            }
        };

        debug!("{:?} -> {:?} ({})", source, verdict, self.policy);

        Ok(Assessment {
            verdict,
            artifact_path,
            provenance,
        })
    }

    async fn assess_revision(
        &self,
        source: &Path,
        artifact_path: &Path,
        artifact_exists: bool,
    ) -> Result<(StalenessVerdict, Provenance), AppError> {
        let revision = match self.revisions.latest_revision(source).await {
            Ok(revision) => Some(revision),
            Err(e) => {
                warn!(
                    "Could not resolve revision for {:?} ({}), comparing modification times",
                    source, e
                );
                None
            }
        };

        if !artifact_exists {
            let provenance = revision.map_or(Provenance::None, Provenance::SourceCommit);
            return Ok((StalenessVerdict::Missing, provenance));
        }

        match revision {
            Some(revision) => {
                let artifact = read_artifact(artifact_path)?;
                let verdict = match artifact.as_deref().and_then(provenance::read_source_commit) {
                    Some(recorded) if recorded == revision => StalenessVerdict::Fresh,
                    _ => StalenessVerdict::StaleNoMarker,
                };
                Ok((verdict, Provenance::SourceCommit(revision)))
            }
            None => {
                let verdict = if source_is_newer(
                    FileManager::modified_time(source),
                    FileManager::modified_time(artifact_path),
                ) {
                    StalenessVerdict::StaleNoMarker
                } else {
                    StalenessVerdict::Fresh
                };
                Ok((verdict, Provenance::None))
            }
        }
    }
}

/// Artifact text, or `None` when it is not valid UTF-8 and so carries no usable marker
fn read_artifact(path: &Path) -> Result<Option<String>, AppError> {
    match String::from_utf8(FileManager::read_bytes(path)?) {
        Ok(text) => Ok(Some(text)),
        Err(_) => {
            warn!("Translation {:?} is not valid UTF-8, treating it as stale", path);
            Ok(None)
        }
    }
}

/// Modification-time fallback; unknown times count as stale
fn source_is_newer(source: Option<SystemTime>, artifact: Option<SystemTime>) -> bool {
    match (source, artifact) {
        (Some(source), Some(artifact)) => source > artifact,
        _ => true,
    }
}
