use log::{error, info};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::provenance;
use crate::revision::{GitRevisionSource, RevisionSource};
use crate::staleness::{StalenessOracle, StalenessVerdict};
use crate::translation::TranslationService;

// @module: Application controller driving discovery, staleness checks and translation

/// Process exit status for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Run completed and every artifact was already up to date
    NoChanges,
    /// Run completed and at least one artifact was written
    Changed,
    /// Configuration was missing or invalid; nothing was scanned
    ConfigurationError,
    /// Run aborted on a discovery, read, translation or write failure
    Fatal,
}

impl ExitStatus {
    /// Numeric process exit code
    pub fn code(&self) -> i32 {
        match self {
            Self::NoChanges => 0,
            Self::Changed => 1,
            Self::ConfigurationError => 1,
            Self::Fatal => 127,
        }
    }

    /// Map the outcome of a run to an exit status
    pub fn from_outcome(outcome: &Result<RunSummary, AppError>) -> Self {
        match outcome {
            Ok(summary) if summary.changed() => Self::Changed,
            Ok(_) => Self::NoChanges,
            Err(e) if e.is_configuration() => Self::ConfigurationError,
            Err(_) => Self::Fatal,
        }
    }
}

/// Counters collected over one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Source documents found
    pub discovered: usize,
    /// Artifacts written
    pub translated: usize,
    /// Documents skipped as up to date
    pub up_to_date: usize,
}

impl RunSummary {
    /// Whether any artifact was written
    pub fn changed(&self) -> bool {
        self.translated > 0
    }
}

/// Main application controller for document translation
#[derive(Debug, Clone)]
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Staleness decisions
    oracle: StalenessOracle,
    // @field: Translation backend
    translator: TranslationService,
}

impl Controller {
    // @method: Create a controller talking to DashScope and git
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;

        let revisions: Arc<dyn RevisionSource> = Arc::new(GitRevisionSource::new(
            Duration::from_secs(config.revision_timeout_secs),
        ));
        let translator = TranslationService::from_config(&config);

        Ok(Self::with_components(config, revisions, translator))
    }

    // @method: Create a controller with injected collaborators
    pub fn with_components(
        config: Config,
        revisions: Arc<dyn RevisionSource>,
        translator: TranslationService,
    ) -> Self {
        let oracle = StalenessOracle::from_config(&config, revisions);
        Self {
            config,
            oracle,
            translator,
        }
    }

    /// The configuration this controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate every stale or missing artifact under the content directory.
    ///
    /// Documents are processed one at a time; the first failure aborts the
    /// remaining documents.
    pub async fn run(&self) -> Result<RunSummary, AppError> {
        self.run_folder(&self.config.content_dir).await
    }

    /// Translate every stale or missing artifact under `root`
    pub async fn run_folder(&self, root: &Path) -> Result<RunSummary, AppError> {
        let sources = FileManager::without_artifacts(
            FileManager::find_markdown_sources(root)?,
            &self.config.target_language,
        );
        info!("Found {} markdown files", sources.len());

        let mut summary = RunSummary {
            discovered: sources.len(),
            ..RunSummary::default()
        };

        for source in &sources {
            match self.process_file(source).await {
                Ok(true) => summary.translated += 1,
                Ok(false) => summary.up_to_date += 1,
                Err(e) => {
                    error!("Translation failed {:?}: {}", source, e);
                    return Err(e);
                }
            }
        }

        info!(
            "All files processed: {} translated, {} up to date",
            summary.translated, summary.up_to_date
        );
        if summary.changed() {
            info!("Updates detected");
        } else {
            info!("No files needed updating");
        }

        Ok(summary)
    }

    /// Bring one document's artifact up to date; returns whether it was written
    pub async fn process_file(&self, source: &Path) -> Result<bool, AppError> {
        let assessment = self.oracle.assess(source).await?;

        match assessment.verdict {
            StalenessVerdict::Fresh => {
                info!("Translation is up to date: {:?}", assessment.artifact_path);
                return Ok(false);
            }
            StalenessVerdict::Missing => info!("Translating: {:?}", source),
            StalenessVerdict::StaleHashMismatch | StalenessVerdict::StaleNoMarker => {
                info!("Source changed, re-translating: {:?}", source)
            }
        }

        let content = FileManager::read_to_string_lossy(source)?;
        let translated = self.translator.translate(&content).await?;
        let stamped = provenance::stamp(&translated, &assessment.provenance);

        FileManager::write_to_file(&assessment.artifact_path, &stamped)?;
        info!("Translation completed: {:?}", assessment.artifact_path);

        Ok(true)
    }
}
