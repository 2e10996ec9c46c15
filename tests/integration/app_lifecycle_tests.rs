/*!
 * End-to-end tests for full translation runs
 */

use anyhow::Result;
use std::fs;
use mdlingo::app_config::StalenessPolicy;
use mdlingo::errors::{AppError, ProviderError, TranslationError};
use mdlingo::provenance::content_hash;
use mdlingo::providers::mock::MockProvider;
use mdlingo::{Controller, ExitStatus, RunSummary};
use crate::common::{self, StubRevisionSource};

/// A missing artifact is translated, stamped with the hash, and reported as a change
#[tokio::test]
async fn test_run_contentHash_withMissingArtifact_shouldWriteStampedTranslation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "guide.md", "X")?;
    let provider = MockProvider::working();
    let controller = common::test_controller(
        common::test_config(temp_dir.path(), StalenessPolicy::ContentHash),
        &provider,
        &StubRevisionSource::failing(),
    );

    let outcome = controller.run().await;

    let artifact = fs::read_to_string(temp_dir.path().join("guide.en.md"))?;
    assert_eq!(
        artifact,
        format!("---\nsource_hash: {}\n---\n[TRANSLATED] X", content_hash(b"X"))
    );
    assert_eq!(
        outcome.as_ref().unwrap(),
        &RunSummary { discovered: 1, translated: 1, up_to_date: 0 }
    );
    assert_eq!(ExitStatus::from_outcome(&outcome).code(), 1);
    Ok(())
}

/// A second run right after the first finds everything up to date
#[tokio::test]
async fn test_run_contentHash_rerun_shouldMakeNoCallsAndNoWrites() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "guide.md", "X")?;
    common::create_test_file(temp_dir.path(), "docs/setup.md", "Y")?;
    let provider = MockProvider::working();
    let controller = common::test_controller(
        common::test_config(temp_dir.path(), StalenessPolicy::ContentHash),
        &provider,
        &StubRevisionSource::failing(),
    );

    controller.run().await?;
    assert_eq!(provider.request_count(), 2);
    let artifact_path = temp_dir.path().join("guide.en.md");
    let before = fs::read_to_string(&artifact_path)?;
    common::set_modified_offset(&artifact_path, -300)?;
    let mtime_before = fs::metadata(&artifact_path)?.modified()?;

    let outcome = controller.run().await;

    assert_eq!(provider.request_count(), 2);
    assert_eq!(fs::read_to_string(&artifact_path)?, before);
    assert_eq!(fs::metadata(&artifact_path)?.modified()?, mtime_before);
    assert_eq!(outcome.as_ref().unwrap().up_to_date, 2);
    assert_eq!(ExitStatus::from_outcome(&outcome), ExitStatus::NoChanges);
    assert_eq!(ExitStatus::from_outcome(&outcome).code(), 0);
    Ok(())
}

/// Editing a source re-translates only that document
#[tokio::test]
async fn test_run_contentHash_afterEdit_shouldRetranslateChangedSource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let guide = common::create_test_file(temp_dir.path(), "guide.md", "X")?;
    common::create_test_file(temp_dir.path(), "other.md", "Y")?;
    let provider = MockProvider::working();
    let controller = common::test_controller(
        common::test_config(temp_dir.path(), StalenessPolicy::ContentHash),
        &provider,
        &StubRevisionSource::failing(),
    );
    controller.run().await?;

    fs::write(&guide, "X2")?;
    let summary = controller.run().await?;

    assert_eq!(summary.translated, 1);
    assert_eq!(summary.up_to_date, 1);
    assert_eq!(provider.received().last().map(String::as_str), Some("X2"));
    let artifact = fs::read_to_string(temp_dir.path().join("guide.en.md"))?;
    assert!(artifact.contains(&content_hash(b"X2")));
    assert!(artifact.ends_with("[TRANSLATED] X2"));
    Ok(())
}

/// Front-matter returned by the provider keeps its fields, with source_hash added
#[tokio::test]
async fn test_run_contentHash_withTranslatedFrontMatter_shouldMergeHash() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "guide.md", "---\ntitle: 指南\n---\n正文\n")?;
    let provider = MockProvider::fixed("---\ntitle: Guide\n---\nBody\n");
    let controller = common::test_controller(
        common::test_config(temp_dir.path(), StalenessPolicy::ContentHash),
        &provider,
        &StubRevisionSource::failing(),
    );

    controller.run().await?;

    let hash = content_hash("---\ntitle: 指南\n---\n正文\n".as_bytes());
    let artifact = fs::read_to_string(temp_dir.path().join("guide.en.md"))?;
    assert_eq!(artifact, format!("---\nsource_hash: {}\ntitle: Guide\n---\nBody\n", hash));
    Ok(())
}

/// A malformed provider response aborts the run before later documents
#[tokio::test]
async fn test_run_withMalformedResponse_shouldAbortWithFatalStatus() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a.md", "A")?;
    common::create_test_file(temp_dir.path(), "b.md", "B")?;
    let provider = MockProvider::malformed();
    let controller = common::test_controller(
        common::test_config(temp_dir.path(), StalenessPolicy::ContentHash),
        &provider,
        &StubRevisionSource::failing(),
    );

    let outcome = controller.run().await;

    assert!(matches!(
        outcome,
        Err(AppError::Translation(TranslationError::Provider(
            ProviderError::MalformedResponse(_)
        )))
    ));
    assert_eq!(provider.request_count(), 1);
    assert!(!temp_dir.path().join("a.en.md").exists());
    assert!(!temp_dir.path().join("b.en.md").exists());
    assert_eq!(ExitStatus::from_outcome(&outcome).code(), 127);
    Ok(())
}

/// Under the revision policy the artifact starts with the commit marker
#[tokio::test]
async fn test_run_sourceRevision_shouldStampCommitAndSkipOnRerun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "guide.md", "X")?;
    let provider = MockProvider::working();
    let revisions = StubRevisionSource::resolving("9f2c1e0");
    let controller = common::test_controller(
        common::test_config(temp_dir.path(), StalenessPolicy::SourceRevision),
        &provider,
        &revisions,
    );

    let first = controller.run().await?;
    let artifact_path = temp_dir.path().join("guide.en.md");
    assert!(first.changed());
    assert_eq!(
        fs::read_to_string(&artifact_path)?,
        "<!-- source_commit: 9f2c1e0 -->\n[TRANSLATED] X"
    );

    let second = controller.run().await?;
    assert!(!second.changed());
    assert_eq!(provider.request_count(), 1);

    revisions.set(Some("a1b2c3d"));
    let third = controller.run().await?;
    assert!(third.changed());
    assert_eq!(
        fs::read_to_string(&artifact_path)?,
        "<!-- source_commit: a1b2c3d -->\n[TRANSLATED] X"
    );
    Ok(())
}

/// Without a resolvable revision the artifact is written unmarked and mtimes decide
#[tokio::test]
async fn test_run_sourceRevision_withFailedLookup_shouldFallBackToMtime() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "guide.md", "X")?;
    common::set_modified_offset(&source, -600)?;
    let provider = MockProvider::working();
    let controller = common::test_controller(
        common::test_config(temp_dir.path(), StalenessPolicy::SourceRevision),
        &provider,
        &StubRevisionSource::failing(),
    );

    assert!(controller.run().await?.changed());
    let artifact_path = temp_dir.path().join("guide.en.md");
    assert_eq!(fs::read_to_string(&artifact_path)?, "[TRANSLATED] X");

    assert!(!controller.run().await?.changed());

    common::set_modified_offset(&source, 60)?;
    assert!(controller.run().await?.changed());
    assert_eq!(provider.request_count(), 2);
    Ok(())
}

/// The no-check policy only fills in missing artifacts and never stamps
#[tokio::test]
async fn test_run_noCheck_shouldOnlyTranslateMissingArtifacts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "guide.md", "X")?;
    common::create_test_file(temp_dir.path(), "guide.en.md", "old translation")?;
    common::create_test_file(temp_dir.path(), "new.md", "N")?;
    let provider = MockProvider::working();
    let controller = common::test_controller(
        common::test_config(temp_dir.path(), StalenessPolicy::NoCheck),
        &provider,
        &StubRevisionSource::failing(),
    );

    let summary = controller.run().await?;

    assert_eq!(summary, RunSummary { discovered: 2, translated: 1, up_to_date: 1 });
    assert_eq!(fs::read_to_string(temp_dir.path().join("guide.en.md"))?, "old translation");
    assert_eq!(fs::read_to_string(temp_dir.path().join("new.en.md"))?, "[TRANSLATED] N");
    Ok(())
}

/// A missing API key fails before any document is touched
#[tokio::test]
async fn test_with_config_withoutApiKey_shouldFailBeforeScanning() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path(), StalenessPolicy::ContentHash);
    config.translation.api_key.clear();

    let outcome = Controller::with_config(config).map(|_| RunSummary::default());

    assert!(matches!(outcome, Err(AppError::Configuration(_))));
    assert_eq!(ExitStatus::from_outcome(&outcome), ExitStatus::ConfigurationError);
    assert_eq!(ExitStatus::from_outcome(&outcome).code(), 1);
    Ok(())
}

/// A content directory that does not exist is fatal
#[tokio::test]
async fn test_run_withMissingContentDir_shouldReturnDiscoveryError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let provider = MockProvider::working();
    let controller = common::test_controller(
        common::test_config(&temp_dir.path().join("content"), StalenessPolicy::ContentHash),
        &provider,
        &StubRevisionSource::failing(),
    );

    let outcome = controller.run().await;

    assert!(matches!(outcome, Err(AppError::Discovery(_))));
    assert_eq!(ExitStatus::from_outcome(&outcome).code(), 127);
    assert_eq!(provider.request_count(), 0);
    Ok(())
}

/// A dotted-stem source settles after one run instead of growing new artifacts
#[tokio::test]
async fn test_run_withDottedStemSource_shouldSettleOnSecondRun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "v1.2.guide.md", "X")?;
    let provider = MockProvider::working();
    let controller = common::test_controller(
        common::test_config(temp_dir.path(), StalenessPolicy::ContentHash),
        &provider,
        &StubRevisionSource::failing(),
    );

    let first = controller.run().await;
    let second = controller.run().await;

    assert_eq!(ExitStatus::from_outcome(&first).code(), 1);
    assert_eq!(
        second.as_ref().unwrap(),
        &RunSummary { discovered: 1, translated: 0, up_to_date: 1 }
    );
    assert_eq!(ExitStatus::from_outcome(&second).code(), 0);
    assert_eq!(provider.request_count(), 1);
    assert!(temp_dir.path().join("v1.2.guide.en.md").exists());
    assert!(!temp_dir.path().join("v1.2.guide.en.en.md").exists());
    Ok(())
}

/// A source that is not valid UTF-8 is translated lossily and later documents still run
#[tokio::test]
async fn test_run_withNonUtf8Source_shouldTranslateLossilyAndContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let gbk = [0xC4, 0xE3, 0xBA, 0xC3];
    fs::write(temp_dir.path().join("a.md"), gbk)?;
    common::create_test_file(temp_dir.path(), "b.md", "B")?;
    let provider = MockProvider::working();
    let controller = common::test_controller(
        common::test_config(temp_dir.path(), StalenessPolicy::ContentHash),
        &provider,
        &StubRevisionSource::failing(),
    );

    let summary = controller.run().await?;

    assert_eq!(summary.translated, 2);
    assert!(provider.received()[0].contains('\u{FFFD}'));
    let artifact = fs::read_to_string(temp_dir.path().join("a.en.md"))?;
    assert!(artifact.contains(&content_hash(&gbk)));
    assert_eq!(fs::read_to_string(temp_dir.path().join("b.en.md"))?, format!(
        "---\nsource_hash: {}\n---\n[TRANSLATED] B",
        content_hash(b"B")
    ));

    assert!(!controller.run().await?.changed());
    Ok(())
}

/// An artifact that is not valid UTF-8 is replaced rather than aborting the run
#[tokio::test]
async fn test_run_withNonUtf8Artifact_shouldRetranslate() -> Result<()> {
    for policy in [StalenessPolicy::ContentHash, StalenessPolicy::SourceRevision] {
        let temp_dir = common::create_temp_dir()?;
        common::create_test_file(temp_dir.path(), "guide.md", "X")?;
        fs::write(temp_dir.path().join("guide.en.md"), [0xFF, 0xFE, 0x00])?;
        let provider = MockProvider::working();
        let controller = common::test_controller(
            common::test_config(temp_dir.path(), policy),
            &provider,
            &StubRevisionSource::resolving("9f2c1e0"),
        );

        let summary = controller.run().await?;

        assert_eq!(summary.translated, 1, "policy {}", policy);
        assert!(fs::read_to_string(temp_dir.path().join("guide.en.md"))?.contains("[TRANSLATED] X"));
    }
    Ok(())
}
