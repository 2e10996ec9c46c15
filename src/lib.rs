/*!
 * # mdlingo - Incremental Markdown translation with AI
 *
 * A Rust library for keeping translated copies of a Markdown tree up to date.
 *
 * ## Features
 *
 * - Discover `*.md` sources recursively, skipping `name.<lang>.md` artifacts
 * - Decide per document whether its translation is missing, stale or fresh:
 *   - `no-check`: only missing artifacts are translated
 *   - `content-hash`: SHA-256 of the source recorded as `source_hash`
 *     in the artifact's front-matter
 *   - `source-revision`: last git revision recorded as a leading
 *     `<!-- source_commit: ... -->` comment, with an mtime fallback
 * - Translate whole documents through the DashScope text-generation API
 * - Stamp provenance into every written artifact
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `file_utils`: Source discovery and artifact paths
 * - `front_matter`: Ordered front-matter parsing and serialization
 * - `provenance`: Content hashes and provenance stamping
 * - `revision`: Version-control revision lookup
 * - `staleness`: Staleness verdicts per policy
 * - `translation`: Translation service on top of a provider
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::dashscope`: DashScope API client
 *   - `providers::mock`: In-process mock for tests
 * - `app_controller`: Main application controller and exit statuses
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod front_matter;
pub mod language_utils;
pub mod provenance;
pub mod providers;
pub mod revision;
pub mod staleness;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, StalenessPolicy};
pub use app_controller::{Controller, ExitStatus, RunSummary};
pub use errors::{AppError, ProviderError, RevisionLookupError, TranslationError};
pub use staleness::{StalenessOracle, StalenessVerdict};
pub use translation::TranslationService;
