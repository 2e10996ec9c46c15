/*!
 * Error types for the mdlingo application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The response parsed but did not carry the expected output field
    #[error("Invalid response format: {0}")]
    MalformedResponse(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered with nothing to write
    #[error("Provider returned an empty translation")]
    EmptyTranslation,
}

/// Errors raised while resolving the revision that last touched a file.
///
/// These never abort a run; the staleness check falls back to file
/// modification times instead.
#[derive(Error, Debug)]
pub enum RevisionLookupError {
    /// The lookup command could not be started
    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// The lookup command exited unsuccessfully
    #[error("git exited with {status}: {stderr}")]
    CommandFailed {
        /// Exit status as reported by the OS
        status: String,
        /// Trimmed standard error output
        stderr: String,
    },

    /// The file has no history (untracked or outside a repository)
    #[error("No revision found for {0:?}")]
    Untracked(PathBuf),

    /// The lookup did not finish in time
    #[error("git lookup timed out after {0}s")]
    Timeout(u64),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or missing configuration, detected before any work starts
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The content directory could not be walked
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// A document could not be read
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact could not be written
    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),
}

impl AppError {
    /// Whether this error was raised before any document was touched
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<walkdir::Error> for AppError {
    fn from(error: walkdir::Error) -> Self {
        Self::Discovery(error.to_string())
    }
}
