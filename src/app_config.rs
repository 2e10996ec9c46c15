use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

use crate::errors::AppError;
use crate::file_utils::is_translation_segment;
use crate::language_utils;

/// Application configuration module
/// This module holds the immutable settings built once at startup and
/// handed to the discovery, staleness and translation components.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Root directory scanned for Markdown sources
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO), also used as the artifact filename segment
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// How existing artifacts are judged up to date
    #[serde(default)]
    pub policy: StalenessPolicy,

    /// Translation service config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Timeout for the version-control lookup, in seconds
    #[serde(default = "default_revision_timeout_secs")]
    pub revision_timeout_secs: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Change-detection policy deciding when an artifact must be regenerated
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StalenessPolicy {
    // @policy: Translate only when the artifact is missing
    NoCheck,
    // @policy: Compare the source SHA-256 with `source_hash` in front-matter
    #[default]
    ContentHash,
    // @policy: Compare the last git revision with a `source_commit` comment
    SourceRevision,
}

impl StalenessPolicy {
    // @returns: Kebab-case identifier used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCheck => "no-check",
            Self::ContentHash => "content-hash",
            Self::SourceRevision => "source-revision",
        }
    }
}

impl std::fmt::Display for StalenessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// API key, never serialized back out
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Generation endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,

    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_request_timeout_secs(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_source_language() -> String {
    "zh".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_model() -> String {
    "qwen-plus".to_string()
}

fn default_endpoint() -> String {
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_revision_timeout_secs() -> u64 {
    10
}

fn default_system_prompt() -> String {
    "You are a professional translator. Translate the following {source_language} text to {target_language}, maintaining the technical accuracy, tone and natural flow of the content. Preserve the Markdown structure and output only the translation.".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.translation.api_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "Please set the DASHSCOPE_API_KEY environment variable".to_string(),
            ));
        }

        for code in [&self.source_language, &self.target_language] {
            if !language_utils::is_valid_language_code(code) {
                return Err(AppError::Configuration(format!("Invalid language code: {}", code)));
            }
        }

        // Artifacts must look like translations or the next run would pick them up as sources
        if !is_translation_segment(&self.target_language) {
            return Err(AppError::Configuration(format!(
                "Target language '{}' cannot be used as a filename segment",
                self.target_language
            )));
        }

        if self.translation.model.trim().is_empty() {
            return Err(AppError::Configuration("Model identifier must not be empty".to_string()));
        }

        Ok(())
    }

    /// Render the system prompt with language names filled in
    pub fn system_prompt(&self) -> String {
        let source = language_utils::get_language_name(&self.source_language)
            .unwrap_or_else(|| self.source_language.clone());
        let target = language_utils::get_language_name(&self.target_language)
            .unwrap_or_else(|| self.target_language.clone());

        self.translation
            .system_prompt
            .replace("{source_language}", &source)
            .replace("{target_language}", &target)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            content_dir: default_content_dir(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            policy: StalenessPolicy::default(),
            translation: TranslationConfig::default(),
            revision_timeout_secs: default_revision_timeout_secs(),
            log_level: LogLevel::default(),
        }
    }
}
