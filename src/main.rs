// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use clap::{Parser, ValueEnum};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use mdlingo::app_config::{self, Config, StalenessPolicy};
use mdlingo::{Controller, ExitStatus};

/// CLI Wrapper for StalenessPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliStalenessPolicy {
    NoCheck,
    ContentHash,
    SourceRevision,
}

impl From<CliStalenessPolicy> for StalenessPolicy {
    fn from(cli_policy: CliStalenessPolicy) -> Self {
        match cli_policy {
            CliStalenessPolicy::NoCheck => StalenessPolicy::NoCheck,
            CliStalenessPolicy::ContentHash => StalenessPolicy::ContentHash,
            CliStalenessPolicy::SourceRevision => StalenessPolicy::SourceRevision,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// mdlingo - incremental Markdown translation with AI
///
/// Translates every Markdown file under the content directory whose
/// translation is missing or out of date, writing `name.<lang>.md` beside it.
#[derive(Parser, Debug)]
#[command(name = "mdlingo")]
#[command(version)]
#[command(about = "Incrementally translate a Markdown tree with AI")]
#[command(long_about = "mdlingo scans a directory of Markdown files and translates the ones whose
translation is missing or stale, using the DashScope text-generation API.

Every option can also be set through its environment variable, so running
`mdlingo` with no arguments is the normal way to use it.

EXIT CODES:
    0    nothing needed updating
    1    at least one translation was written, or the configuration or
         command line is invalid
    127  a document could not be processed; remaining documents were skipped

POLICIES:
    no-check         translate only files without a translation
    content-hash     re-translate when the source SHA-256 differs from `source_hash`
    source-revision  re-translate when the last git commit differs from `source_commit`")]
struct CommandLineOptions {
    /// DashScope API key
    #[arg(long, env = "DASHSCOPE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory scanned for Markdown files
    #[arg(short = 'd', long, env = "MDLINGO_CONTENT_DIR", default_value = "content")]
    content_dir: PathBuf,

    /// How existing translations are judged up to date
    #[arg(short, long, value_enum, env = "MDLINGO_POLICY", default_value = "content-hash")]
    policy: CliStalenessPolicy,

    /// Source language code (e.g., 'zh', 'en', 'fr')
    #[arg(short, long, env = "MDLINGO_SOURCE_LANGUAGE")]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long, env = "MDLINGO_TARGET_LANGUAGE")]
    target_language: Option<String>,

    /// Model name to use for translation
    #[arg(short, long, env = "MDLINGO_MODEL")]
    model: Option<String>,

    /// Generation endpoint URL
    #[arg(long, env = "MDLINGO_ENDPOINT")]
    endpoint: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum, env = "MDLINGO_LOG_LEVEL")]
    log_level: Option<CliLogLevel>,
}

impl CommandLineOptions {
    /// Build the immutable run configuration
    fn into_config(self) -> Config {
        let mut config = Config {
            content_dir: self.content_dir,
            policy: self.policy.into(),
            ..Config::default()
        };

        if let Some(api_key) = self.api_key {
            config.translation.api_key = api_key;
        }
        if let Some(source_language) = self.source_language {
            config.source_language = source_language;
        }
        if let Some(target_language) = self.target_language {
            config.target_language = target_language;
        }
        if let Some(model) = self.model {
            config.translation.model = model;
        }
        if let Some(endpoint) = self.endpoint {
            config.translation.endpoint = endpoint;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level.into();
        }

        config
    }
}

// @returns: Exit code for a rejected command line; help and version output succeed
fn argument_error_code(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        ExitStatus::ConfigurationError.code()
    } else {
        0
    }
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Info until the configuration says otherwise
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let options = match CommandLineOptions::try_parse() {
        Ok(options) => options,
        Err(e) => {
            let _ = e.print();
            std::process::exit(argument_error_code(&e));
        }
    };
    let config = options.into_config();
    log::set_max_level(config.log_level.to_level_filter());

    let outcome = match Controller::with_config(config) {
        Ok(controller) => {
            info!(
                "Translating {:?} to '{}' ({} policy)",
                controller.config().content_dir,
                controller.config().target_language,
                controller.config().policy
            );
            controller.run().await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = &outcome {
        error!("{}", e);
    }

    let status = ExitStatus::from_outcome(&outcome);
    log::logger().flush();
    std::process::exit(status.code());
}
