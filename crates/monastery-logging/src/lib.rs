//! Logging setup for Monastery360 services.
//!
//! Structured JSONL output by default, with an optional human-readable
//! console mode for development and rotating file output for deployed
//! services. Level filtering honors `RUST_LOG` over the configured
//! default.
//!
//! ```ignore
//! use monastery_logging::{LogConfig, SubscriberBuilder};
//!
//! // JSONL to console with defaults
//! SubscriberBuilder::new().init();
//!
//! // Pretty output while developing
//! SubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init();
//! ```

pub mod config;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};

use std::fs::{self, File};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Builder that assembles and installs the global subscriber.
pub struct SubscriberBuilder {
    config: LogConfig,
}

impl SubscriberBuilder {
    /// Default configuration: JSONL to the console.
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    pub fn with_file_output(mut self, file: FileConfig) -> Self {
        self.config.file = Some(file);
        self
    }

    /// Install the subscriber globally. The returned guard must stay alive
    /// for the lifetime of the program when file output is enabled.
    ///
    /// A second call warns and leaves the original subscriber in place, so
    /// test binaries can initialize freely.
    pub fn init(self) -> Option<WorkerGuard> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.default_level));

        let file_writer = self.config.file.as_ref().map(file_writer);
        let mut guard = None;

        let registry = Registry::default().with(env_filter);
        let jsonl = &self.config.jsonl;

        match (
            self.config.console.enabled,
            self.config.console.pretty,
            file_writer,
        ) {
            // Pretty console + file
            (true, true, Some((non_blocking, file_guard))) => {
                guard = Some(file_guard);
                let console_layer = tracing_subscriber::fmt::layer()
                    .with_ansi(self.config.console.ansi)
                    .with_target(true);
                let file_layer = jsonl_layer(jsonl).with_writer(non_blocking);
                install(registry.with(console_layer).with(file_layer).try_init());
            }

            // JSONL console + file
            (true, false, Some((non_blocking, file_guard))) => {
                guard = Some(file_guard);
                let console_layer = jsonl_layer(jsonl);
                let file_layer = jsonl_layer(jsonl).with_writer(non_blocking);
                install(registry.with(console_layer).with(file_layer).try_init());
            }

            // Pretty console only
            (true, true, None) => {
                let console_layer = tracing_subscriber::fmt::layer()
                    .with_ansi(self.config.console.ansi)
                    .with_target(true);
                install(registry.with(console_layer).try_init());
            }

            // JSONL console only (the default)
            (true, false, None) => {
                install(registry.with(jsonl_layer(jsonl)).try_init());
            }

            // File only
            (false, _, Some((non_blocking, file_guard))) => {
                guard = Some(file_guard);
                let file_layer = jsonl_layer(jsonl).with_writer(non_blocking);
                install(registry.with(file_layer).try_init());
            }

            // Nothing enabled, filter-only registry
            (false, _, None) => {
                install(registry.try_init());
            }
        }

        guard
    }
}

fn install(result: Result<(), tracing_subscriber::util::TryInitError>) {
    if let Err(error) = result {
        eprintln!("Warning: logging already initialized: {error}");
    }
}

impl Default for SubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn jsonl_layer<S>(
    config: &JsonlConfig,
) -> tracing_subscriber::fmt::Layer<
    S,
    tracing_subscriber::fmt::format::JsonFields,
    tracing_subscriber::fmt::format::Format<tracing_subscriber::fmt::format::Json>,
> {
    tracing_subscriber::fmt::layer::<S>()
        .json()
        .with_current_span(true)
        .with_span_list(config.include_spans)
        .flatten_event(config.flatten_events)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
}

fn file_writer(config: &FileConfig) -> (NonBlocking, WorkerGuard) {
    match config.rotation {
        RotationStrategy::Never => {
            // Single file, truncated on startup.
            fs::create_dir_all(&config.directory).ok();
            let path = config.directory.join(format!("{}.log", config.prefix));
            match File::create(&path) {
                Ok(file) => tracing_appender::non_blocking(file),
                Err(error) => {
                    eprintln!("Warning: cannot open log file {}: {error}", path.display());
                    tracing_appender::non_blocking(std::io::stdout())
                }
            }
        }
        RotationStrategy::Daily => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::DAILY,
            &config.directory,
            &config.prefix,
        )),
        RotationStrategy::Hourly => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::HOURLY,
            &config.directory,
            &config.prefix,
        )),
    }
}

/// Initialize with defaults (JSONL to console).
pub fn init_default() {
    SubscriberBuilder::new().init();
}

/// Initialize for development (pretty, verbose).
pub fn init_development() {
    SubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init();
}

/// Initialize for tests (quiet, tolerant of repeat calls).
pub fn init_testing() {
    SubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = SubscriberBuilder::new();
        assert_eq!(builder.config.default_level, "info");
        assert!(!builder.config.console.pretty);
    }

    #[test]
    fn test_builder_with_level() {
        let builder = SubscriberBuilder::new().with_level("trace");
        assert_eq!(builder.config.default_level, "trace");
    }

    #[test]
    fn test_builder_with_config() {
        let builder = SubscriberBuilder::new().with_config(LogConfig::development());
        assert_eq!(builder.config.default_level, "debug");
        assert!(builder.config.console.pretty);
    }

    #[test]
    fn test_builder_console_toggle() {
        let builder = SubscriberBuilder::new().with_console(false);
        assert!(!builder.config.console.enabled);
    }
}
