// SPDX-License-Identifier: MIT OR Apache-2.0

//! Installing the formatter.
//!
//! [`setup`] is the one-call entry point for applications: it validates the
//! configuration and installs a global subscriber that writes indented lines to
//! stderr, and optionally to a file.  Code that composes its own subscriber uses
//! [`layer`] instead.

use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::DefaultFields;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::IndentConfig;
use crate::error::{ConfigError, SetupError};
use crate::formatter::IndentFormatter;

/// The `fmt` layer produced by [`layer`].
pub type IndentLayer<S, W> = tracing_subscriber::fmt::Layer<S, DefaultFields, IndentFormatter, W>;

/// A `fmt` layer that renders with `config` into `writer`.
///
/// ```rust
/// use indentwise::{IndentConfig, InMemoryWriter};
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let writer = InMemoryWriter::new();
/// let config = IndentConfig::new().with_date_format("");
/// let subscriber = tracing_subscriber::registry()
///     .with(indentwise::layer(&config, writer.clone()).unwrap());
/// tracing::subscriber::with_default(subscriber, || tracing::warn!("careful"));
/// assert_eq!(writer.drain_logs(), "WARN     - careful\n");
/// ```
pub fn layer<S, W>(config: &IndentConfig, writer: W) -> Result<IndentLayer<S, W>, ConfigError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    let formatter = IndentFormatter::new(config.clone())?;
    Ok(tracing_subscriber::fmt::layer()
        .event_format(formatter)
        .with_writer(writer))
}

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG` when it is set and parses, and from
/// `config.level` otherwise.  Lines go to stderr, and are also appended to
/// `config.log_file` when one is set.  That file is rendered without
/// indentation if `config.log_file_no_indent` is set.
///
/// Fails if the configuration is invalid, the log file cannot be opened, or a
/// global subscriber is already installed.
pub fn setup(config: &IndentConfig) -> Result<(), SetupError> {
    config.validate()?;
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => config.env_filter()?,
    };

    let console = layer(config, std::io::stderr)?;
    let file = match &config.log_file {
        Some(path) => {
            let file_config = if config.log_file_no_indent {
                config.without_indentation()
            } else {
                config.clone()
            };
            let file = open_log_file(path)?;
            Some(layer(&file_config, Mutex::new(file))?)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;
    tracing::debug!(
        target: "indentwise::setup",
        spaces_per_level = config.spaces_per_level,
        hierarchy_mode = %config.hierarchy_mode,
        "indentation formatter installed"
    );
    Ok(())
}

fn open_log_file(path: &std::path::Path) -> Result<File, SetupError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| SetupError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}
