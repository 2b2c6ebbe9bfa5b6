// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types.
//!
//! Only setup can fail.  Everything that happens per record (rendering,
//! dumping, depth bookkeeping) degrades to a best-effort result instead of
//! returning an error, so these types describe static misconfiguration.

use std::path::PathBuf;

/// A problem with an [`IndentConfig`](crate::IndentConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The name template used a placeholder other than `{operation}` or `{component}`.
    #[error("unknown placeholder `{{{placeholder}}}` in name format `{template}`")]
    UnknownPlaceholder { placeholder: String, template: String },

    /// A `{` was opened but never closed.
    #[error("unclosed placeholder in name format `{template}`")]
    UnclosedPlaceholder { template: String },

    /// A lone `}` appeared outside a placeholder.
    #[error("unmatched `}}` in name format `{template}` (use `}}}}` for a literal brace)")]
    UnmatchedBrace { template: String },

    /// Truncation was requested with nothing left to keep.
    #[error("max_message_length must be at least 1 when truncate_messages is set")]
    ZeroMessageLength,

    /// The strftime pattern contains an item chrono cannot format.
    #[error("invalid date format `{0}`")]
    InvalidDateFormat(String),

    /// The hierarchy mode string was not recognized.
    #[error("unknown hierarchy mode `{0}` (expected disabled, flat or per_segment)")]
    UnknownHierarchyMode(String),

    /// The default level directive could not be parsed.
    #[error("invalid level directive `{directive}`")]
    InvalidLevel {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// The configuration file was not valid TOML for this schema.
    #[error("could not parse configuration")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("could not read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A failure while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not open log file {path}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber was already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_placeholder_message_shows_braces() {
        let err = ConfigError::UnknownPlaceholder {
            placeholder: "func".to_string(),
            template: "{func}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown placeholder `{func}` in name format `{func}`"
        );
    }

    #[test]
    fn setup_error_is_transparent_over_config() {
        let err: SetupError = ConfigError::ZeroMessageLength.into();
        assert_eq!(
            err.to_string(),
            "max_message_length must be at least 1 when truncate_messages is set"
        );
    }
}
