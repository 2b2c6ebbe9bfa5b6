//! Shared helpers for the integration tests.

#![allow(dead_code)]

use indentwise::{IndentConfig, InMemoryWriter};
use tracing_subscriber::layer::SubscriberExt;

/// Width of `"LEVEL    - "`, the prefix of every line rendered without a timestamp.
pub const PREFIX: usize = 11;

/// Runs `f` under a subscriber rendering with `config` (timestamp removed) and
/// returns the lines it produced.
pub fn capture(config: IndentConfig, f: impl FnOnce()) -> Vec<String> {
    let writer = InMemoryWriter::new();
    let layer = indentwise::layer(&config.with_date_format(""), writer.clone())
        .expect("test configuration is valid");
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    writer.drain_lines()
}

/// Number of spaces between the level prefix and the message.
pub fn indent_of(line: &str) -> usize {
    let rest = &line[PREFIX..];
    rest.len() - rest.trim_start_matches(' ').len()
}

/// The line text after the prefix and indentation.
pub fn message_of(line: &str) -> &str {
    line[PREFIX..].trim_start_matches(' ')
}
