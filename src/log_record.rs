// SPDX-License-Identifier: MIT OR Apache-2.0

//! The record a line is rendered from.
//!
//! An [`IndentRecord`] is the part of a `tracing` event the renderer cares
//! about: level, component, message, the remaining fields, and the explicit
//! depth override carried in the `indent` field.
//!
//! ```rust
//! use indentwise::IndentRecord;
//! use tracing::Level;
//!
//! let record = IndentRecord::new(Level::INFO, "app::db", "connected")
//!     .with_depth(2)
//!     .with_field("pool", "main");
//! assert_eq!(record.explicit_depth(), Some(2));
//! assert_eq!(record.content(), "connected pool=main");
//! ```

use std::fmt::{Debug, Write};

use tracing::Level;
use tracing::field::{Field, Visit};

/// Name of the event field that overrides the computed depth.
pub const INDENT_FIELD: &str = "indent";

/// A log record as seen by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentRecord {
    level: Level,
    component: String,
    message: String,
    fields: Vec<(String, String)>,
    explicit_depth: Option<usize>,
    operation: Option<String>,
}

impl IndentRecord {
    pub fn new(level: Level, component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            component: component.into(),
            message: message.into(),
            fields: Vec::new(),
            explicit_depth: None,
            operation: None,
        }
    }

    /// Builds a record from a `tracing` event.
    ///
    /// The operation is left unset; the formatter fills it in from the context.
    pub fn from_event(event: &tracing::Event<'_>) -> Self {
        let metadata = event.metadata();
        let mut record = Self::new(*metadata.level(), metadata.target(), String::new());
        event.record(&mut RecordVisitor {
            record: &mut record,
        });
        record
    }

    /// Sets the explicit depth override.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.explicit_depth = Some(depth);
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// The emitting component's hierarchical name.
    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn explicit_depth(&self) -> Option<usize> {
        self.explicit_depth
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    pub(crate) fn set_operation(&mut self, operation: Option<String>) {
        self.operation = operation;
    }

    /// The message followed by ` name=value` for every other field.
    pub fn content(&self) -> String {
        let mut content = self.message.clone();
        for (name, value) in &self.fields {
            if !content.is_empty() {
                content.push(' ');
            }
            let _ = write!(content, "{name}={value}");
        }
        content
    }
}

/// Copies event fields into an [`IndentRecord`].
struct RecordVisitor<'a> {
    record: &'a mut IndentRecord,
}

impl RecordVisitor<'_> {
    fn set_depth(&mut self, depth: i128) {
        // negative overrides clamp to 0
        self.record.explicit_depth = Some(usize::try_from(depth.max(0)).unwrap_or(usize::MAX));
    }
}

impl Visit for RecordVisitor<'_> {
    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == INDENT_FIELD {
            self.set_depth(i128::from(value));
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == INDENT_FIELD {
            self.set_depth(i128::from(value));
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.record.message = value.to_string();
        } else {
            self.record.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        let rendered = format!("{value:?}");
        match field.name() {
            "message" => self.record.message = rendered,
            INDENT_FIELD => match rendered.trim().parse::<i128>() {
                Ok(depth) => self.set_depth(depth),
                Err(_) => self.record.fields.push((INDENT_FIELD.to_string(), rendered)),
            },
            // fields bridged from the `log` crate
            name if name.starts_with("log.") => {}
            name => self.record.fields.push((name.to_string(), rendered)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_joins_fields() {
        let record = IndentRecord::new(Level::WARN, "app", "retrying")
            .with_field("attempt", "3")
            .with_field("backoff", "2s");
        assert_eq!(record.content(), "retrying attempt=3 backoff=2s");
    }

    #[test]
    fn content_without_message() {
        let record = IndentRecord::new(Level::WARN, "app", "").with_field("k", "v");
        assert_eq!(record.content(), "k=v");
    }

    #[test]
    fn builder_sets_everything() {
        let record = IndentRecord::new(Level::DEBUG, "app::x", "m")
            .with_depth(3)
            .with_operation("run");
        assert_eq!(record.level(), Level::DEBUG);
        assert_eq!(record.component(), "app::x");
        assert_eq!(record.explicit_depth(), Some(3));
        assert_eq!(record.operation(), Some("run"));
    }
}
