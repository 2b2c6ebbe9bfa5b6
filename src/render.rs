// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line composition.
//!
//! The [`Renderer`] turns an [`IndentRecord`] into one line of text.  It is pure:
//! the tracked depth and the timestamp are passed in, so everything here can be
//! exercised without a subscriber.
//!
//! # Depth resolution
//!
//! 1. An explicit `indent` on the record is used as is.
//! 2. Otherwise the depth is the hierarchy contribution of the record's
//!    component plus the tracked call depth of the current thread.  With
//!    `combine_call_depth` off and a hierarchy mode enabled, only the hierarchy
//!    counts.
//!
//! # Layout
//!
//! ```text
//! 2024-01-01 12:00:00 - INFO     -         message key=value            {component:operation}
//! ^timestamp            ^level     ^indent                              ^min_name_column
//! ```

use std::borrow::Cow;

use crate::config::IndentConfig;
use crate::error::ConfigError;
use crate::hierarchy::{HierarchyMode, HierarchyPath};
use crate::log_record::IndentRecord;
use crate::template::NameTemplate;

/// The widest indentation a line gets, in spaces.  Deeper lines are clamped to it.
pub const MAX_INDENT_WIDTH: usize = 4096;

/// Shown in the name block when no operation is known.
pub const NO_OPERATION: &str = "-";

const SEPARATOR: &str = " - ";

/// Renders records according to a validated [`IndentConfig`].
#[derive(Debug, Clone)]
pub struct Renderer {
    config: IndentConfig,
    template: NameTemplate,
}

impl Renderer {
    /// Validates `config` and prepares it for rendering.
    pub fn new(config: IndentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let template = config.name_template()?;
        Ok(Self { config, template })
    }

    pub fn config(&self) -> &IndentConfig {
        &self.config
    }

    /// The depth `record` is rendered at, given the thread's tracked depth.
    ///
    /// ```rust
    /// use indentwise::{HierarchyMode, IndentConfig, IndentRecord, Renderer};
    /// use tracing::Level;
    ///
    /// let renderer = Renderer::new(
    ///     IndentConfig::new().with_hierarchy_mode(HierarchyMode::PerSegment),
    /// ).unwrap();
    /// let record = IndentRecord::new(Level::INFO, "app::db::pool", "hi");
    /// assert_eq!(renderer.effective_depth(&record, 1), 3);
    /// assert_eq!(renderer.effective_depth(&record.with_depth(0), 1), 0);
    /// ```
    pub fn effective_depth(&self, record: &IndentRecord, tracked_depth: usize) -> usize {
        if let Some(depth) = record.explicit_depth() {
            return depth;
        }
        let mode = self.config.hierarchy_mode;
        let hierarchy = mode.contribution(HierarchyPath::new(record.component()));
        let tracked = if self.config.combine_call_depth || mode == HierarchyMode::Disabled {
            tracked_depth
        } else {
            0
        };
        hierarchy.saturating_add(tracked)
    }

    /// The indentation string for `depth`, at most [`MAX_INDENT_WIDTH`] spaces.
    pub fn indentation(&self, depth: usize) -> String {
        let width = depth.saturating_mul(self.config.spaces_per_level);
        " ".repeat(width.min(MAX_INDENT_WIDTH))
    }

    /// Renders one line, without a trailing newline.
    ///
    /// An empty `timestamp` is treated like none.
    pub fn render(
        &self,
        record: &IndentRecord,
        tracked_depth: usize,
        timestamp: Option<&str>,
    ) -> String {
        let depth = self.effective_depth(record, tracked_depth);
        let content = record.content();
        let content = if self.config.truncate_messages {
            truncate(
                &content,
                self.config.max_message_length,
                &self.config.truncation_marker,
            )
        } else {
            Cow::Borrowed(content.as_str())
        };

        let mut line = String::new();
        if let Some(timestamp) = timestamp.filter(|t| !t.is_empty()) {
            line.push_str(timestamp);
            line.push_str(SEPARATOR);
        }
        line.push_str(&format!("{:<8}", record.level().as_str()));
        line.push_str(SEPARATOR);
        line.push_str(&self.indentation(depth));
        line.push_str(&content);

        if !self.template.is_empty() {
            pad_to_column(&mut line, self.config.min_name_column);
            line.push('{');
            self.template.expand_into(
                record.operation().unwrap_or(NO_OPERATION),
                record.component(),
                &mut line,
            );
            line.push('}');
        }
        line
    }
}

/// Keeps the first `max_chars` characters of `text` and appends `marker`.
///
/// Text that already fits is returned unchanged.  Counting is by `char`, so
/// multi-byte text is never split inside a character.
///
/// ```rust
/// assert_eq!(indentwise::render::truncate("abcdef", 3, "..."), "abc...");
/// assert_eq!(indentwise::render::truncate("abc", 3, "..."), "abc");
/// ```
pub fn truncate<'a>(text: &'a str, max_chars: usize, marker: &str) -> Cow<'a, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => {
            let mut truncated = String::with_capacity(cut + marker.len());
            truncated.push_str(&text[..cut]);
            truncated.push_str(marker);
            Cow::Owned(truncated)
        }
    }
}

/// Pads `line` so that the next character lands at `column`, or adds a single
/// space when the line already reaches it.  Only the last line of a
/// multi-line message counts.
fn pad_to_column(line: &mut String, column: usize) {
    let width = line.rsplit('\n').next().unwrap_or("").chars().count();
    if width < column {
        line.extend(std::iter::repeat_n(' ', column - width));
    } else {
        line.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    fn renderer(config: IndentConfig) -> Renderer {
        Renderer::new(config.with_date_format("")).unwrap()
    }

    #[test]
    fn explicit_depths_render_multiples_of_spaces() {
        let r = renderer(IndentConfig::new());
        for (depth, expected) in [(0, 0), (1, 4), (2, 8), (1, 4), (0, 0)] {
            let record = IndentRecord::new(Level::INFO, "app", "x").with_depth(depth);
            // the tracked depth is ignored when an override is present
            let line = r.render(&record, 7, None);
            let indent = line.strip_prefix("INFO     - ").unwrap();
            assert_eq!(indent.len() - indent.trim_start().len(), expected);
        }
    }

    #[test]
    fn tracked_depth_is_used_without_override() {
        let r = renderer(IndentConfig::new().with_spaces_per_level(2));
        let record = IndentRecord::new(Level::DEBUG, "app::deep::module", "body");
        assert_eq!(r.render(&record, 3, None), "DEBUG    -       body");
    }

    #[test]
    fn hierarchy_is_added_to_tracked_depth() {
        let r = renderer(IndentConfig::new().with_hierarchy_mode(HierarchyMode::PerSegment));
        let record = IndentRecord::new(Level::INFO, "app.module.submodule", "m");
        assert_eq!(r.effective_depth(&record, 0), 2);
        assert_eq!(r.effective_depth(&record, 2), 4);
    }

    #[test]
    fn hierarchy_only_when_not_combined() {
        let r = renderer(
            IndentConfig::new()
                .with_hierarchy_mode(HierarchyMode::Flat)
                .with_combine_call_depth(false),
        );
        let nested = IndentRecord::new(Level::INFO, "app::db", "m");
        let root = IndentRecord::new(Level::INFO, "app", "m");
        assert_eq!(r.effective_depth(&nested, 5), 1);
        assert_eq!(r.effective_depth(&root, 5), 0);

        // without a hierarchy mode the flag has nothing to replace
        let plain = renderer(IndentConfig::new().with_combine_call_depth(false));
        assert_eq!(plain.effective_depth(&nested, 5), 5);
    }

    #[test]
    fn timestamp_prefix() {
        let r = renderer(IndentConfig::new());
        let record = IndentRecord::new(Level::ERROR, "app", "failed");
        assert_eq!(
            r.render(&record, 0, Some("12:00:00")),
            "12:00:00 - ERROR    - failed"
        );
        assert_eq!(r.render(&record, 0, Some("")), "ERROR    - failed");
    }

    #[test]
    fn truncation_keeps_exact_length_plus_marker() {
        let r = renderer(IndentConfig::new().with_truncation(10));
        let record = IndentRecord::new(Level::INFO, "app", "abcdefghijklmnop");
        assert_eq!(r.render(&record, 0, None), "INFO     - abcdefghij...");

        let short = IndentRecord::new(Level::INFO, "app", "abcdefghij");
        assert_eq!(r.render(&short, 0, None), "INFO     - abcdefghij");
    }

    #[test]
    fn truncation_disabled_leaves_message_alone() {
        let r = renderer(IndentConfig::new());
        let long = "x".repeat(500);
        let record = IndentRecord::new(Level::INFO, "app", long.clone());
        assert_eq!(r.render(&record, 0, None), format!("INFO     - {long}"));
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate("héllo wörld", 7, "…"), "héllo w…");
        assert_eq!(truncate("", 3, "..."), "");
    }

    #[test]
    fn name_block_aligns_to_column() {
        let r = renderer(
            IndentConfig::new()
                .with_operation_name(true)
                .with_min_name_column(30),
        );
        let record = IndentRecord::new(Level::INFO, "app", "short").with_operation("run");
        let line = r.render(&record, 0, None);
        assert_eq!(line.find('{'), Some(30));
        assert!(line.ends_with("{run}"));
    }

    #[test]
    fn name_block_follows_long_line_with_one_space() {
        let r = renderer(
            IndentConfig::new()
                .with_component_name(true)
                .with_operation_name(true)
                .with_min_name_column(10),
        );
        let record = IndentRecord::new(Level::INFO, "app::db", "a message longer than ten");
        assert_eq!(
            r.render(&record, 0, None),
            "INFO     - a message longer than ten {app::db:-}"
        );
    }

    #[test]
    fn name_block_exactly_at_column() {
        let r = renderer(IndentConfig::new().with_operation_name(true).with_min_name_column(15));
        // "INFO     - " is 11 characters, the message brings it to 15
        let record = IndentRecord::new(Level::INFO, "app", "abcd").with_operation("op");
        assert_eq!(r.render(&record, 0, None), "INFO     - abcd {op}");
    }

    #[test]
    fn name_block_uses_template() {
        let r = renderer(
            IndentConfig::new()
                .with_name_format("{operation} @ {component}")
                .with_min_name_column(0),
        );
        let record = IndentRecord::new(Level::WARN, "app::net", "slow").with_operation("fetch");
        assert_eq!(
            r.render(&record, 0, None),
            "WARN     - slow {fetch @ app::net}"
        );
    }

    #[test]
    fn indentation_is_depth_times_spaces() {
        let r = renderer(IndentConfig::new().with_spaces_per_level(3));
        assert_eq!(r.indentation(0), "");
        assert_eq!(r.indentation(4).len(), 12);
    }

    #[test]
    fn indentation_is_capped() {
        let r = renderer(IndentConfig::new());
        assert_eq!(r.indentation(usize::MAX).len(), MAX_INDENT_WIDTH);
        assert_eq!(r.indentation(MAX_INDENT_WIDTH / 4 + 1).len(), MAX_INDENT_WIDTH);

        let record = IndentRecord::new(Level::INFO, "app", "deep").with_depth(usize::MAX);
        let line = r.render(&record, 0, None);
        assert_eq!(line, format!("INFO     - {}deep", " ".repeat(MAX_INDENT_WIDTH)));
    }

    #[test]
    fn renderer_rejects_invalid_config() {
        assert!(Renderer::new(IndentConfig::new().with_name_format("{x}")).is_err());
    }
}
