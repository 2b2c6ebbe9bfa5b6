// SPDX-License-Identifier: MIT OR Apache-2.0

//! Render configuration.
//!
//! An [`IndentConfig`] is built once, validated, and then shared read-only by
//! every formatter.  It can be written in code with the `with_*` builder methods
//! or read from TOML, where every field is optional:
//!
//! ```rust
//! use indentwise::{HierarchyMode, IndentConfig};
//!
//! let config = IndentConfig::from_toml_str(r#"
//!     spaces_per_level = 2
//!     include_operation_name = true
//!     hierarchy_mode = "per_segment"
//! "#).unwrap();
//! assert_eq!(config.spaces_per_level, 2);
//! assert_eq!(config.hierarchy_mode, HierarchyMode::PerSegment);
//! assert_eq!(config.min_name_column, 120);
//! ```

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;
use crate::hierarchy::HierarchyMode;
use crate::template::NameTemplate;

/// Settings for indentation and line layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndentConfig {
    /// Spaces per indentation level.
    pub spaces_per_level: usize,
    /// Show the current operation in the name block.
    pub include_operation_name: bool,
    /// Show the component (event target) in the name block.
    pub include_component_name: bool,
    /// Explicit name-block template.  When unset, one is derived from the two
    /// include flags.
    pub name_format: Option<String>,
    pub truncate_messages: bool,
    /// Characters of message kept when truncating.
    pub max_message_length: usize,
    pub truncation_marker: String,
    /// Column at which the name block starts, when the line is short enough.
    pub min_name_column: usize,
    pub hierarchy_mode: HierarchyMode,
    /// With a hierarchy mode enabled, whether tracked call depth is added on top
    /// of the hierarchy depth.  Without a hierarchy mode, call depth is always used.
    pub combine_call_depth: bool,
    /// chrono strftime pattern.  Empty disables the timestamp.
    pub date_format: String,
    /// Default filter directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// Also append lines to this file.
    pub log_file: Option<PathBuf>,
    /// Render the log file without any indentation.
    pub log_file_no_indent: bool,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            spaces_per_level: 4,
            include_operation_name: false,
            include_component_name: false,
            name_format: None,
            truncate_messages: false,
            max_message_length: 50,
            truncation_marker: "...".to_string(),
            min_name_column: 120,
            hierarchy_mode: HierarchyMode::Disabled,
            combine_call_depth: true,
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
            level: "debug".to_string(),
            log_file: None,
            log_file_no_indent: false,
        }
    }
}

impl IndentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document.  The result is not yet validated.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_spaces_per_level(mut self, spaces: usize) -> Self {
        self.spaces_per_level = spaces;
        self
    }

    pub fn with_operation_name(mut self, include: bool) -> Self {
        self.include_operation_name = include;
        self
    }

    pub fn with_component_name(mut self, include: bool) -> Self {
        self.include_component_name = include;
        self
    }

    pub fn with_name_format(mut self, template: impl Into<String>) -> Self {
        self.name_format = Some(template.into());
        self
    }

    /// Enables truncation at `max_length` characters.
    pub fn with_truncation(mut self, max_length: usize) -> Self {
        self.truncate_messages = true;
        self.max_message_length = max_length;
        self
    }

    pub fn with_truncation_marker(mut self, marker: impl Into<String>) -> Self {
        self.truncation_marker = marker.into();
        self
    }

    pub fn with_min_name_column(mut self, column: usize) -> Self {
        self.min_name_column = column;
        self
    }

    pub fn with_hierarchy_mode(mut self, mode: HierarchyMode) -> Self {
        self.hierarchy_mode = mode;
        self
    }

    pub fn with_combine_call_depth(mut self, combine: bool) -> Self {
        self.combine_call_depth = combine;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_level(mut self, directive: impl Into<String>) -> Self {
        self.level = directive.into();
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>, no_indent: bool) -> Self {
        self.log_file = Some(path.into());
        self.log_file_no_indent = no_indent;
        self
    }

    /// The same layout with all automatic and explicit indentation removed.
    pub fn without_indentation(&self) -> Self {
        Self {
            spaces_per_level: 0,
            hierarchy_mode: HierarchyMode::Disabled,
            ..self.clone()
        }
    }

    /// The name-block template in effect: the explicit one, or the derived one.
    pub fn name_template(&self) -> Result<NameTemplate, ConfigError> {
        match &self.name_format {
            Some(template) => NameTemplate::parse(template),
            None => Ok(NameTemplate::derived(
                self.include_component_name,
                self.include_operation_name,
            )),
        }
    }

    /// Checks everything that can be checked before the first record.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.name_template()?;
        if self.truncate_messages && self.max_message_length == 0 {
            return Err(ConfigError::ZeroMessageLength);
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }
        self.env_filter()?;
        Ok(())
    }

    /// The filter for `level`.
    pub(crate) fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_new(&self.level).map_err(|source| ConfigError::InvalidLevel {
            directive: self.level.clone(),
            source,
        })
    }
}
