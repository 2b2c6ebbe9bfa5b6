// SPDX-License-Identifier: MIT OR Apache-2.0

//! Depth derived from where a record comes from.
//!
//! A component is named by its hierarchy path, normally the event target,
//! which defaults to the module path (`app::store::cache`).  Dotted names
//! (`app.store.cache`) are accepted as well.  The crate root (`app`) is the root
//! component and never contributes depth.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the hierarchy path of a record contributes to its depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyMode {
    /// The hierarchy contributes nothing.
    #[default]
    Disabled,
    /// Every non-root component is indented by one level.
    Flat,
    /// One level per path segment below the root: `a::b::c` contributes 2.
    PerSegment,
}

impl HierarchyMode {
    /// The depth this mode assigns to `path`.
    ///
    /// ```rust
    /// use indentwise::{HierarchyMode, HierarchyPath};
    ///
    /// let path = HierarchyPath::new("app::store::cache");
    /// assert_eq!(HierarchyMode::Disabled.contribution(path), 0);
    /// assert_eq!(HierarchyMode::Flat.contribution(path), 1);
    /// assert_eq!(HierarchyMode::PerSegment.contribution(path), 2);
    /// ```
    pub fn contribution(self, path: HierarchyPath<'_>) -> usize {
        match self {
            HierarchyMode::Disabled => 0,
            HierarchyMode::Flat => usize::from(!path.is_root()),
            HierarchyMode::PerSegment => path.segment_count().saturating_sub(1),
        }
    }
}

impl Display for HierarchyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HierarchyMode::Disabled => "disabled",
            HierarchyMode::Flat => "flat",
            HierarchyMode::PerSegment => "per_segment",
        })
    }
}

impl FromStr for HierarchyMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" | "off" | "none" => Ok(HierarchyMode::Disabled),
            "flat" => Ok(HierarchyMode::Flat),
            "per_segment" | "per-segment" => Ok(HierarchyMode::PerSegment),
            _ => Err(ConfigError::UnknownHierarchyMode(s.to_string())),
        }
    }
}

/// A borrowed hierarchical component name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HierarchyPath<'a> {
    name: &'a str,
}

impl<'a> HierarchyPath<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }

    /// The name exactly as given.
    pub fn as_str(&self) -> &'a str {
        self.name
    }

    /// The non-empty segments, splitting on both `::` and `.`.
    pub fn segments(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.name
            .split("::")
            .flat_map(|part| part.split('.'))
            .filter(|segment| !segment.is_empty())
    }

    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }

    /// Whether this names the root component (a single segment, or nothing).
    pub fn is_root(&self) -> bool {
        self.segment_count() <= 1
    }
}

impl Display for HierarchyPath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_segment_counts_levels_below_root() {
        assert_eq!(HierarchyMode::PerSegment.contribution(HierarchyPath::new("a.b.c")), 2);
        assert_eq!(HierarchyMode::PerSegment.contribution(HierarchyPath::new("a::b::c")), 2);
        assert_eq!(HierarchyMode::PerSegment.contribution(HierarchyPath::new("a")), 0);
    }

    #[test]
    fn flat_indents_every_non_root_once() {
        assert_eq!(HierarchyMode::Flat.contribution(HierarchyPath::new("app")), 0);
        assert_eq!(HierarchyMode::Flat.contribution(HierarchyPath::new("app::db")), 1);
        assert_eq!(
            HierarchyMode::Flat.contribution(HierarchyPath::new("app::db::pool::conn")),
            1
        );
    }

    #[test]
    fn disabled_contributes_nothing() {
        assert_eq!(
            HierarchyMode::Disabled.contribution(HierarchyPath::new("x::y::z")),
            0
        );
    }

    #[test]
    fn empty_segments_are_ignored() {
        let path = HierarchyPath::new("app..store::::cache.");
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["app", "store", "cache"]);
        assert!(HierarchyPath::new("").is_root());
    }

    #[test]
    fn mixed_separators() {
        let path = HierarchyPath::new("app::plugins.audio");
        assert_eq!(path.segment_count(), 3);
    }

    #[test]
    fn parse_modes() {
        assert_eq!("flat".parse::<HierarchyMode>().unwrap(), HierarchyMode::Flat);
        assert_eq!(
            "per-segment".parse::<HierarchyMode>().unwrap(),
            HierarchyMode::PerSegment
        );
        assert_eq!(
            " Disabled ".parse::<HierarchyMode>().unwrap(),
            HierarchyMode::Disabled
        );
        assert!(matches!(
            "tree".parse::<HierarchyMode>(),
            Err(ConfigError::UnknownHierarchyMode(_))
        ));
        for mode in [HierarchyMode::Disabled, HierarchyMode::Flat, HierarchyMode::PerSegment] {
            assert_eq!(mode.to_string().parse::<HierarchyMode>().unwrap(), mode);
        }
    }
}
