// SPDX-License-Identifier: MIT OR Apache-2.0

//! The name-block template.
//!
//! Templates contain literal text and two placeholders, `{operation}` and
//! `{component}`.  `{{` and `}}` stand for literal braces.  Templates are parsed
//! once, when the configuration is validated, so a typo is reported at setup
//! rather than on every record.

use std::fmt::{Display, Write};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Operation,
    Component,
}

/// A parsed name-block template.
///
/// ```rust
/// use indentwise::NameTemplate;
///
/// let template = NameTemplate::parse("{component}:{operation}").unwrap();
/// assert_eq!(template.expand("load", "app::store"), "app::store:load");
/// assert!(NameTemplate::parse("{function}").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTemplate {
    pieces: Vec<Piece>,
}

impl NameTemplate {
    pub fn parse(template: &str) -> Result<Self, ConfigError> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => name.push(c),
                            None => {
                                return Err(ConfigError::UnclosedPlaceholder {
                                    template: template.to_string(),
                                });
                            }
                        }
                    }
                    let piece = match name.trim() {
                        "operation" => Piece::Operation,
                        "component" => Piece::Component,
                        _ => {
                            return Err(ConfigError::UnknownPlaceholder {
                                placeholder: name,
                                template: template.to_string(),
                            });
                        }
                    };
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(piece);
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(ConfigError::UnmatchedBrace {
                        template: template.to_string(),
                    });
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Self { pieces })
    }

    /// The template implied by the include flags: the enabled placeholders,
    /// component first, joined by `:`.
    pub fn derived(include_component: bool, include_operation: bool) -> Self {
        let mut pieces = Vec::new();
        if include_component {
            pieces.push(Piece::Component);
        }
        if include_operation {
            if !pieces.is_empty() {
                pieces.push(Piece::Literal(":".to_string()));
            }
            pieces.push(Piece::Operation);
        }
        Self { pieces }
    }

    /// Whether expanding this template can only ever produce nothing.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Appends the expansion to `out`.
    pub fn expand_into(&self, operation: &str, component: &str, out: &mut String) {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Operation => out.push_str(operation),
                Piece::Component => out.push_str(component),
            }
        }
    }

    pub fn expand(&self, operation: &str, component: &str) -> String {
        let mut out = String::new();
        self.expand_into(operation, component, &mut out);
        out
    }
}

impl Display for NameTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => {
                    for c in text.chars() {
                        match c {
                            '{' => f.write_str("{{")?,
                            '}' => f.write_str("}}")?,
                            c => f.write_char(c)?,
                        }
                    }
                }
                Piece::Operation => f.write_str("{operation}")?,
                Piece::Component => f.write_str("{component}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_text_and_escapes() {
        let template = NameTemplate::parse("<{{{operation}}}>").unwrap();
        assert_eq!(template.expand("run", "app"), "<{run}>");
        assert_eq!(template.to_string(), "<{{{operation}}}>");
    }

    #[test]
    fn derived_templates() {
        assert!(NameTemplate::derived(false, false).is_empty());
        assert_eq!(NameTemplate::derived(true, false).expand("op", "comp"), "comp");
        assert_eq!(NameTemplate::derived(false, true).expand("op", "comp"), "op");
        assert_eq!(NameTemplate::derived(true, true).expand("op", "comp"), "comp:op");
    }

    #[test]
    fn placeholder_whitespace_is_tolerated() {
        let template = NameTemplate::parse("{ operation }").unwrap();
        assert_eq!(template.expand("x", "y"), "x");
    }

    #[test]
    fn malformed_templates_fail() {
        assert!(matches!(
            NameTemplate::parse("{funcName}"),
            Err(ConfigError::UnknownPlaceholder { placeholder, .. }) if placeholder == "funcName"
        ));
        assert!(matches!(
            NameTemplate::parse("{operation"),
            Err(ConfigError::UnclosedPlaceholder { .. })
        ));
        assert!(matches!(
            NameTemplate::parse("operation}"),
            Err(ConfigError::UnmatchedBrace { .. })
        ));
    }

    #[test]
    fn empty_template_is_empty() {
        assert!(NameTemplate::parse("").unwrap().is_empty());
    }
}
