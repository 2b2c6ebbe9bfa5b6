// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured dumps.
//!
//! A dump logs a nested value one line per entry, each entry one level deeper
//! than its container.  Every line carries its own explicit `indent`, so the
//! output is laid out by the dumper alone, whatever the current call depth is.
//!
//! ```rust
//! use indentwise::{Dumper, Value};
//!
//! let config = Value::map([
//!     ("name", Value::from("db")),
//!     ("ports", Value::list([Value::from(5432), Value::from(5433)])),
//! ]);
//! let lines: Vec<_> = Dumper::new()
//!     .with_name("config")
//!     .lines(&config)
//!     .into_iter()
//!     .map(|line| (line.depth(), line.text().to_string()))
//!     .collect();
//! assert_eq!(lines, vec![
//!     (0, "config:".to_string()),
//!     (1, "name: db".to_string()),
//!     (1, "ports: List of length 2".to_string()),
//!     (2, "[0]: 5432".to_string()),
//!     (2, "[1]: 5433".to_string()),
//! ]);
//! ```
//!
//! Containers are shared ([`Rc`]), so a value can contain itself.  Such a
//! reference is rendered as `<Recursion detected>` instead of being followed.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

/// Printed in place of a container that is already being dumped.
pub const RECURSION_MARKER: &str = "<Recursion detected>";

const DUMP_TARGET: &str = "indentwise::dump";

/// A dumpable value.
///
/// `List` and `Map` are reference-counted, so cloning a `Value` shares its
/// containers, and a container may be pushed into itself.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    List(Rc<RefCell<Vec<Value>>>),
    /// Entries in insertion order.
    Map(Rc<RefCell<Vec<(String, Value)>>>),
    /// A best-effort rendering of something that has no structure to show.
    Opaque(String),
}

impl Value {
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// An opaque scalar showing `value`'s `Debug` output.
    pub fn opaque(value: &impl fmt::Debug) -> Self {
        Value::Opaque(format!("{value:?}"))
    }

    /// Converts anything serializable.  Structs become maps of their fields.
    ///
    /// Values serde cannot represent (for example maps with composite keys)
    /// become an opaque `<unrenderable TYPE>` scalar.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::serialize_or(value, |type_name| {
            Value::Opaque(format!("<unrenderable {type_name}>"))
        })
    }

    /// Like [`from_serialize`](Self::from_serialize), but falls back to the
    /// value's `Debug` output instead of its type name.
    ///
    /// ```rust
    /// use indentwise::Value;
    /// use std::collections::BTreeMap;
    ///
    /// let odd = BTreeMap::from([((1u8, 2u8), "pair key")]);
    /// let value = Value::from_serialize_or_debug(&odd);
    /// assert!(matches!(value, Value::Opaque(text) if text == r#"{(1, 2): "pair key"}"#));
    /// ```
    pub fn from_serialize_or_debug<T: Serialize + fmt::Debug + ?Sized>(value: &T) -> Self {
        Self::serialize_or(value, |_| Value::Opaque(format!("{value:?}")))
    }

    fn serialize_or<T: Serialize + ?Sized>(
        value: &T,
        fallback: impl FnOnce(&str) -> Value,
    ) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => Value::from(json),
            Err(err) => {
                let type_name = std::any::type_name::<T>();
                tracing::debug!(
                    target: DUMP_TARGET,
                    error = %err,
                    type_name,
                    "value could not be serialized, dumping it as opaque"
                );
                fallback(type_name)
            }
        }
    }

    /// Appends to a list.  Returns `false`, and does nothing, for other values.
    pub fn push(&self, item: Value) -> bool {
        match self {
            Value::List(items) => {
                items.borrow_mut().push(item);
                true
            }
            _ => false,
        }
    }

    /// Appends an entry to a map.  Returns `false`, and does nothing, for other
    /// values.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> bool {
        match self {
            Value::Map(entries) => {
                entries.borrow_mut().push((key.into(), value));
                true
            }
            _ => false,
        }
    }

    /// The identity of a container, shared by all its clones.  Scalars have none.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(Rc::as_ptr(items) as *const () as usize),
            Value::Map(entries) => Some(Rc::as_ptr(entries) as *const () as usize),
            _ => None,
        }
    }

    fn scalar_text(&self) -> Option<String> {
        Some(match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(x) => x.to_string(),
            Value::Str(s) | Value::Opaque(s) => s.clone(),
            Value::List(_) | Value::Map(_) => return None,
        })
    }
}

// Containers print their size only; following them could loop forever.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::UInt(u) => f.debug_tuple("UInt").field(u).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Opaque(s) => f.debug_tuple("Opaque").field(s).finish(),
            Value::List(items) => match items.try_borrow() {
                Ok(items) => write!(f, "List(<{} items>)", items.len()),
                Err(_) => f.write_str("List(<borrowed>)"),
            },
            Value::Map(entries) => match entries.try_borrow() {
                Ok(entries) => write!(f, "Map(<{} entries>)", entries.len()),
                Err(_) => f.write_str("Map(<borrowed>)"),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::UInt(u64::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::UInt(value as u64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    n.as_f64()
                        .map_or_else(|| Value::Opaque(n.to_string()), Value::Float)
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(entries) => {
                Value::map(entries.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

/// One line of a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLine {
    depth: usize,
    text: String,
}

impl DumpLine {
    /// The explicit depth this line is logged at.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for DumpLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Dump settings.
#[derive(Debug, Clone)]
pub struct Dumper {
    base_depth: usize,
    exclude: HashSet<String>,
    flatten_long_strings: bool,
    long_string_threshold: usize,
    name: Option<String>,
}

impl Default for Dumper {
    fn default() -> Self {
        Self {
            base_depth: 0,
            exclude: HashSet::new(),
            flatten_long_strings: false,
            long_string_threshold: 120,
            name: None,
        }
    }
}

impl Dumper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth of the outermost lines.
    pub fn with_base_depth(mut self, depth: usize) -> Self {
        self.base_depth = depth;
        self
    }

    /// Skips map entries named `key`, at every level.
    pub fn exclude(mut self, key: impl Into<String>) -> Self {
        self.exclude.insert(key.into());
        self
    }

    pub fn with_exclude<K: Into<String>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.exclude.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Collapses whitespace runs in strings longer than the threshold.
    pub fn with_flatten_long_strings(mut self, flatten: bool) -> Self {
        self.flatten_long_strings = flatten;
        self
    }

    /// Length, in characters, above which a string counts as long.  Defaults to 120.
    pub fn with_long_string_threshold(mut self, chars: usize) -> Self {
        self.long_string_threshold = chars;
        self
    }

    /// Labels the root value.  A named map gets a `name:` header and its
    /// entries move one level down.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Renders `value` without logging it.
    pub fn lines(&self, value: &Value) -> Vec<DumpLine> {
        let mut walk = Walk {
            dumper: self,
            visited: HashSet::new(),
            lines: Vec::new(),
        };
        match (value, &self.name) {
            // an unnamed root map has no header, its entries are the top level
            (Value::Map(_), None) => walk.container(None, value, self.base_depth, true),
            (_, name) => walk.value(name.as_deref(), value, self.base_depth),
        }
        walk.lines
    }

    /// Logs every line of `value` at DEBUG, each with its explicit depth.
    pub fn emit(&self, value: &Value) {
        for line in self.lines(value) {
            tracing::debug!(target: DUMP_TARGET, indent = line.depth, "{}", line.text);
        }
    }

    fn render_str(&self, s: &str) -> String {
        if self.flatten_long_strings && s.chars().count() > self.long_string_threshold {
            s.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            s.to_string()
        }
    }
}

/// State of one top-level dump.
struct Walk<'d> {
    dumper: &'d Dumper,
    /// Containers on the current path from the root.
    visited: HashSet<usize>,
    lines: Vec<DumpLine>,
}

impl Walk<'_> {
    fn push(&mut self, depth: usize, key: Option<&str>, text: &str) {
        let text = match key {
            Some(key) => format!("{key}: {text}"),
            None => text.to_string(),
        };
        self.lines.push(DumpLine { depth, text });
    }

    fn value(&mut self, key: Option<&str>, value: &Value, depth: usize) {
        match value {
            Value::Str(s) | Value::Opaque(s) => {
                let rendered = self.dumper.render_str(s);
                self.push(depth, key, &rendered);
            }
            Value::List(_) | Value::Map(_) => self.container(key, value, depth, false),
            scalar => {
                let text = scalar.scalar_text().unwrap_or_default();
                self.push(depth, key, &text);
            }
        }
    }

    fn container(&mut self, key: Option<&str>, value: &Value, depth: usize, headerless: bool) {
        let Some(identity) = value.identity() else {
            return;
        };
        if !self.visited.insert(identity) {
            self.push(depth, key, RECURSION_MARKER);
            return;
        }
        match value {
            Value::List(items) => {
                let items = items.borrow();
                self.push(depth, key, &format!("List of length {}", items.len()));
                for (index, item) in items.iter().enumerate() {
                    self.value(Some(&format!("[{index}]")), item, depth + 1);
                }
            }
            Value::Map(entries) => {
                let child_depth = if headerless {
                    depth
                } else {
                    match key {
                        Some(key) => self.lines.push(DumpLine {
                            depth,
                            text: format!("{key}:"),
                        }),
                        None => self.push(depth, None, "Map"),
                    }
                    depth + 1
                };
                let entries = entries.borrow();
                for (name, entry) in entries.iter() {
                    if self.dumper.exclude.contains(name) {
                        continue;
                    }
                    self.value(Some(name), entry, child_depth);
                }
            }
            _ => {}
        }
        // path-based: a container reached again through a sibling is not a cycle
        self.visited.remove(&identity);
    }
}

/// Logs `value` at DEBUG starting at `base_depth`, skipping the `exclude` keys
/// at every level.
///
/// This is the short form of building a [`Dumper`]; the [`dump!`](crate::dump!)
/// macro does the same with the caller's module as the log target.
pub fn dump(value: &Value, base_depth: usize, exclude: &[&str], flatten_long_strings: bool) {
    Dumper::new()
        .with_base_depth(base_depth)
        .with_exclude(exclude.iter().copied())
        .with_flatten_long_strings(flatten_long_strings)
        .emit(value);
}

/// Logs a [`Value`] at DEBUG, one line per entry, targeted at the calling module.
///
/// ```rust
/// use indentwise::{Dumper, Value};
///
/// let value = Value::map([("retries", Value::from(3))]);
/// indentwise::dump!(&value);
/// indentwise::dump!(&value, Dumper::new().with_base_depth(2).with_name("settings"));
/// ```
#[macro_export]
macro_rules! dump {
    ($value:expr) => {
        $crate::dump!($value, $crate::Dumper::new())
    };
    ($value:expr, $dumper:expr) => {{
        let value: &$crate::Value = $value;
        for line in $crate::Dumper::lines(&$dumper, value) {
            $crate::hidden::tracing::debug!(indent = line.depth(), "{}", line.text());
        }
    }};
}
