//! Decode failures and the paths that locate them.
//!
//! Shape mismatch is the only failure kind: wrong JSON kind, a missing
//! required key, a literal that does not match, or a failed `ensure`
//! constraint. Every one of them is reported as a [`DecodeError`] carrying
//! where it happened, what the decoder expected, and what it found.

use std::fmt;

/// Kind reported as `found` when an object key is absent.
pub const MISSING: &str = "missing";

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a JSON document, from the root.
///
/// Displays as `person.name` or `items[2].id`. The root path is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns this path extended by an object key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(PathSegment::Key(key.into()));
        self
    }

    /// Returns this path extended by an array index.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// A value did not match the shape declared for its position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}expected {expected}, found {found}", location(.path))]
pub struct DecodeError {
    /// Where the mismatch is; empty for the document root.
    pub path: Path,
    /// Name of the declared shape, e.g. `string` or `object`.
    pub expected: String,
    /// JSON kind of the offending value, or [`MISSING`].
    pub found: String,
}

impl DecodeError {
    pub fn new(path: Path, expected: impl Into<String>, found: impl Into<String>) -> Self {
        DecodeError {
            path,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// True when the failure is an absent object key.
    pub fn is_missing(&self) -> bool {
        self.found == MISSING
    }
}

fn location(path: &Path) -> String {
    if path.is_root() {
        String::new()
    } else {
        format!("at {}: ", path)
    }
}

/// Every mismatch found in one decode call, in document order.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_errors(.0))]
pub struct DecodeErrors(Vec<DecodeError>);

impl DecodeErrors {
    pub(crate) fn new(errors: Vec<DecodeError>) -> Self {
        debug_assert!(!errors.is_empty());
        DecodeErrors(errors)
    }

    /// The first mismatch in document order.
    pub fn first(&self) -> &DecodeError {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns false: a failed decode holds at least one error.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecodeError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<DecodeError> {
        self.0
    }

    /// Drops everything but the first mismatch.
    pub fn into_first(mut self) -> DecodeError {
        self.0.swap_remove(0)
    }
}

impl From<DecodeError> for DecodeErrors {
    fn from(error: DecodeError) -> Self {
        DecodeErrors(vec![error])
    }
}

impl IntoIterator for DecodeErrors {
    type Item = DecodeError;
    type IntoIter = std::vec::IntoIter<DecodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DecodeErrors {
    type Item = &'a DecodeError;
    type IntoIter = std::slice::Iter<'a, DecodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn join_errors(errors: &[DecodeError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Descriptive kind name of a JSON value, used as `found` in errors.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
