//! Path resolution over decoded JSON documents.
//!
//! A [`Path`] is an ordered list of [`Key`]s. [`resolve`] walks a document one
//! key at a time and yields [`Resolved::Missing`] as soon as a step cannot be
//! taken, so absent keys, null intermediates and type mismatches never fail.
//!
//! ```
//! use orcid_client::path::{resolve, Resolved};
//! use orcid_client::path;
//! use serde_json::json;
//!
//! let doc = json!({"a": {"b": 3}});
//! assert_eq!(resolve(&doc, &path!["a", "b"]), Resolved::Found(&json!(3)));
//! assert!(resolve(&doc, &path!["a", "c"]).is_missing());
//! ```

use serde_json::Value;
use std::fmt;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Member name of a JSON object.
    Field(String),
    /// Position in a JSON array.
    Index(usize),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Field(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Field(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Field(name) => f.write_str(&name.replace('~', "~0").replace('/', "~1")),
            Key::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Ordered sequence of keys locating a value inside a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Key>);

impl Path {
    /// The empty path, which resolves to the document itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path such as `orcid-profile.orcid-identifier.path`.
    ///
    /// Segments made only of ASCII digits become [`Key::Index`]. An empty
    /// string is the root path.
    pub fn dotted(spec: &str) -> Self {
        if spec.is_empty() {
            return Self::root();
        }
        spec.split('.')
            .map(|segment| match segment.parse::<usize>() {
                Ok(index) if segment.bytes().all(|b| b.is_ascii_digit()) => Key::Index(index),
                _ => Key::Field(segment.to_string()),
            })
            .collect()
    }

    /// Return a new path with `suffix` appended.
    pub fn join(&self, suffix: impl Into<Path>) -> Path {
        let mut keys = self.0.clone();
        keys.extend(suffix.into().0);
        Path(keys)
    }

    pub fn push(&mut self, key: impl Into<Key>) {
        self.0.push(key.into());
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Deref for Path {
    type Target = [Key];

    fn deref(&self) -> &[Key] {
        &self.0
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl From<Vec<Key>> for Path {
    fn from(keys: Vec<Key>) -> Self {
        Path(keys)
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(names: [&str; N]) -> Self {
        names.into_iter().map(Key::from).collect()
    }
}

impl From<&[&str]> for Path {
    fn from(names: &[&str]) -> Self {
        names.iter().copied().map(Key::from).collect()
    }
}

/// Formats as an RFC 6901 JSON pointer.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.0 {
            write!(f, "/{}", key)?;
        }
        Ok(())
    }
}

/// Build a [`Path`] from string and integer keys.
///
/// ```
/// use orcid_client::path;
/// use orcid_client::path::Key;
///
/// let p = path!["orcid-work", 0, "url"];
/// assert_eq!(p.keys()[1], Key::Index(0));
/// ```
#[macro_export]
macro_rules! path {
    () => { $crate::path::Path::root() };
    ($($key:expr),+ $(,)?) => {
        $crate::path::Path::from(vec![$($crate::path::Key::from($key)),+])
    };
}

/// Outcome of resolving a path: a borrowed value or the Missing sentinel.
///
/// `Found(&Value::Null)` is a present null and is distinct from `Missing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Found(&'a Value),
    Missing,
}

impl<'a> Resolved<'a> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Resolved::Missing)
    }

    /// The resolved value, including a present null.
    pub fn value(&self) -> Option<&'a Value> {
        match *self {
            Resolved::Found(value) => Some(value),
            Resolved::Missing => None,
        }
    }

    /// The resolved value, treating both Missing and null as absent.
    pub fn present(&self) -> Option<&'a Value> {
        self.value().filter(|value| !value.is_null())
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.value().and_then(Value::as_str)
    }

    pub fn as_array(&self) -> Option<&'a Vec<Value>> {
        self.value().and_then(Value::as_array)
    }

    /// Continue resolution by one key.
    pub fn get(self, key: impl Into<Key>) -> Resolved<'a> {
        match self {
            Resolved::Found(value) => {
                step(value, &key.into()).map_or(Resolved::Missing, Resolved::Found)
            }
            Resolved::Missing => Resolved::Missing,
        }
    }

    /// Continue resolution along a whole path.
    pub fn at(self, path: &[Key]) -> Resolved<'a> {
        match self {
            Resolved::Found(value) => resolve(value, path),
            Resolved::Missing => Resolved::Missing,
        }
    }
}

/// Renders the raw value as compact JSON, or `<missing>`.
impl fmt::Display for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Found(value) => write!(f, "{}", value),
            Resolved::Missing => f.write_str("<missing>"),
        }
    }
}

fn step<'a>(current: &'a Value, key: &Key) -> Option<&'a Value> {
    match (current, key) {
        (Value::Object(members), Key::Field(name)) => members.get(name),
        (Value::Array(items), Key::Index(index)) => items.get(*index),
        _ => None,
    }
}

/// Walk `document` along `path`.
///
/// Returns the value at that location or [`Resolved::Missing`]. The empty path
/// returns the document itself.
pub fn resolve<'a>(document: &'a Value, path: &[Key]) -> Resolved<'a> {
    let mut current = document;
    for (depth, key) in path.iter().enumerate() {
        match step(current, key) {
            Some(next) => current = next,
            None => {
                log::trace!("path miss at step {} ({}) of {} keys", depth, key, path.len());
                return Resolved::Missing;
            }
        }
    }
    Resolved::Found(current)
}
