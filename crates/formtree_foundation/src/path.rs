//! Structured paths into a value tree.
//!
//! Paths are written as dot-separated object keys with bracketed array
//! indices: `users[0].name`. The empty string is the root. A path string is
//! parsed once into a list of [`Segment`]s and validated eagerly; everything
//! downstream works on the structured form.
//!
//! A dotted segment spelled as a canonical non-negative integer (`a.0`) is an
//! index, so `a.0` and `a[0]` are the same path. Index segments applied to an
//! object address the field of the same spelling.
//!
//! Keys that cannot be written bare (empty, containing `.`, `[` or `]`, or a
//! [`Segment::Key`] spelled as an integer) are written quoted inside brackets:
//! `a[""]`, `["x.y"]`. Inside the quotes `\` escapes the next character.
//! [`Path`]'s `Display` output always parses back to the same path.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

/// One step in a [`Path`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Object field name.
    Key(Arc<str>),
    /// Array position.
    Index(usize),
}

impl Segment {
    /// Builds a segment from a field name, normalizing integer spellings to
    /// [`Segment::Index`].
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match canonical_index(key) {
            Some(index) => Self::Index(index),
            None => Self::Key(key.into()),
        }
    }

    /// Returns the field name this segment addresses in an object.
    #[must_use]
    pub fn field_name(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Self::Key(k) => std::borrow::Cow::Borrowed(&**k),
            Self::Index(i) => std::borrow::Cow::Owned(i.to_string()),
        }
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{k:?}"),
            Self::Index(i) => write!(f, "[{i}]"),
        }
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '[', ']']) || canonical_index(key).is_some()
}

fn canonical_index(s: &str) -> Option<usize> {
    let canonical = s == "0"
        || (!s.is_empty() && !s.starts_with('0') && s.bytes().all(|b| b.is_ascii_digit()));
    if canonical { s.parse().ok() } else { None }
}

/// A parsed location in a value tree.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The root path (the whole tree).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a path string.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error for empty segments, unbalanced or
    /// non-numeric brackets, unterminated quoted keys, and stray characters
    /// after a bracket.
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input).parse()
    }

    /// Returns true if this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the segments of this path.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a child path addressing field `key`.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        self.child(Segment::from_key(key))
    }

    /// Returns a child path addressing array position `index`.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(Segment::Index(index))
    }

    /// Returns a child path with one more segment.
    #[must_use]
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// Returns `self` followed by every segment of `other`.
    #[must_use]
    pub fn join(&self, other: &Path) -> Self {
        let mut segments = self.segments.clone();
        segments.extend_from_slice(&other.segments);
        Self { segments }
    }

    /// Returns the parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Returns the last segment, or `None` for the root.
    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Returns true if `prefix` is this path or one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Returns the remainder of this path after `prefix`.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Path) -> Option<Self> {
        let rest = self.segments.strip_prefix(prefix.segments.as_slice())?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Returns true if one of the two paths is a prefix of the other.
    #[must_use]
    pub fn overlaps(&self, other: &Path) -> bool {
        self.starts_with(other) || other.starts_with(self)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(k) if needs_quoting(k) => {
                    f.write_str("[\"")?;
                    for c in k.chars() {
                        if matches!(c, '"' | '\\') {
                            f.write_str("\\")?;
                        }
                        write!(f, "{c}")?;
                    }
                    f.write_str("\"]")?;
                }
                Segment::Key(k) if i == 0 => write!(f, "{k}")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Conversion into a [`Path`] at the API boundary.
///
/// Strings are parsed (and may fail); structured paths pass through.
pub trait IntoPath {
    /// Converts `self` into a path.
    ///
    /// # Errors
    ///
    /// Returns a path syntax error if `self` is a malformed path string.
    fn into_path(self) -> Result<Path>;
}

impl IntoPath for Path {
    fn into_path(self) -> Result<Path> {
        Ok(self)
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> Result<Path> {
        Ok(self.clone())
    }
}

impl IntoPath for &str {
    fn into_path(self) -> Result<Path> {
        Path::parse(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> Result<Path> {
        Path::parse(&self)
    }
}

impl IntoPath for &String {
    fn into_path(self) -> Result<Path> {
        Path::parse(self)
    }
}

/// Hand-written scanner for path strings.
struct Parser<'src> {
    source: &'src str,
    position: usize,
    segments: Vec<Segment>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
            segments: Vec::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.position).copied()
    }

    fn error(&self, message: &str) -> Error {
        Error::path_syntax(self.source, self.position, message)
    }

    fn parse(mut self) -> Result<Path> {
        if self.source.is_empty() {
            return Ok(Path::root());
        }

        match self.peek() {
            Some(b'[') => self.scan_index()?,
            _ => self.scan_key()?,
        }

        while let Some(c) = self.peek() {
            match c {
                b'.' => {
                    self.position += 1;
                    self.scan_key()?;
                }
                b'[' => self.scan_index()?,
                _ => return Err(self.error("expected `.` or `[` after `]`")),
            }
        }

        Ok(Path {
            segments: self.segments,
        })
    }

    fn scan_key(&mut self) -> Result<()> {
        let start = self.position;
        while let Some(c) = self.peek() {
            match c {
                b'.' | b'[' => break,
                b']' => return Err(self.error("unexpected `]`")),
                _ => self.position += 1,
            }
        }
        if start == self.position {
            return Err(self.error("empty segment"));
        }
        self.segments
            .push(Segment::from_key(&self.source[start..self.position]));
        Ok(())
    }

    fn scan_index(&mut self) -> Result<()> {
        // Skip the opening bracket.
        self.position += 1;
        if self.peek() == Some(b'"') {
            return self.scan_quoted();
        }
        let start = self.position;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
        }
        if start == self.position {
            return Err(self.error("expected array index"));
        }
        let digits = &self.source[start..self.position];
        match self.peek() {
            Some(b']') => {}
            Some(_) => return Err(self.error("array index must be a non-negative integer")),
            None => return Err(self.error("unclosed `[`")),
        }
        let index = digits
            .parse()
            .map_err(|_| Error::path_syntax(self.source, start, "array index too large"))?;
        self.position += 1;
        self.segments.push(Segment::Index(index));
        Ok(())
    }

    /// Scans `"..."]` after an opening bracket. Quoted keys are never
    /// normalized to indices.
    fn scan_quoted(&mut self) -> Result<()> {
        let open = self.position;
        let mut key = String::new();
        let mut chars = self.source[open + 1..].char_indices();
        let close = loop {
            match chars.next() {
                Some((at, '"')) => break open + 1 + at,
                Some((_, '\\')) => match chars.next() {
                    Some((_, c)) => key.push(c),
                    None => break self.source.len(),
                },
                Some((_, c)) => key.push(c),
                None => break self.source.len(),
            }
        };
        if close == self.source.len() {
            return Err(Error::path_syntax(self.source, open, "unclosed string"));
        }
        self.position = close + 1;
        if self.peek() != Some(b']') {
            return Err(self.error("expected `]` after quoted key"));
        }
        self.position += 1;
        self.segments.push(Segment::Key(key.into()));
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::Path;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    impl Serialize for Path {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Path {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Path::parse(&s).map_err(de::Error::custom)
        }
    }
}
