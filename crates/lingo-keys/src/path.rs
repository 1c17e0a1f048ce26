//! Translation key paths
//!
//! Provides [`KeyPath`], the validated, dot-delimited name of a translation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::KeyError;

/// Path of a translation key
///
/// A non-empty sequence of non-empty segments. The canonical form joins the
/// segments with `.`.
///
/// # Examples
/// - `["menu", "file", "open"]` → `menu.file.open`
/// - `["title"]` → `title`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Separator between segments in the canonical form
    pub const SEPARATOR: char = '.';

    /// Parse and validate a key
    ///
    /// Surrounding whitespace is trimmed first, the way keys typed by a user
    /// are normalized.
    ///
    /// # Errors
    /// Returns [`KeyError`] if the key is empty, has an empty segment or a
    /// segment containing whitespace.
    pub fn parse(key: &str) -> Result<Self, KeyError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(KeyError::EmptyKey);
        }
        Self::from_segments(key.split(Self::SEPARATOR))
    }

    /// Build a path from already split segments
    ///
    /// # Errors
    /// Same validation as [`KeyPath::parse`], applied per segment.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(KeyError::EmptyKey);
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self(segments))
    }

    /// Check a key string against the naming rule without keeping the result
    #[inline]
    #[must_use]
    pub fn is_valid(key: &str) -> bool {
        Self::parse(key).is_ok()
    }

    /// Path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Last segment
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        // never empty, checked on construction
        self.0.last().map_or("", String::as_str)
    }

    /// Parent path, `None` for a top-level key
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() <= 1 {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Append a segment
    ///
    /// # Errors
    /// Returns [`KeyError`] if the segment is not valid.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, KeyError> {
        let segment = segment.into();
        validate_segment(&segment)?;
        let mut segments = self.0.clone();
        segments.push(segment);
        Ok(Self(segments))
    }

    /// Append segments that were taken from another valid path
    #[must_use]
    pub fn join(&self, relative: &[String]) -> Self {
        let mut segments = self.0.clone();
        segments.extend(relative.iter().cloned());
        Self(segments)
    }

    /// Check if this path is a prefix of another (or equal to it)
    ///
    /// - `menu.file` is a prefix of `menu.file.open`
    /// - `menu.file` is NOT a prefix of `menu.files`
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Strict prefix
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// Check if paths overlap (one is prefix of other)
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }

    /// Segments of `self` below `ancestor`, empty when the paths are equal
    ///
    /// Returns `None` if `ancestor` is not a prefix of `self`.
    #[must_use]
    pub fn relative_to(&self, ancestor: &Self) -> Option<&[String]> {
        if ancestor.is_prefix_of(self) {
            Some(&self.0[ancestor.0.len()..])
        } else {
            None
        }
    }

    /// Move this path from under `from` to under `to`
    ///
    /// Returns `None` if `from` is not a prefix of `self`.
    #[must_use]
    pub fn rebase(&self, from: &Self, to: &Self) -> Option<Self> {
        self.relative_to(from).map(|rel| to.join(rel))
    }

    /// Iterator over segments from top level down
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn validate_segment(segment: &str) -> Result<(), KeyError> {
    if segment.is_empty() {
        Err(KeyError::EmptySegment)
    } else if segment.chars().any(char::is_whitespace) || segment.contains(KeyPath::SEPARATOR) {
        Err(KeyError::InvalidSegment(segment.to_string()))
    } else {
        Ok(())
    }
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl FromStr for KeyPath {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for KeyPath {
    type Error = KeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for KeyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_dots() {
        let path = KeyPath::parse("menu.file.open").unwrap();
        assert_eq!(path.segments(), &["menu", "file", "open"]);
        assert_eq!(path.depth(), 3);
        assert_eq!(path.name(), "open");
    }

    #[test]
    fn parse_trims_input() {
        let path = KeyPath::parse("  title \n").unwrap();
        assert_eq!(path.to_string(), "title");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(KeyPath::parse(""), Err(KeyError::EmptyKey)));
        assert!(matches!(KeyPath::parse("   "), Err(KeyError::EmptyKey)));
    }

    #[test]
    fn parse_rejects_empty_segments() {
        for key in ["a..b", ".a", "a."] {
            assert!(matches!(KeyPath::parse(key), Err(KeyError::EmptySegment)), "{key}");
        }
    }

    #[test]
    fn parse_rejects_inner_whitespace() {
        assert!(matches!(
            KeyPath::parse("a.b c"),
            Err(KeyError::InvalidSegment(s)) if s == "b c"
        ));
    }

    #[test]
    fn parse_accepts_non_ascii_and_punctuation() {
        assert!(KeyPath::is_valid("dialogs.übersicht.title-text"));
        assert!(KeyPath::is_valid("errors.404"));
    }

    #[test]
    fn display_then_parse_is_idempotent() {
        let path = KeyPath::parse("a.b.c").unwrap();
        let again = KeyPath::parse(&path.to_string()).unwrap();
        assert_eq!(path, again);
    }

    #[test]
    fn parent_of_top_level_is_none() {
        assert!(KeyPath::parse("a").unwrap().parent().is_none());
        assert_eq!(KeyPath::parse("a.b").unwrap().parent().unwrap().to_string(), "a");
    }

    #[test]
    fn child_validates_segment() {
        let base = KeyPath::parse("a").unwrap();
        assert_eq!(base.child("b").unwrap().to_string(), "a.b");
        assert!(base.child("").is_err());
        assert!(base.child("x.y").is_err());
    }

    #[test]
    fn prefix_relations() {
        let a = KeyPath::parse("a.b").unwrap();
        let b = KeyPath::parse("a.b.c").unwrap();
        let c = KeyPath::parse("a.bc").unwrap();

        assert!(a.is_prefix_of(&b));
        assert!(a.is_prefix_of(&a));
        assert!(a.is_ancestor_of(&b));
        assert!(!a.is_ancestor_of(&a));
        assert!(!a.overlaps(&c));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn relative_and_rebase() {
        let from = KeyPath::parse("a").unwrap();
        let to = KeyPath::parse("x.y").unwrap();
        let leaf = KeyPath::parse("a.b.c").unwrap();

        assert_eq!(leaf.relative_to(&from).unwrap(), &["b", "c"]);
        assert!(from.relative_to(&from).unwrap().is_empty());
        assert_eq!(leaf.rebase(&from, &to).unwrap().to_string(), "x.y.b.c");
        assert!(to.rebase(&from, &leaf).is_none());
    }
}
