use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::SmolStr;
use std::fmt;
use std::ops::Deref;
use unicode_segmentation::UnicodeSegmentation;

/// Number of user-perceived characters (extended grapheme clusters) in `s`.
pub fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Longest prefix of `s` with at most `max` grapheme clusters.
pub fn truncate_graphemes(s: &str, max: usize) -> &str {
    match s.grapheme_indices(true).nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a
/// UTF-8 sequence.
pub fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// A string field with a documented maximum length in graphemes.
///
/// Values are accepted as received, whatever their length. When encoding,
/// anything past `MAX` graphemes is cut off rather than reported as an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct GraphemeLimited<const MAX: usize>(SmolStr);

impl<const MAX: usize> GraphemeLimited<MAX> {
    /// Maximum number of graphemes written on encode.
    pub const LIMIT: usize = MAX;

    /// Wrap a string. It is stored untouched and truncated on encode.
    pub fn new(s: impl Into<SmolStr>) -> Self {
        Self(s.into())
    }

    /// Wrap a string, truncating it right away.
    pub fn truncated(s: &str) -> Self {
        Self(SmolStr::new(truncate_graphemes(s, MAX)))
    }

    /// The full stored string, which may be over the limit.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The string as it will be encoded.
    pub fn as_encoded(&self) -> &str {
        truncate_graphemes(&self.0, MAX)
    }

    /// Length in graphemes of the stored string.
    pub fn grapheme_len(&self) -> usize {
        grapheme_len(&self.0)
    }

    /// Whether encoding will drop part of the stored string.
    pub fn is_over_limit(&self) -> bool {
        self.0.graphemes(true).nth(MAX).is_some()
    }

    /// Take the stored string.
    pub fn into_inner(self) -> SmolStr {
        self.0
    }
}

impl<const MAX: usize> Deref for GraphemeLimited<MAX> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> fmt::Display for GraphemeLimited<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const MAX: usize> From<&str> for GraphemeLimited<MAX> {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<const MAX: usize> From<String> for GraphemeLimited<MAX> {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl<const MAX: usize> From<SmolStr> for GraphemeLimited<MAX> {
    fn from(s: SmolStr) -> Self {
        Self(s)
    }
}

impl<const MAX: usize> Serialize for GraphemeLimited<MAX> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_encoded())
    }
}

impl<'de, const MAX: usize> Deserialize<'de> for GraphemeLimited<MAX> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        SmolStr::deserialize(deserializer).map(Self)
    }
}

/// A sequence field with a documented maximum element count.
///
/// Like [`GraphemeLimited`], decoding is permissive and encoding keeps only
/// the first `MAX` elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LengthLimited<T, const MAX: usize>(Vec<T>);

impl<T, const MAX: usize> LengthLimited<T, MAX> {
    /// Maximum number of elements written on encode.
    pub const LIMIT: usize = MAX;

    /// Wrap a vector. It is stored untouched and capped on encode.
    pub fn new(items: Vec<T>) -> Self {
        Self(items)
    }

    /// Whether encoding will drop elements.
    pub fn is_over_limit(&self) -> bool {
        self.0.len() > MAX
    }

    /// The elements as they will be encoded.
    pub fn as_encoded(&self) -> &[T] {
        &self.0[..self.0.len().min(MAX)]
    }

    /// Take the stored elements.
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T, const MAX: usize> Default for LengthLimited<T, MAX> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T, const MAX: usize> Deref for LengthLimited<T, MAX> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T, const MAX: usize> From<Vec<T>> for LengthLimited<T, MAX> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T, const MAX: usize> FromIterator<T> for LengthLimited<T, MAX> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Serialize, const MAX: usize> Serialize for LengthLimited<T, MAX> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.as_encoded())
    }
}

impl<'de, T: Deserialize<'de>, const MAX: usize> Deserialize<'de> for LengthLimited<T, MAX> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<T>::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grapheme_truncation_at_boundaries() {
        // One grapheme each, several code points apiece.
        let unit = "👍🏽";
        for (len, expect_over) in [(2, false), (3, false), (4, true)] {
            let s = unit.repeat(len);
            let field = GraphemeLimited::<3>::new(s.as_str());
            assert_eq!(field.is_over_limit(), expect_over, "len {len}");

            let encoded = serde_json::to_value(&field).unwrap();
            let encoded = encoded.as_str().unwrap();
            assert_eq!(grapheme_len(encoded), len.min(3));
            assert!(s.starts_with(encoded));
        }
    }

    #[test]
    fn combining_marks_count_once() {
        let s = "e\u{301}e\u{301}e\u{301}";
        assert_eq!(s.chars().count(), 6);
        assert_eq!(grapheme_len(s), 3);
        assert_eq!(truncate_graphemes(s, 2), "e\u{301}e\u{301}");
    }

    #[test]
    fn decode_is_permissive() {
        let long = "x".repeat(400);
        let field: GraphemeLimited<300> = serde_json::from_value(serde_json::json!(long.clone())).unwrap();
        assert_eq!(field.grapheme_len(), 400);
        assert_eq!(field.as_str(), long);
        assert_eq!(field.as_encoded().len(), 300);
    }

    #[test]
    fn truncated_constructor() {
        let field = GraphemeLimited::<5>::truncated("hello world");
        assert_eq!(field.as_str(), "hello");
        assert!(!field.is_over_limit());
    }

    #[test]
    fn byte_truncation_respects_char_boundaries() {
        assert_eq!(truncate_bytes("héllo", 2), "h");
        assert_eq!(truncate_bytes("héllo", 3), "hé");
        assert_eq!(truncate_bytes("abc", 10), "abc");
        assert_eq!(truncate_bytes("abc", 0), "");
    }

    #[test]
    fn length_limited_caps_elements() {
        for (len, expect) in [(2usize, 2usize), (3, 3), (4, 3)] {
            let items: LengthLimited<u8, 3> = (0..len as u8).collect();
            let encoded = serde_json::to_value(&items).unwrap();
            assert_eq!(encoded.as_array().unwrap().len(), expect);
            assert_eq!(items.is_over_limit(), len > 3);
        }

        let items: LengthLimited<&str, 2> = vec!["a", "b", "c"].into();
        assert_eq!(serde_json::to_string(&items).unwrap(), r#"["a","b"]"#);
    }
}
