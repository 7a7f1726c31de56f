//! Tag metadata attached to field descriptors.

use std::collections::BTreeMap;

/// An ordered set of string tags on a field, mirroring struct-tag metadata:
/// `env`, `yaml`, `default`, `doc`, `hidden` and any source-specific keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    entries: BTreeMap<String, String>,
}

impl TagSet {
    /// An empty tag set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts or replaces a tag.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    /// The tag value for `key`, or `None` when the tag is absent.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The tag value for `key`, defaulting to the empty string.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.lookup(key).unwrap_or("")
    }

    /// Whether no tags are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates tags in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Builds a [`TagSet`] from `"key" => "value"` pairs.
///
/// ```
/// use tierconf::tags;
///
/// let set = tags! { "env" => "SERVICE_NAME", "doc" => "service name" };
/// assert_eq!(set.lookup("env"), Some("SERVICE_NAME"));
/// ```
#[macro_export]
macro_rules! tags {
    () => { $crate::TagSet::new() };
    ($($key:literal => $value:expr),+ $(,)?) => {{
        let mut set = $crate::TagSet::new();
        $(set.insert($key, $value);)+
        set
    }};
}
