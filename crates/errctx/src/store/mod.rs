//! Ordered key/value storage with copy-on-derive semantics.
//!
//! A [`KeyValues`] is frozen the moment it is built: its pairs live in an
//! exact-length `Arc<[KeyValue]>` with no spare capacity. Extending a store
//! therefore always allocates a fresh buffer, so two derivations from the same
//! base can never write into shared storage, no matter which threads run them.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::Value;

/// Attribute key. Static keys are stored without allocating.
pub type Key = Cow<'static, str>;

/// A single key/value pair.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    pub key: Key,
    pub value: Value,
}

impl KeyValue {
    pub fn new(key: impl Into<Key>, value: impl Into<Value>) -> Self {
        KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<Key>, V: Into<Value>> From<(K, V)> for KeyValue {
    fn from((key, value): (K, V)) -> Self {
        KeyValue::new(key, value)
    }
}

/// Immutable, ordered list of key/value pairs. Keys need not be unique.
#[derive(Clone, Default, PartialEq)]
pub struct KeyValues {
    pairs: Option<Arc<[KeyValue]>>,
}

impl KeyValues {
    /// Create an empty store.
    pub fn new() -> Self {
        KeyValues::default()
    }

    /// Return a new store holding this store's pairs followed by `pairs`.
    ///
    /// The receiver is untouched. The result never shares a buffer with the
    /// receiver or with any other store derived from it.
    #[must_use]
    pub fn derive<I>(&self, pairs: I) -> KeyValues
    where
        I: IntoIterator<Item = KeyValue>,
    {
        let pairs = pairs.into_iter();
        let mut buf = Vec::with_capacity(self.len() + pairs.size_hint().0);
        buf.extend(self.iter().cloned());
        buf.extend(pairs);
        KeyValues::freeze(buf)
    }

    /// Return a new store holding this store's pairs followed by `other`'s.
    #[must_use]
    pub fn concat(&self, other: &KeyValues) -> KeyValues {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        self.derive(other.iter().cloned())
    }

    /// Ordered traversal of the pairs. Call again to restart.
    pub fn iter(&self) -> std::slice::Iter<'_, KeyValue> {
        self.as_slice().iter()
    }

    pub fn as_slice(&self) -> &[KeyValue] {
        self.pairs.as_deref().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_none()
    }

    /// The most recently added value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.iter().rev().find(|kv| kv.key == key).map(|kv| &kv.value)
    }

    // `Arc::from(Vec)` copies into an allocation sized to the exact length.
    fn freeze(buf: Vec<KeyValue>) -> KeyValues {
        if buf.is_empty() {
            return KeyValues::default();
        }
        KeyValues {
            pairs: Some(Arc::from(buf)),
        }
    }
}

impl fmt::Debug for KeyValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|kv| (&kv.key, &kv.value)))
            .finish()
    }
}

impl<'a> IntoIterator for &'a KeyValues {
    type Item = &'a KeyValue;
    type IntoIter = std::slice::Iter<'a, KeyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<KeyValue> for KeyValues {
    fn from_iter<I: IntoIterator<Item = KeyValue>>(iter: I) -> Self {
        KeyValues::freeze(iter.into_iter().collect())
    }
}
