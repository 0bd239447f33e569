use std::borrow::Borrow;
use std::fmt::{Display, Formatter};

use log::trace;

/// An entry on a [`MappedStack`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackEntry<K, V> {
    pub key: K,
    pub value: Option<V>,
}

impl<K, V> StackEntry<K, V> {
    pub fn new(key: K, value: impl Into<Option<V>>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// LIFO stack of keyed entries.
///
/// Keys need not be unique; the same key may sit at several depths. Only the
/// top entry is ever inspected or removed, which makes the stack suitable for
/// tracking nested contexts: push a marker when a block opens and
/// [`pop_matching`](Self::pop_matching) it when the block closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedStack<K, V> {
    entries: Vec<StackEntry<K, V>>,
}

impl<K, V> MappedStack<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries on the stack.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The top entry, without removing it.
    pub fn peek(&self) -> Option<&StackEntry<K, V>> {
        self.entries.last()
    }

    /// Whether the top entry has the key `key`. `false` on an empty stack.
    pub fn is_last<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.peek()
            .is_some_and(|entry| <K as Borrow<Q>>::borrow(&entry.key) == key)
    }

    /// Push `key` with an optional associated value and return the new depth.
    pub fn push(&mut self, key: K, value: impl Into<Option<V>>) -> usize {
        self.entries.push(StackEntry::new(key, value));
        self.count()
    }

    /// Remove and return the top entry.
    pub fn pop(&mut self) -> Option<StackEntry<K, V>> {
        self.entries.pop()
    }

    /// Remove and return the top entry only if its key is `key`.
    ///
    /// On a mismatch nothing is removed and `None` is returned, the same as
    /// for an empty stack.
    pub fn pop_matching<Q>(&mut self, key: &Q) -> Option<StackEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        if !self.is_last(key) {
            if !self.is_empty() {
                trace!(
                    "pop refused at depth {}, top key differs",
                    self.count()
                );
            }
            return None;
        }
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries from bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, StackEntry<K, V>> {
        self.entries.iter()
    }
}

impl<K, V> Default for MappedStack<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for MappedStack<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut stack = Self::new();
        stack.extend(iter);
        stack
    }
}

impl<K, V> Extend<(K, Option<V>)> for MappedStack<K, V> {
    fn extend<I: IntoIterator<Item = (K, Option<V>)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(key, value)| StackEntry { key, value }));
    }
}

impl<'a, K, V> IntoIterator for &'a MappedStack<K, V> {
    type Item = &'a StackEntry<K, V>;
    type IntoIter = std::slice::Iter<'a, StackEntry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders `([key] => value)` per entry, bottom to top. Diagnostic only.
impl<K: Display, V: Display> Display for MappedStack<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            write!(f, "([{}] => ", entry.key)?;
            if let Some(value) = &entry.value {
                write!(f, "{value}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}
