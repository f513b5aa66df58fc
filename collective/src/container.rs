use alloc::string::String;
use alloc::vec::Vec;
use core::str::FromStr;

use indexmap::IndexMap;

use crate::Error;

/// The two shapes a collective attribute can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerKind {
    /// An ordered list; merging appends.
    #[default]
    Sequence,
    /// An insertion-ordered map with string keys; merging overwrites by key.
    Mapping,
}

impl ContainerKind {
    /// Lowercase name, as used in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            ContainerKind::Sequence => "sequence",
            ContainerKind::Mapping => "mapping",
        }
    }

    /// A fresh, empty container of this kind.
    pub fn empty<V>(self) -> Container<V> {
        match self {
            ContainerKind::Sequence => Container::Sequence(Vec::new()),
            ContainerKind::Mapping => Container::Mapping(IndexMap::new()),
        }
    }
}

impl core::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerKind {
    type Err = Error;

    /// Accepts the usual names for list-like and map-like containers,
    /// ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const SEQUENCE: &[&str] = &["sequence", "array", "list", "vec"];
        const MAPPING: &[&str] = &["mapping", "hash", "map", "dict"];

        if SEQUENCE.iter().any(|name| name.eq_ignore_ascii_case(s)) {
            Ok(ContainerKind::Sequence)
        } else if MAPPING.iter().any(|name| name.eq_ignore_ascii_case(s)) {
            Ok(ContainerKind::Mapping)
        } else {
            Err(Error::UnsupportedContainerKind {
                requested: String::from(s),
            })
        }
    }
}

/// The value of a collective attribute: either the storage owned by one
/// class, or a merged view over a whole ancestor chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container<V> {
    /// List-like container.
    Sequence(Vec<V>),
    /// Map-like container, keyed by string, in insertion order.
    Mapping(IndexMap<String, V>),
}

impl<V> Container<V> {
    /// Build a sequence container.
    pub fn sequence(items: impl IntoIterator<Item = V>) -> Self {
        Container::Sequence(items.into_iter().collect())
    }

    /// Build a mapping container. Later duplicates of a key win.
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Container::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Which kind of container this is.
    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::Sequence(_) => ContainerKind::Sequence,
            Container::Mapping(_) => ContainerKind::Mapping,
        }
    }

    /// Number of elements (items or entries).
    pub fn len(&self) -> usize {
        match self {
            Container::Sequence(items) => items.len(),
            Container::Mapping(entries) => entries.len(),
        }
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an item. Fails on a mapping.
    pub fn push(&mut self, value: V) -> Result<(), Error> {
        match self {
            Container::Sequence(items) => {
                items.push(value);
                Ok(())
            }
            Container::Mapping(_) => Err(Error::ElementKindMismatch {
                expected: ContainerKind::Mapping,
                actual: ContainerKind::Sequence,
            }),
        }
    }

    /// Insert an entry, returning the value it replaced. Fails on a sequence.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Result<Option<V>, Error> {
        match self {
            Container::Mapping(entries) => Ok(entries.insert(key.into(), value)),
            Container::Sequence(_) => Err(Error::ElementKindMismatch {
                expected: ContainerKind::Sequence,
                actual: ContainerKind::Mapping,
            }),
        }
    }

    /// Look up an entry by key. Always `None` for sequences.
    pub fn get(&self, key: &str) -> Option<&V> {
        match self {
            Container::Mapping(entries) => entries.get(key),
            Container::Sequence(_) => None,
        }
    }

    /// The items, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[V]> {
        match self {
            Container::Sequence(items) => Some(items),
            Container::Mapping(_) => None,
        }
    }

    /// The items, mutably, if this is a sequence.
    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<V>> {
        match self {
            Container::Sequence(items) => Some(items),
            Container::Mapping(_) => None,
        }
    }

    /// The entries, if this is a mapping.
    pub fn as_mapping(&self) -> Option<&IndexMap<String, V>> {
        match self {
            Container::Mapping(entries) => Some(entries),
            Container::Sequence(_) => None,
        }
    }

    /// The entries, mutably, if this is a mapping.
    pub fn as_mapping_mut(&mut self) -> Option<&mut IndexMap<String, V>> {
        match self {
            Container::Mapping(entries) => Some(entries),
            Container::Sequence(_) => None,
        }
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> Elements<'_, V> {
        let inner = match self {
            Container::Sequence(items) => ElementsInner::Sequence(items.iter()),
            Container::Mapping(entries) => ElementsInner::Mapping(entries.iter()),
        };
        Elements { inner }
    }
}

impl<V> From<Vec<V>> for Container<V> {
    fn from(items: Vec<V>) -> Self {
        Container::Sequence(items)
    }
}

impl<V> From<IndexMap<String, V>> for Container<V> {
    fn from(entries: IndexMap<String, V>) -> Self {
        Container::Mapping(entries)
    }
}

impl<'a, V> IntoIterator for &'a Container<V> {
    type Item = Element<'a, V>;
    type IntoIter = Elements<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: core::fmt::Display> core::fmt::Display for Container<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (open, close) = match self {
            Container::Sequence(_) => ('[', ']'),
            Container::Mapping(_) => ('{', '}'),
        };
        write!(f, "{open}")?;
        for (i, element) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{element}")?;
        }
        write!(f, "{close}")
    }
}

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for Container<V> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Container::Sequence(items) => serializer.collect_seq(items),
            Container::Mapping(entries) => serializer.collect_map(entries),
        }
    }
}

/// One element of a container, borrowed.
#[derive(Debug, PartialEq, Eq)]
pub enum Element<'a, V> {
    /// An item of a sequence.
    Item(&'a V),
    /// A key/value entry of a mapping.
    Entry(&'a str, &'a V),
}

impl<V> Clone for Element<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Element<'_, V> {}

impl<'a, V> Element<'a, V> {
    /// The kind of container this element belongs in.
    pub fn kind(&self) -> ContainerKind {
        match self {
            Element::Item(_) => ContainerKind::Sequence,
            Element::Entry(..) => ContainerKind::Mapping,
        }
    }

    /// The key, for mapping entries.
    pub fn key(&self) -> Option<&'a str> {
        match *self {
            Element::Item(_) => None,
            Element::Entry(key, _) => Some(key),
        }
    }

    /// The value (the item itself, or the entry's value).
    pub fn value(&self) -> &'a V {
        match *self {
            Element::Item(value) | Element::Entry(_, value) => value,
        }
    }
}

impl<V: core::fmt::Display> core::fmt::Display for Element<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Element::Item(value) => write!(f, "{value}"),
            Element::Entry(key, value) => write!(f, "{key}: {value}"),
        }
    }
}

/// Iterator over the [`Element`]s of a [`Container`].
pub struct Elements<'a, V> {
    inner: ElementsInner<'a, V>,
}

enum ElementsInner<'a, V> {
    Sequence(core::slice::Iter<'a, V>),
    Mapping(indexmap::map::Iter<'a, String, V>),
}

impl<V> Clone for Elements<'_, V> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            ElementsInner::Sequence(iter) => ElementsInner::Sequence(iter.clone()),
            ElementsInner::Mapping(iter) => ElementsInner::Mapping(iter.clone()),
        };
        Elements { inner }
    }
}

impl<'a, V> Iterator for Elements<'a, V> {
    type Item = Element<'a, V>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ElementsInner::Sequence(iter) => iter.next().map(Element::Item),
            ElementsInner::Mapping(iter) => iter.next().map(|(k, v)| Element::Entry(k.as_str(), v)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            ElementsInner::Sequence(iter) => iter.size_hint(),
            ElementsInner::Mapping(iter) => iter.size_hint(),
        }
    }
}

impl<V> ExactSizeIterator for Elements<'_, V> {}
