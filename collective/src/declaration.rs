use alloc::boxed::Box;
use alloc::string::String;

use crate::{AttributeNames, BoxError, Conjoin, Container, ContainerKind, Error, Merge};

type Producer<V> = Box<dyn Fn() -> Result<Container<V>, BoxError>>;

/// Configuration for [`Hierarchy::declare`](crate::Hierarchy::declare).
///
/// Everything is optional: the default declares an empty sequence merged by
/// [`Conjoin`].
///
/// ```
/// use collective::{Container, ContainerKind, Options};
///
/// let options: Options<i32> = Options::new()
///     .kind(ContainerKind::Mapping)
///     .default_value(Container::mapping([("scrap", 0)]));
/// ```
pub struct Options<V> {
    kind: Option<KindRequest>,
    default: Option<DefaultRequest<V>>,
    merge: Option<Box<dyn Merge<V>>>,
}

enum KindRequest {
    Known(ContainerKind),
    Named(String),
}

enum DefaultRequest<V> {
    Value(Container<V>),
    Producer(Producer<V>),
}

impl<V> Default for Options<V> {
    fn default() -> Self {
        Options {
            kind: None,
            default: None,
            merge: None,
        }
    }
}

impl<V> Options<V> {
    /// Sequence, empty default, [`Conjoin`] merge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Container kind of the attribute.
    pub fn kind(mut self, kind: ContainerKind) -> Self {
        self.kind = Some(KindRequest::Known(kind));
        self
    }

    /// Container kind by name (`"array"`, `"hash"`, ...). Unknown names are
    /// reported by `declare`, see [`ContainerKind`]'s `FromStr`.
    pub fn kind_named(mut self, name: impl Into<String>) -> Self {
        self.kind = Some(KindRequest::Named(name.into()));
        self
    }

    /// Start every class's storage as a clone of `value`.
    pub fn default_value(mut self, value: Container<V>) -> Self {
        self.default = Some(DefaultRequest::Value(value));
        self
    }

    /// Start every class's storage with whatever `producer` returns.
    pub fn default_with(mut self, producer: impl Fn() -> Container<V> + 'static) -> Self {
        self.default = Some(DefaultRequest::Producer(Box::new(move || Ok(producer()))));
        self
    }

    /// Like [`default_with`](Self::default_with), for producers that can fail.
    /// The failure surfaces on the first access of a class's storage.
    pub fn try_default_with(
        mut self,
        producer: impl Fn() -> Result<Container<V>, BoxError> + 'static,
    ) -> Self {
        self.default = Some(DefaultRequest::Producer(Box::new(producer)));
        self
    }

    /// Fold the ancestor chain with a custom strategy instead of [`Conjoin`].
    pub fn merge(mut self, strategy: impl Merge<V> + 'static) -> Self {
        self.merge = Some(Box::new(strategy));
        self
    }
}

impl<V: Clone + 'static> Options<V> {
    /// Resolve the options into a declaration. All configuration errors are
    /// reported here rather than on first use, except for what a producer
    /// returns.
    pub(crate) fn into_declaration(self, names: AttributeNames) -> Result<Declaration<V>, Error> {
        let kind = match self.kind {
            None => ContainerKind::default(),
            Some(KindRequest::Known(kind)) => kind,
            Some(KindRequest::Named(name)) => name.parse()?,
        };

        let default: Producer<V> = match self.default {
            None => Box::new(move || Ok(kind.empty())),
            Some(DefaultRequest::Value(value)) => {
                if value.kind() != kind {
                    return Err(Error::DefaultKindMismatch {
                        attribute: names.singular,
                        expected: kind,
                        actual: value.kind(),
                    });
                }
                Box::new(move || Ok(value.clone()))
            }
            Some(DefaultRequest::Producer(producer)) => producer,
        };

        let merge: Box<dyn Merge<V>> = match self.merge {
            Some(strategy) => strategy,
            None => Box::new(Conjoin),
        };

        Ok(Declaration {
            names,
            kind,
            default,
            merge,
        })
    }
}

/// A collective attribute as declared on one class.
pub struct Declaration<V> {
    names: AttributeNames,
    kind: ContainerKind,
    default: Producer<V>,
    merge: Box<dyn Merge<V>>,
}

impl<V> Declaration<V> {
    /// Names derived from the singular name.
    pub fn names(&self) -> &AttributeNames {
        &self.names
    }

    /// Declared container kind.
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// The strategy used to build merged views.
    pub fn merge_strategy(&self) -> &dyn Merge<V> {
        &*self.merge
    }

    /// Run the default producer and check what it returned.
    pub fn make_default(&self) -> Result<Container<V>, Error> {
        let value = (self.default)().map_err(|source| Error::DefaultFailed {
            attribute: self.names.singular.clone(),
            source,
        })?;
        if value.kind() != self.kind {
            return Err(Error::DefaultKindMismatch {
                attribute: self.names.singular.clone(),
                expected: self.kind,
                actual: value.kind(),
            });
        }
        Ok(value)
    }
}

impl<V> core::fmt::Debug for Declaration<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Declaration")
            .field("names", &self.names)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
