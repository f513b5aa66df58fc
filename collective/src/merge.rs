use alloc::borrow::ToOwned;

use crate::{Container, ContainerKind, Element, Error};

/// Folds one element of an ancestor's storage into an accumulator.
///
/// Elements arrive root-most ancestor first, the class itself last, so a
/// strategy that overwrites lets descendants shadow their ancestors.
pub trait Merge<V> {
    /// Merge `element` into `acc`.
    fn merge(&self, acc: &mut Container<V>, element: Element<'_, V>) -> Result<(), Error>;
}

/// The default strategy: sequences append (duplicates kept), mappings
/// overwrite by key (last writer wins, first position kept).
#[derive(Debug, Clone, Copy, Default)]
pub struct Conjoin;

impl<V: Clone> Merge<V> for Conjoin {
    fn merge(&self, acc: &mut Container<V>, element: Element<'_, V>) -> Result<(), Error> {
        match (acc, element) {
            (Container::Sequence(items), Element::Item(value)) => {
                items.push(value.clone());
                Ok(())
            }
            (Container::Mapping(entries), Element::Entry(key, value)) => {
                entries.insert(key.to_owned(), value.clone());
                Ok(())
            }
            (acc, element) => Err(Error::ElementKindMismatch {
                expected: acc.kind(),
                actual: element.kind(),
            }),
        }
    }
}

/// Fold `elements` into a fresh container of `kind`.
pub fn fold<'a, V: 'a>(
    strategy: &dyn Merge<V>,
    kind: ContainerKind,
    elements: impl IntoIterator<Item = Element<'a, V>>,
) -> Result<Container<V>, Error> {
    let mut acc = kind.empty();
    for element in elements {
        strategy.merge(&mut acc, element)?;
    }
    Ok(acc)
}
