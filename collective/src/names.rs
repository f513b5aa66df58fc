use alloc::format;
use alloc::string::String;

use crate::Error;

/// Turns a singular attribute name into its plural form.
///
/// The hierarchy only uses this to derive operation names, so any pure,
/// deterministic transform will do. Closures work too:
///
/// ```
/// use collective::{Hierarchy, Inflector};
///
/// let shout = |singular: &str| format!("{}S", singular.to_uppercase());
/// assert_eq!(shout.pluralize("thing"), "THINGS");
///
/// let hierarchy: Hierarchy<u32> = Hierarchy::with_inflector(shout);
/// ```
pub trait Inflector {
    /// Plural form of `singular`.
    fn pluralize(&self, singular: &str) -> String;
}

/// English rules from `collective-inflect`, applied to the last segment of a
/// snake_case name (`map_of_thing` → `map_of_things`).
#[derive(Debug, Clone, Copy, Default)]
pub struct English;

impl Inflector for English {
    fn pluralize(&self, singular: &str) -> String {
        collective_inflect::pluralize_identifier(singular)
    }
}

impl<F> Inflector for F
where
    F: Fn(&str) -> String,
{
    fn pluralize(&self, singular: &str) -> String {
        self(singular)
    }
}

/// Every name derived from one attribute declaration.
///
/// For `thing` with English rules:
///
/// | field          | value                      |
/// |----------------|----------------------------|
/// | `singular`     | `thing`                    |
/// | `collective`   | `things`                   |
/// | `each`         | `each_thing`               |
/// | `all`          | `all_things`               |
/// | `storage_slot` | `__collective_things__`    |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeNames {
    /// The name the attribute was declared with.
    pub singular: String,
    /// Accessor for the storage a class owns.
    pub collective: String,
    /// Per-element enumerator over the whole ancestor chain.
    pub each: String,
    /// Merged view over the whole ancestor chain.
    pub all: String,
    /// Key of the per-class storage.
    pub storage_slot: String,
}

impl AttributeNames {
    /// Derive all names for `singular`, validating it first.
    pub fn derive(singular: &str, inflector: &dyn Inflector) -> Result<Self, Error> {
        if !is_identifier(singular) {
            return Err(Error::InvalidAttributeName {
                name: String::from(singular),
            });
        }

        let plural = inflector.pluralize(singular);
        Ok(AttributeNames {
            singular: String::from(singular),
            each: format!("each_{singular}"),
            all: format!("all_{plural}"),
            storage_slot: format!("__collective_{plural}__"),
            collective: plural,
        })
    }

    /// The three operation names installed for this attribute, with their kinds.
    pub fn operations(&self) -> [(&str, OperationKind); 3] {
        [
            (self.collective.as_str(), OperationKind::Collective),
            (self.each.as_str(), OperationKind::Each),
            (self.all.as_str(), OperationKind::All),
        ]
    }
}

/// What an installed operation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Returns the storage the class owns (`things`).
    Collective,
    /// Enumerates the elements of the whole ancestor chain (`each_thing`).
    Each,
    /// Returns the merged view of the whole ancestor chain (`all_things`).
    All,
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
