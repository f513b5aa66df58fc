use alloc::boxed::Box;
use alloc::string::String;

use crate::{ClassId, ContainerKind};

/// Error type returned by fallible default producers.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Errors that can occur when declaring or accessing collective attributes.
#[derive(Debug)]
pub enum Error {
    /// The class handle does not belong to this hierarchy.
    UnknownClass {
        /// The offending handle.
        id: ClassId,
    },

    /// A class with this name was already defined.
    DuplicateClass {
        /// The name that was defined twice.
        name: String,
    },

    /// The attribute name is empty or not an identifier.
    InvalidAttributeName {
        /// The rejected name.
        name: String,
    },

    /// A container kind was requested by a name that is neither a sequence nor a mapping.
    UnsupportedContainerKind {
        /// The name as it was requested.
        requested: String,
    },

    /// The default value (or what a default producer returned) is not of the declared kind.
    DefaultKindMismatch {
        /// Singular name of the attribute.
        attribute: String,
        /// The declared kind.
        expected: ContainerKind,
        /// The kind the default actually had.
        actual: ContainerKind,
    },

    /// The default producer failed.
    DefaultFailed {
        /// Singular name of the attribute.
        attribute: String,
        /// What the producer returned.
        source: BoxError,
    },

    /// Neither the class nor any of its ancestors installed this operation.
    UnknownOperation {
        /// Name of the class the operation was requested on.
        class: String,
        /// The requested operation (or attribute) name.
        operation: String,
    },

    /// An element was merged into (or added to) a container of the other kind,
    /// e.g. a key/value entry into a sequence.
    ElementKindMismatch {
        /// Kind of the receiving container.
        expected: ContainerKind,
        /// Kind the element came from.
        actual: ContainerKind,
    },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::UnknownClass { id } => {
                write!(f, "class {id} is not registered in this hierarchy")
            }
            Error::DuplicateClass { name } => write!(f, "class `{name}` is already defined"),
            Error::InvalidAttributeName { name } => {
                write!(f, "`{name}` is not a valid attribute name")
            }
            Error::UnsupportedContainerKind { requested } => write!(
                f,
                "unsupported container kind `{requested}` (expected a sequence or a mapping)"
            ),
            Error::DefaultKindMismatch {
                attribute,
                expected,
                actual,
            } => write!(
                f,
                "default for `{attribute}` is a {actual}, but the attribute is declared as a {expected}"
            ),
            Error::DefaultFailed { attribute, source } => {
                write!(f, "default for `{attribute}` failed: {source}")
            }
            Error::UnknownOperation { class, operation } => {
                write!(f, "undefined operation `{operation}` for class `{class}`")
            }
            Error::ElementKindMismatch { expected, actual } => {
                write!(f, "cannot put a {actual} element into a {expected}")
            }
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::DefaultFailed { source, .. } => Some(&**source),
            _ => None,
        }
    }
}
