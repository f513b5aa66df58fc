#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
/// Forwards to tracing::trace when the tracing feature is enabled
macro_rules! trace {
    ($($tt:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
/// Forwards to tracing::debug when the tracing feature is enabled
macro_rules! debug {
    ($($tt:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use {debug, trace};

mod error;
pub use error::*;

mod container;
pub use container::*;

mod names;
pub use names::*;

mod declaration;
pub use declaration::*;

mod merge;
pub use merge::{Conjoin, Merge, fold};

mod hierarchy;
pub use hierarchy::*;

mod walk;
pub use walk::*;
