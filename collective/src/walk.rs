//! Root-first traversal of a class's ancestor chain.
//!
//! Every walk visits the root-most ancestor first and the class itself last.
//! Ancestors that do not respond to the requested accessor (because nothing at
//! or above them declared the attribute) are skipped silently. The order is
//! what makes descendants win when mappings are merged, and what fixes the
//! element order of merged sequences.

use alloc::vec::Vec;

use crate::{ClassId, Container, Element, Elements, Error, Hierarchy, trace};

/// Decision returned by [`AncestorVisitor::visit`] to control the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitDecision {
    /// Go on with the next ancestor.
    Continue,
    /// Stop the walk immediately.
    Stop,
}

/// Outcome of [`Hierarchy::walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    /// Every responding ancestor was visited.
    Completed,
    /// The visitor returned [`VisitDecision::Stop`].
    Stopped,
}

/// Receives the storage of each responding ancestor, root first.
pub trait AncestorVisitor<V> {
    /// Called once per responding ancestor with the storage it owns.
    fn visit(&mut self, ancestor: ClassId, contribution: &Container<V>) -> VisitDecision;
}

struct FnVisitor<F>(F);

impl<V, F> AncestorVisitor<V> for FnVisitor<F>
where
    F: FnMut(ClassId, &Container<V>) -> VisitDecision,
{
    fn visit(&mut self, ancestor: ClassId, contribution: &Container<V>) -> VisitDecision {
        (self.0)(ancestor, contribution)
    }
}

impl<V> Hierarchy<V> {
    /// Call the accessor `name` on every ancestor of `class` that responds to
    /// it, root first, handing each result to `visitor`.
    ///
    /// Storage that has not been accessed yet is initialised on the way, as if
    /// the accessor had been called directly.
    pub fn walk(
        &self,
        class: ClassId,
        name: &str,
        visitor: &mut impl AncestorVisitor<V>,
    ) -> Result<WalkStatus, Error> {
        let lineage = self.lineage(class)?;
        let Some((_, declaration)) = self.declaration(class, name) else {
            return Ok(WalkStatus::Completed);
        };
        let singular = declaration.names().singular.as_str();

        for ancestor in lineage {
            let Some(contribution) = self.own_storage(ancestor, singular) else {
                continue;
            };
            let contribution = contribution?;
            trace!(%ancestor, len = contribution.len(), "visiting contribution");
            if visitor.visit(ancestor, contribution) == VisitDecision::Stop {
                return Ok(WalkStatus::Stopped);
            }
        }
        Ok(WalkStatus::Completed)
    }

    /// [`walk`](Self::walk) with a closure.
    pub fn walk_with(
        &self,
        class: ClassId,
        name: &str,
        visitor: impl FnMut(ClassId, &Container<V>) -> VisitDecision,
    ) -> Result<WalkStatus, Error> {
        self.walk(class, name, &mut FnVisitor(visitor))
    }

    /// The storage of every responding ancestor, root first, paired with the
    /// ancestor that owns it.
    pub fn contributions(
        &self,
        class: ClassId,
        name: &str,
    ) -> Result<Vec<(ClassId, &Container<V>)>, Error> {
        let lineage = self.lineage(class)?;
        let mut contributions = Vec::new();
        let Some((_, declaration)) = self.declaration(class, name) else {
            return Ok(contributions);
        };

        for ancestor in lineage {
            if let Some(contribution) = self.own_storage(ancestor, &declaration.names().singular) {
                contributions.push((ancestor, contribution?));
            }
        }
        Ok(contributions)
    }
}

/// A restartable enumeration of an attribute's elements over an ancestor
/// chain, returned by [`Hierarchy::each`].
///
/// Every call to [`iter`](Self::iter) walks the chain again. The hierarchy
/// stays borrowed for as long as this value lives, so no storage can change
/// between two iterations.
pub struct Each<'h, V> {
    hierarchy: &'h Hierarchy<V>,
    class: ClassId,
    attribute: &'h str,
}

impl<V> Clone for Each<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Each<'_, V> {}

impl<V> core::fmt::Debug for Each<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Each")
            .field("class", &self.class)
            .field("attribute", &self.attribute)
            .finish()
    }
}

impl<'h, V> Each<'h, V> {
    pub(crate) fn new(hierarchy: &'h Hierarchy<V>, class: ClassId, attribute: &'h str) -> Self {
        Each {
            hierarchy,
            class,
            attribute,
        }
    }

    /// The class whose chain is enumerated.
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Singular name of the attribute being enumerated.
    pub fn attribute(&self) -> &'h str {
        self.attribute
    }

    /// Start a fresh walk over the chain.
    pub fn iter(&self) -> EachIter<'h, V> {
        EachIter {
            hierarchy: self.hierarchy,
            lineage: self.hierarchy.lineage_unchecked(self.class).into_iter(),
            attribute: self.attribute,
            current: None,
        }
    }
}

impl<'h, V> IntoIterator for Each<'h, V> {
    type Item = Element<'h, V>;
    type IntoIter = EachIter<'h, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'h, V> IntoIterator for &Each<'h, V> {
    type Item = Element<'h, V>;
    type IntoIter = EachIter<'h, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator produced by [`Each::iter`].
pub struct EachIter<'h, V> {
    hierarchy: &'h Hierarchy<V>,
    lineage: alloc::vec::IntoIter<ClassId>,
    attribute: &'h str,
    current: Option<Elements<'h, V>>,
}

impl<'h, V> Iterator for EachIter<'h, V> {
    type Item = Element<'h, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.current.as_mut().and_then(|elements| elements.next()) {
                return Some(element);
            }
            let ancestor = self.lineage.next()?;
            self.current = self
                .hierarchy
                .initialized(ancestor, self.attribute)
                .map(Container::iter);
        }
    }
}

impl<V> core::iter::FusedIterator for EachIter<'_, V> {}
