use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use std::collections::HashMap;

use once_cell::unsync::OnceCell;

use crate::{
    AttributeNames, Container, Declaration, Each, English, Error, Inflector, OperationKind,
    Options, debug, merge, trace,
};

/// Handle to a class registered in a [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    /// Position of the class in definition order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for ClassId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An operation installed on a class by [`Hierarchy::declare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// What the operation does.
    pub kind: OperationKind,
    /// Singular name of the attribute it belongs to.
    pub attribute: String,
    /// The class that declared the attribute.
    pub owner: ClassId,
}

/// What [`Hierarchy::call`] returns, depending on the operation called.
#[derive(Debug)]
pub enum Reply<'h, V> {
    /// `things`: the storage the class owns.
    Collective(&'h Container<V>),
    /// `each_thing`: a restartable enumeration of the ancestor chain.
    Each(Each<'h, V>),
    /// `all_things`: a freshly merged view.
    All(Container<V>),
}

struct ClassDef<V> {
    name: String,
    parent: Option<ClassId>,
    /// Declarations made on this class, by singular name.
    declarations: HashMap<String, Declaration<V>>,
    /// Operations installed on this class, by operation name.
    operations: HashMap<String, Operation>,
    /// Storage owned by this class, by storage slot. Slots exist for every
    /// attribute this class responds to; their content is created lazily.
    storage: HashMap<String, OnceCell<Container<V>>>,
}

impl<V> ClassDef<V> {
    fn new(name: String, parent: Option<ClassId>) -> Self {
        ClassDef {
            name,
            parent,
            declarations: HashMap::new(),
            operations: HashMap::new(),
            storage: HashMap::new(),
        }
    }
}

/// A registry of classes, their parent links, and the collective attributes
/// declared on them.
///
/// ```
/// use collective::{Container, Hierarchy, Options};
///
/// let mut h = Hierarchy::new();
/// let base = h.define_class("MyPrototypeObject", None)?;
/// let sub = h.define_class("MyPrototypeObjectSubClass", Some(base))?;
///
/// h.declare(base, "thing", Options::new())?;
/// h.collective_mut(base, "things")?.push("Thingy")?;
/// h.collective_mut(sub, "things")?.push("OtherThingy")?;
///
/// assert_eq!(h.all(sub, "all_things")?, Container::sequence(["Thingy", "OtherThingy"]));
/// assert_eq!(h.all(base, "all_things")?, Container::sequence(["Thingy"]));
/// # Ok::<(), collective::Error>(())
/// ```
pub struct Hierarchy<V> {
    classes: Vec<ClassDef<V>>,
    by_name: HashMap<String, ClassId>,
    inflector: Box<dyn Inflector>,
}

impl<V> Default for Hierarchy<V> {
    fn default() -> Self {
        Self::with_inflector(English)
    }
}

impl<V> core::fmt::Debug for Hierarchy<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.classes.iter().map(|class| {
                let parent = class.parent.map(|p| self.classes[p.index()].name.as_str());
                (class.name.as_str(), parent)
            }))
            .finish()
    }
}

impl<V> Hierarchy<V> {
    /// An empty hierarchy that derives names with English plural rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty hierarchy that derives plural names with `inflector`.
    pub fn with_inflector(inflector: impl Inflector + 'static) -> Self {
        Hierarchy {
            classes: Vec::new(),
            by_name: HashMap::new(),
            inflector: Box::new(inflector),
        }
    }

    /// Register a class. `parent` must already be registered, so chains are
    /// always finite.
    pub fn define_class(
        &mut self,
        name: impl Into<String>,
        parent: Option<ClassId>,
    ) -> Result<ClassId, Error> {
        let name = name.into();
        if let Some(parent) = parent {
            self.class(parent)?;
        }
        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateClass { name });
        }

        let id = ClassId(self.classes.len() as u32);
        let mut class = ClassDef::new(name.clone(), parent);

        // inherited accessors get their own, not yet initialised, storage
        if let Some(parent) = parent {
            for ancestor in self.ancestors_unchecked(parent) {
                for declaration in self.classes[ancestor.index()].declarations.values() {
                    class
                        .storage
                        .entry(declaration.names().storage_slot.clone())
                        .or_default();
                }
            }
        }

        debug!(class = %name, ?parent, "defined class");
        self.classes.push(class);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Look up a class by name.
    pub fn class_named(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Name of a class.
    pub fn name(&self, class: ClassId) -> Result<&str, Error> {
        Ok(self.class(class)?.name.as_str())
    }

    /// Direct parent of a class.
    pub fn parent(&self, class: ClassId) -> Result<Option<ClassId>, Error> {
        Ok(self.class(class)?.parent)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no class has been defined yet.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The class itself, then its parent, up to the root.
    pub fn ancestors(&self, class: ClassId) -> Result<Ancestors<'_, V>, Error> {
        self.class(class)?;
        Ok(self.ancestors_unchecked(class))
    }

    /// The root first, the class itself last. This is the order in which
    /// contributions are enumerated and merged.
    pub fn lineage(&self, class: ClassId) -> Result<Vec<ClassId>, Error> {
        self.class(class)?;
        Ok(self.lineage_unchecked(class))
    }

    /// Returns `true` if `class` is `ancestor` or inherits from it.
    pub fn inherits_from(&self, class: ClassId, ancestor: ClassId) -> bool {
        self.classes.get(class.index()).is_some()
            && self.ancestors_unchecked(class).any(|id| id == ancestor)
    }

    /// Operations installed directly on `class` (not inherited ones), sorted by name.
    pub fn operations(&self, class: ClassId) -> Result<Vec<&Operation>, Error> {
        let mut operations: Vec<_> = self.class(class)?.operations.iter().collect();
        operations.sort_by(|a, b| a.0.cmp(b.0));
        Ok(operations.into_iter().map(|(_, op)| op).collect())
    }

    /// Resolve an operation name through the ancestor chain, nearest class
    /// first. `None` if neither the class nor an ancestor installed it.
    pub fn respond_to(&self, class: ClassId, operation: &str) -> Option<Operation> {
        self.classes.get(class.index())?;
        self.ancestors_unchecked(class)
            .find_map(|id| self.classes[id.index()].operations.get(operation))
            .cloned()
    }

    /// The declaration `name` refers to from `class`, and the class that made
    /// it. `name` may be any derived operation name or a singular name.
    /// Operation names are resolved first, through the whole chain, so this
    /// agrees with [`respond_to`](Self::respond_to) when one attribute's
    /// singular name is another one's accessor (`fields` next to `field`).
    pub fn declaration(&self, class: ClassId, name: &str) -> Option<(ClassId, &Declaration<V>)> {
        self.classes.get(class.index())?;
        let by_operation = self.ancestors_unchecked(class).find_map(|id| {
            let def = &self.classes[id.index()];
            let op = def.operations.get(name)?;
            Some((id, def.declarations.get(&op.attribute)?))
        });
        by_operation.or_else(|| {
            self.ancestors_unchecked(class)
                .find_map(|id| Some((id, self.classes[id.index()].declarations.get(name)?)))
        })
    }

    /// The storage `class` owns for the attribute `name` refers to, created
    /// with the declaration's default on first access.
    pub fn collective(&self, class: ClassId, name: &str) -> Result<&Container<V>, Error> {
        let (_, declaration) = self.resolve(class, name)?;
        match self.own_storage(class, &declaration.names().singular) {
            Some(storage) => storage,
            None => Err(self.unknown_operation(class, name)),
        }
    }

    /// Mutable access to the storage `class` owns. Never affects ancestors or
    /// descendants.
    pub fn collective_mut(&mut self, class: ClassId, name: &str) -> Result<&mut Container<V>, Error> {
        let (_, declaration) = self.resolve(class, name)?;
        let slot = declaration.names().storage_slot.clone();
        self.collective(class, name)?;

        let def = &mut self.classes[class.index()];
        match def.storage.get_mut(&slot).and_then(OnceCell::get_mut) {
            Some(container) => Ok(container),
            None => Err(Error::UnknownOperation {
                class: def.name.clone(),
                operation: String::from(name),
            }),
        }
    }

    /// Enumerate every element of every ancestor's storage, root first,
    /// without building a merged container. The result can be iterated any
    /// number of times.
    pub fn each(&self, class: ClassId, name: &str) -> Result<Each<'_, V>, Error> {
        let (_, declaration) = self.resolve(class, name)?;
        self.each_of(class, declaration)
    }

    /// Like [`each`](Self::each), handing every element to `visitor` right away.
    pub fn each_with(
        &self,
        class: ClassId,
        name: &str,
        mut visitor: impl FnMut(crate::Element<'_, V>),
    ) -> Result<(), Error> {
        for element in &self.each(class, name)? {
            visitor(element);
        }
        Ok(())
    }

    /// A fresh container holding the contributions of the whole ancestor
    /// chain, folded by the declaration's merge strategy. Never cached, never
    /// aliases any class's storage.
    pub fn all(&self, class: ClassId, name: &str) -> Result<Container<V>, Error> {
        let (_, declaration) = self.resolve(class, name)?;
        self.all_of(class, declaration)
    }

    /// Call an installed operation by name, resolving it through the
    /// ancestor chain.
    pub fn call(&self, class: ClassId, operation: &str) -> Result<Reply<'_, V>, Error> {
        self.class(class)?;
        let op = self
            .respond_to(class, operation)
            .ok_or_else(|| self.unknown_operation(class, operation))?;
        let declaration = self.classes[op.owner.index()]
            .declarations
            .get(&op.attribute)
            .ok_or_else(|| self.unknown_operation(class, operation))?;

        Ok(match op.kind {
            OperationKind::Collective => {
                match self.own_storage(class, &declaration.names().singular) {
                    Some(storage) => Reply::Collective(storage?),
                    None => return Err(self.unknown_operation(class, operation)),
                }
            }
            OperationKind::Each => Reply::Each(self.each_of(class, declaration)?),
            OperationKind::All => Reply::All(self.all_of(class, declaration)?),
        })
    }

    fn class(&self, class: ClassId) -> Result<&ClassDef<V>, Error> {
        self.classes
            .get(class.index())
            .ok_or(Error::UnknownClass { id: class })
    }

    pub(crate) fn ancestors_unchecked(&self, class: ClassId) -> Ancestors<'_, V> {
        Ancestors {
            hierarchy: self,
            next: Some(class),
        }
    }

    pub(crate) fn lineage_unchecked(&self, class: ClassId) -> Vec<ClassId> {
        let mut lineage: Vec<_> = self.ancestors_unchecked(class).collect();
        lineage.reverse();
        lineage
    }

    /// The nearest declaration of the attribute declared as `singular`.
    /// Unlike [`declaration`](Self::declaration), operation names are not
    /// considered.
    pub(crate) fn declared(&self, class: ClassId, singular: &str) -> Option<&Declaration<V>> {
        self.classes.get(class.index())?;
        self.ancestors_unchecked(class)
            .find_map(|id| self.classes[id.index()].declarations.get(singular))
    }

    /// The storage `class` owns for the attribute declared as `singular`,
    /// initialised on first access. `None` if the class does not respond to it.
    pub(crate) fn own_storage(
        &self,
        class: ClassId,
        singular: &str,
    ) -> Option<Result<&Container<V>, Error>> {
        let declaration = self.declared(class, singular)?;
        let slot = &declaration.names().storage_slot;
        let cell = self.classes[class.index()].storage.get(slot)?;
        Some(cell.get_or_try_init(|| {
            trace!(class = %self.classes[class.index()].name, %slot, "initialising collective storage");
            declaration.make_default()
        }))
    }

    /// The storage of an ancestor that has already been initialised, or
    /// `None` if it does not respond to the attribute.
    pub(crate) fn initialized(&self, class: ClassId, singular: &str) -> Option<&Container<V>> {
        let declaration = self.declared(class, singular)?;
        self.classes[class.index()]
            .storage
            .get(&declaration.names().storage_slot)?
            .get()
    }

    fn each_of<'h>(
        &'h self,
        class: ClassId,
        declaration: &'h Declaration<V>,
    ) -> Result<Each<'h, V>, Error> {
        let singular = declaration.names().singular.as_str();

        // initialise every responding ancestor up front, so that iteration
        // itself cannot fail
        for ancestor in self.lineage_unchecked(class) {
            if let Some(storage) = self.own_storage(ancestor, singular) {
                storage?;
            }
        }

        Ok(Each::new(self, class, singular))
    }

    fn all_of(&self, class: ClassId, declaration: &Declaration<V>) -> Result<Container<V>, Error> {
        let each = self.each_of(class, declaration)?;
        trace!(
            class = %self.classes[class.index()].name,
            attribute = %declaration.names().singular,
            "merging ancestor chain"
        );
        merge::fold(declaration.merge_strategy(), declaration.kind(), &each)
    }

    fn resolve(&self, class: ClassId, name: &str) -> Result<(ClassId, &Declaration<V>), Error> {
        self.class(class)?;
        self.declaration(class, name)
            .ok_or_else(|| self.unknown_operation(class, name))
    }

    fn unknown_operation(&self, class: ClassId, name: &str) -> Error {
        let class = match self.classes.get(class.index()) {
            Some(def) => def.name.clone(),
            None => alloc::format!("{class}"),
        };
        Error::UnknownOperation {
            class,
            operation: String::from(name),
        }
    }
}

impl<V: Clone + 'static> Hierarchy<V> {
    /// Declare a collective attribute on `class`, installing its collective
    /// accessor, per-element enumerator and all-merged accessor.
    ///
    /// Declaring the same name again on the same class replaces those
    /// operations; storage that was already populated is kept as is.
    pub fn declare(
        &mut self,
        class: ClassId,
        singular: &str,
        options: Options<V>,
    ) -> Result<AttributeNames, Error> {
        self.class(class)?;
        let names = AttributeNames::derive(singular, &*self.inflector)?;
        let declaration = options.into_declaration(names.clone())?;
        debug!(
            class = %self.classes[class.index()].name,
            attribute = %names.singular,
            kind = %declaration.kind(),
            "declared collective attribute"
        );

        // the class and everything that inherits from it responds to the
        // new accessor, so all of them get a slot
        for id in 0..self.classes.len() {
            let id = ClassId(id as u32);
            if self.inherits_from(id, class) {
                self.classes[id.index()]
                    .storage
                    .entry(names.storage_slot.clone())
                    .or_default();
            }
        }

        let def = &mut self.classes[class.index()];
        for (operation, kind) in names.operations() {
            def.operations.insert(
                String::from(operation),
                Operation {
                    kind,
                    attribute: names.singular.clone(),
                    owner: class,
                },
            );
        }
        def.declarations.insert(names.singular.clone(), declaration);

        Ok(names)
    }
}

/// Iterator over a class and its ancestors, nearest first.
pub struct Ancestors<'h, V> {
    hierarchy: &'h Hierarchy<V>,
    next: Option<ClassId>,
}

impl<V> Iterator for Ancestors<'_, V> {
    type Item = ClassId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self
            .hierarchy
            .classes
            .get(current.index())
            .and_then(|class| class.parent);
        Some(current)
    }
}
