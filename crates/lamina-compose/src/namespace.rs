//! Class namespaces: dependency-gated definition, lookup, instantiation.
//!
//! A namespace is an isolated registry of class definitions over its own
//! readiness store. Defining a class registers a wait on its
//! prerequisites; the merge-and-project work runs synchronously once the
//! last prerequisite lands, inside that defining call. Independent
//! namespaces share no state.
//!
//! The namespace itself is a cheap handle: clones observe one registry.

use crate::ancestry::{dedupe_keep_first, linearize};
use crate::definition::{ClassDefinition, INSTANCE_MEMBER};
use crate::error::DefineError;
use crate::expose::{ExposeMask, ExposedView, project};
use crate::member::MemberBag;
use lamina_ready::{NameList, ReadyStore};
use std::cell::RefCell;
use std::rc::Rc;

/// An isolated class registry.
#[derive(Clone, Default)]
pub struct Namespace {
    classes: ReadyStore<Rc<ClassDefinition>>,
}

impl Namespace {
    pub fn new() -> Self {
        Self {
            classes: ReadyStore::new(),
        }
    }

    /// Declare a class.
    ///
    /// `extend` lists the prerequisite classes whose state this one is
    /// composed from (a bare name coerces to a one-element list). The
    /// call registers the definition and returns; `factory` runs once
    /// every prerequisite is ready — immediately, when they already are.
    ///
    /// The factory receives the merged accumulator bag, the frozen
    /// pre-override snapshot, and the exposure mask. Members it never
    /// exposes stay internal. The reserved `instance` name is exposed
    /// unconditionally, so every class is instantiable.
    ///
    /// Defining an already-defined name is a silent no-op: first writer
    /// wins, and nothing derived from the original definition changes.
    pub fn define<F>(
        &self,
        name: impl Into<String>,
        extend: impl Into<NameList>,
        factory: F,
    ) -> Result<(), DefineError>
    where
        F: FnOnce(&mut MemberBag, &MemberBag, &mut ExposeMask) + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(DefineError::EmptyClassName);
        }
        let extend = extend.into().into_vec();
        if extend.iter().any(|prerequisite| prerequisite.is_empty()) {
            return Err(DefineError::EmptyPrerequisiteName);
        }

        let classes = self.classes.clone();
        let wait_on = NameList::from(extend.clone());
        self.classes.need(wait_on, move || {
            if classes.get(&name).is_some() {
                return;
            }

            let super_names = dedupe_keep_first(linearize(
                &|super_name: &str| extend_of(&classes, super_name),
                &extend,
            ));

            let mut this_class = MemberBag::new();
            let mut proto_class = MemberBag::new();
            let mut mask = ExposeMask::new();
            for super_name in &super_names {
                let definition = ready_definition(&classes, super_name);
                for (slot_name, slot) in definition.exposed.slots() {
                    mask.inherit(slot_name, slot.cloned());
                }
                for (member_name, member) in definition.singleton.iter() {
                    this_class.insert(member_name, member.clone());
                    proto_class.insert(member_name, member.clone());
                }
            }

            factory(&mut this_class, &proto_class, &mut mask);
            mask.expose(INSTANCE_MEMBER);

            let exposed = project(&mask, &this_class);
            classes.set(
                name,
                Rc::new(ClassDefinition {
                    extend,
                    singleton: this_class,
                    exposed,
                }),
            );
        });
        Ok(())
    }

    /// The stored exposed view for `name`, or `None` while undefined.
    ///
    /// Absence is not an error: probing a not-yet-ready class is the
    /// documented optimistic path. Callers that need readiness use
    /// [`once`](Self::once).
    pub fn get(&self, name: &str) -> Option<ExposedView> {
        self.classes
            .get(name)
            .map(|definition| definition.exposed.clone())
    }

    /// One slot per requested name, in request order.
    pub fn get_many(&self, names: impl Into<NameList>) -> Vec<Option<ExposedView>> {
        names.into().iter().map(|name| self.get(name)).collect()
    }

    /// Construct instances of the requested classes.
    ///
    /// Waits until every requested name is ready (a ready class's
    /// prerequisites are ready by construction), then builds one instance
    /// per requested name, in request order: each name in the ancestor
    /// chain that installed an instance factory runs it against the
    /// shared accumulator, a proto snapshot taken just before that call,
    /// and the instance mask; the accumulator is then projected through
    /// the mask.
    ///
    /// `callback` always receives the views. The return value carries the
    /// same views when the wait was satisfied synchronously, `None` when
    /// construction was deferred. Repeating a name yields independent
    /// instance state; only class-level closures are shared.
    pub fn instantiate<F>(&self, names: impl Into<NameList>, callback: F) -> Option<Vec<ExposedView>>
    where
        F: FnOnce(Vec<ExposedView>) + 'static,
    {
        let names = names.into();
        let requested = names.clone();
        let classes = self.classes.clone();
        let delivered: Rc<RefCell<Option<Vec<ExposedView>>>> = Rc::new(RefCell::new(None));
        let delivered_inner = Rc::clone(&delivered);

        self.classes.need(names, move || {
            let mut instances = Vec::new();
            classes.each(requested, |name, definition| {
                instances.push(build_instance(&classes, name, definition));
            });
            *delivered_inner.borrow_mut() = Some(instances.clone());
            callback(instances);
        });

        delivered.take()
    }

    /// Run `callback` as soon as all requested names are ready —
    /// immediately when they already are.
    ///
    /// The callback receives the views `get` would produce at firing
    /// time, not state captured at registration. One-shot per
    /// registration: this namespace never undefines a class, so a fired
    /// watch cannot re-arm.
    pub fn once<F>(&self, names: impl Into<NameList>, callback: F)
    where
        F: FnOnce(Vec<ExposedView>) + 'static,
    {
        let names = names.into();
        let requested = names.clone();
        let classes = self.classes.clone();
        self.classes.once(names, move || {
            let views = requested
                .iter()
                .map(|name| {
                    classes
                        .get(name)
                        .expect("watched class must be ready when the watch fires")
                        .exposed
                        .clone()
                })
                .collect();
            callback(views);
        });
    }

    /// Whether `name` has a stored definition.
    pub fn contains(&self, name: &str) -> bool {
        self.classes.get(name).is_some()
    }

    /// Sorted names with stored definitions.
    pub fn defined_names(&self) -> Vec<String> {
        self.classes.ready_keys()
    }

    /// Number of registered definitions/watches still waiting on
    /// prerequisites.
    pub fn pending_definitions(&self) -> usize {
        self.classes.pending_waits()
    }

    pub(crate) fn definition(&self, name: &str) -> Option<Rc<ClassDefinition>> {
        self.classes.get(name)
    }
}

fn extend_of(classes: &ReadyStore<Rc<ClassDefinition>>, name: &str) -> Vec<String> {
    ready_definition(classes, name).extend.clone()
}

fn ready_definition(classes: &ReadyStore<Rc<ClassDefinition>>, name: &str) -> Rc<ClassDefinition> {
    classes
        .get(name)
        .expect("prerequisite must be ready before its definition is read")
}

fn build_instance(
    classes: &ReadyStore<Rc<ClassDefinition>>,
    name: &str,
    definition: &Rc<ClassDefinition>,
) -> ExposedView {
    let mut chain = dedupe_keep_first(linearize(
        &|super_name: &str| extend_of(classes, super_name),
        &definition.extend,
    ));
    chain.push(name.to_string());

    let mut this_instance = MemberBag::new();
    let mut mask = ExposeMask::new();
    for chain_name in &chain {
        let chain_definition = ready_definition(classes, chain_name);
        if let Some(factory) = chain_definition.singleton.instance_factory() {
            let proto_instance = this_instance.clone();
            factory.call(&mut this_instance, &proto_instance, &mut mask);
        }
    }
    project(&mask, &this_instance)
}

thread_local! {
    static DEFAULT_NAMESPACE: Namespace = Namespace::new();
}

/// The per-thread shared namespace.
///
/// A thin convenience over constructing one: embedders that want
/// isolation build their own `Namespace` and pass it around.
pub fn default_namespace() -> Namespace {
    DEFAULT_NAMESPACE.with(Namespace::clone)
}
