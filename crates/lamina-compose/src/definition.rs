//! Stored class definitions.

use crate::expose::ExposedView;
use crate::member::MemberBag;

/// Reserved member name: every stored view carries this key, whether or
/// not the class installed a factory under it, so every class is
/// instantiable.
pub const INSTANCE_MEMBER: &str = "instance";

/// The record stored once per class name.
///
/// Held behind `Rc` in the namespace store and never replaced: a second
/// `define` for the same name is a no-op, so everything derived from the
/// first definition stays valid for the life of the namespace.
#[derive(Clone, Debug)]
pub struct ClassDefinition {
    /// Prerequisite names as declared by the caller, duplicates and all.
    pub extend: Vec<String>,
    /// The full class-level bag: inherited members plus the factory's own
    /// additions and overrides. Internal — never handed to callers.
    pub singleton: MemberBag,
    /// The projected public view.
    pub exposed: ExposedView,
}
