//! Exposure masks and read-only projections.
//!
//! A factory decides what the outside world may see by calling
//! `expose(...)` on its mask; everything else in the bag stays internal.
//! Masks are additive: once a name is exposed it stays exposed for the
//! rest of that definition or instantiation.
//!
//! Mask entries come in two flavors:
//! - *fresh* — exposed by this definition's own `expose` call; projection
//!   reads the member's current value from the source bag.
//! - *inherited* — the name arrived already-exposed from a prerequisite's
//!   stored view, carrying that view's resolved slot; projection keeps the
//!   carried slot unless the name was re-exposed here.
//!
//! The split is what makes an unexposed override invisible: a subclass
//! that overwrites an inherited exposed member without re-exposing it
//! keeps publishing the ancestor's resolved value.

use crate::member::{Member, MemberBag, Method};
use lamina_ready::NameList;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum MaskEntry {
    Fresh,
    Inherited(Option<Member>),
}

/// The capability mask handed to class and instance factories.
#[derive(Clone, Debug, Default)]
pub struct ExposeMask {
    entries: BTreeMap<String, MaskEntry>,
}

impl ExposeMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one or many names as exposed.
    ///
    /// Cumulative and idempotent per name; re-exposing an inherited name
    /// upgrades it to fresh, so projection reads the current value again.
    pub fn expose(&mut self, names: impl Into<NameList>) {
        for name in names.into() {
            self.entries.insert(name, MaskEntry::Fresh);
        }
    }

    /// Record a name that arrived already-exposed from a prerequisite,
    /// together with the slot its stored view resolved to.
    ///
    /// Later prerequisites overwrite the carried slot of earlier ones. A
    /// fresh mark is never downgraded.
    pub(crate) fn inherit(&mut self, name: &str, carried: Option<Member>) {
        match self.entries.get(name) {
            Some(MaskEntry::Fresh) => {}
            _ => {
                self.entries
                    .insert(name.to_string(), MaskEntry::Inherited(carried));
            }
        }
    }

    pub fn is_exposed(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Project `source` through `mask`.
///
/// The result has exactly the mask's key set: fresh names read the
/// source's current member (cloned by handle, so callable members keep
/// sharing their closure), inherited names keep their carried slot, and
/// masked names with no member anywhere are bound to the unset sentinel.
pub fn project(mask: &ExposeMask, source: &MemberBag) -> ExposedView {
    let slots = mask
        .entries
        .iter()
        .map(|(name, entry)| {
            let slot = match entry {
                MaskEntry::Fresh => source.get(name).cloned(),
                MaskEntry::Inherited(carried) => carried.clone(),
            };
            (name.clone(), slot)
        })
        .collect();
    ExposedView { slots }
}

/// The read-only result of projecting a bag through a mask.
///
/// A view never exposes mutation; `None` slots mean "exposed, but no
/// member stands behind the name".
#[derive(Clone, Debug, Default)]
pub struct ExposedView {
    slots: BTreeMap<String, Option<Member>>,
}

impl ExposedView {
    /// Whether `name` is part of the mask, set or not.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// The member behind `name`, when the name is masked and set.
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.slots.get(name).and_then(Option::as_ref)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Member::as_data)
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.get(name).and_then(Member::as_method)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.keys().map(String::as_str)
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, Option<&Member>)> + '_ {
        self.slots
            .iter()
            .map(|(name, slot)| (name.as_str(), slot.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
