//! Member bags: the unit of class and instance state.
//!
//! A bag maps member names to members. Data members are plain JSON values;
//! method and instance-factory members are `Rc`-shared closures, so
//! copying a bag (ancestor merge, proto snapshots) shares the closure
//! rather than duplicating it. That sharing is how class-level state
//! reaches every instance of a class.

use crate::definition::INSTANCE_MEMBER;
use crate::expose::ExposeMask;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A shared callable member. Arguments and result are JSON values.
#[derive(Clone)]
pub struct Method(Rc<dyn Fn(&[Value]) -> Value>);

impl Method {
    pub fn new(body: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self(Rc::new(body))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method(..)")
    }
}

/// A shared per-call constructor, stored under the reserved
/// [`INSTANCE_MEMBER`] name.
///
/// Receives the instance accumulator bag, the pre-call proto snapshot,
/// and the instance exposure mask.
#[derive(Clone)]
pub struct InstanceFactory(Rc<dyn Fn(&mut MemberBag, &MemberBag, &mut ExposeMask)>);

impl InstanceFactory {
    pub fn new(body: impl Fn(&mut MemberBag, &MemberBag, &mut ExposeMask) + 'static) -> Self {
        Self(Rc::new(body))
    }

    pub fn call(
        &self,
        this_instance: &mut MemberBag,
        proto_instance: &MemberBag,
        mask: &mut ExposeMask,
    ) {
        (self.0)(this_instance, proto_instance, mask)
    }
}

impl fmt::Debug for InstanceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InstanceFactory(..)")
    }
}

/// One value in a bag.
#[derive(Clone, Debug)]
pub enum Member {
    Data(Value),
    Method(Method),
    Factory(InstanceFactory),
}

impl Member {
    pub fn data(value: impl Into<Value>) -> Self {
        Self::Data(value.into())
    }

    pub fn method(body: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self::Method(Method::new(body))
    }

    pub fn factory(body: impl Fn(&mut MemberBag, &MemberBag, &mut ExposeMask) + 'static) -> Self {
        Self::Factory(InstanceFactory::new(body))
    }

    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Self::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn as_factory(&self) -> Option<&InstanceFactory> {
        match self {
            Self::Factory(factory) => Some(factory),
            _ => None,
        }
    }
}

/// An ordered name → member mapping.
///
/// Factories receive `&mut MemberBag` for the accumulator they are
/// building and `&MemberBag` for the frozen proto snapshot.
#[derive(Clone, Debug, Default)]
pub struct MemberBag {
    members: BTreeMap<String, Member>,
}

impl MemberBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a member, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, member: Member) -> Option<Member> {
        self.members.insert(name.into(), member)
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.insert(name, Member::data(value));
    }

    pub fn set_method(
        &mut self,
        name: impl Into<String>,
        body: impl Fn(&[Value]) -> Value + 'static,
    ) {
        self.insert(name, Member::method(body));
    }

    /// Install this class's instance factory under the reserved name.
    pub fn set_instance(
        &mut self,
        body: impl Fn(&mut MemberBag, &MemberBag, &mut ExposeMask) + 'static,
    ) {
        self.insert(INSTANCE_MEMBER, Member::factory(body));
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Member::as_data)
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.get(name).and_then(Member::as_method)
    }

    /// The instance factory, when one is installed under the reserved
    /// name. Anything else stored there does not count.
    pub fn instance_factory(&self) -> Option<&InstanceFactory> {
        self.get(INSTANCE_MEMBER).and_then(Member::as_factory)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Member)> + '_ {
        self.members
            .iter()
            .map(|(name, member)| (name.as_str(), member))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
