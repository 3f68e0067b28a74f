//! One-or-many key arguments.
//!
//! Store waits, prerequisite lists, and exposure calls all accept either a
//! single name or a flat sequence of names. `NameList` is that argument:
//! every conversion flattens exactly one level, and the type system rules
//! out deeper nesting.

use serde::{Deserialize, Serialize};

/// An ordered list of keys, as given by the caller.
///
/// Duplicates are preserved. Callers that need uniqueness dedupe on their
/// own terms — encounter order is semantic for override precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameList(Vec<String>);

impl NameList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NameList {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for NameList {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for NameList {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for NameList {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for NameList {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|name| name.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for NameList {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|name| name.to_string()).collect())
    }
}

impl IntoIterator for NameList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
