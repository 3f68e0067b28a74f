//! Deterministic snapshot surfaces.
//!
//! Views and namespaces project to canonical JSON: slot descriptors in
//! name order, one row per defined class, and a content signature over
//! the canonical string. Two namespaces built the same way produce
//! byte-identical snapshots and equal signatures.

use crate::expose::ExposedView;
use crate::member::Member;
use crate::namespace::Namespace;
use serde::Serialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::fmt;

pub const NAMESPACE_SNAPSHOT_KIND: &str = "lamina.namespace_snapshot.v1";

/// Hex-encoded SHA-256 identity of a view's canonical snapshot.
///
/// Two views with the same signature expose the same names, the same
/// data values, and the same slot shapes. Callable members hash by shape
/// only — closures have no canonical content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContentSignature(pub String);

impl ContentSignature {
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{hash:x}"))
    }

    pub fn of_view(view: &ExposedView) -> Self {
        let canonical =
            serde_json::to_string(&view_snapshot(view)).expect("view snapshot should serialize");
        Self::from_bytes(canonical.as_bytes())
    }
}

impl fmt::Display for ContentSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical JSON for one view: name → slot descriptor, in name order.
pub fn view_snapshot(view: &ExposedView) -> Value {
    let mut slots = serde_json::Map::new();
    for (name, slot) in view.slots() {
        let descriptor = match slot {
            None => json!({"kind": "unset"}),
            Some(Member::Data(value)) => json!({"kind": "data", "value": value}),
            Some(Member::Method(_)) => json!({"kind": "method"}),
            Some(Member::Factory(_)) => json!({"kind": "factory"}),
        };
        slots.insert(name.to_string(), descriptor);
    }
    Value::Object(slots)
}

/// One row per defined class in a namespace snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRow {
    pub name: String,
    pub extend: Vec<String>,
    pub exposed_names: Vec<String>,
    pub signature: String,
}

/// Rows for every defined class, in name order. Pending definitions do
/// not appear — a class exists only once its prerequisites did.
pub fn namespace_rows(namespace: &Namespace) -> Vec<ClassRow> {
    namespace
        .defined_names()
        .iter()
        .map(|name| {
            let definition = namespace
                .definition(name)
                .expect("defined name must have a stored definition");
            ClassRow {
                name: name.clone(),
                extend: definition.extend.clone(),
                exposed_names: definition.exposed.names().map(str::to_string).collect(),
                signature: ContentSignature::of_view(&definition.exposed).0,
            }
        })
        .collect()
}

/// The versioned snapshot envelope for a whole namespace.
pub fn namespace_snapshot(namespace: &Namespace) -> Value {
    json!({
        "schema": 1,
        "snapshotKind": NAMESPACE_SNAPSHOT_KIND,
        "classes": namespace_rows(namespace),
    })
}
