//! # lamina-compose
//!
//! Dependency-gated class composition.
//!
//! This crate provides:
//! - `Member` / `MemberBag` (class and instance state)
//! - `ExposeMask` / `ExposedView` (capability masking and projection)
//! - ancestor linearization (merge order, override precedence)
//! - `Namespace` (define / get / instantiate / once)
//! - deterministic snapshot surfaces over defined classes
//!
//! Readiness bookkeeping lives in `lamina-ready`; this crate decides what
//! becomes ready and what it looks like from outside.
//!
//! ## Composition model
//!
//! ```text
//! define(name, extend, factory)
//!     ↓  deferred until every prerequisite is ready
//! merged ancestor bags → factory → projection through the mask
//!     ↓  stored first-write-wins
//! get / once / instantiate  (read-only exposed views)
//! ```

pub mod ancestry;
pub mod definition;
pub mod error;
pub mod expose;
pub mod member;
pub mod namespace;
pub mod snapshot;

pub use ancestry::{dedupe_keep_first, linearize};
pub use definition::{ClassDefinition, INSTANCE_MEMBER};
pub use error::DefineError;
pub use expose::{ExposeMask, ExposedView, project};
pub use lamina_ready::{NameList, ReadyStore};
pub use member::{InstanceFactory, Member, MemberBag, Method};
pub use namespace::{Namespace, default_namespace};
pub use snapshot::{
    ClassRow, ContentSignature, NAMESPACE_SNAPSHOT_KIND, namespace_rows, namespace_snapshot,
    view_snapshot,
};
