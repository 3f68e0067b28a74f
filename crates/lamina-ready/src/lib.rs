//! # lamina-ready
//!
//! Readiness layer for keyed values.
//!
//! This crate provides:
//! - `NameList` (the one-or-many key argument)
//! - `ReadyStore<V>` (first-write-wins values with deferred continuations)
//!
//! It intentionally does not know what values mean or how they relate to
//! each other. Composition semantics live in `lamina-compose`.
//!
//! ## Dispatch model
//!
//! ```text
//! set(key, value)
//!     ↓  satisfies the last missing key of a wait
//! run queue (registration order)
//!     ↓  drained synchronously by the outermost triggering call
//! continuation (may set / wait / read again)
//! ```

pub mod keys;
pub mod store;

pub use keys::NameList;
pub use store::ReadyStore;
