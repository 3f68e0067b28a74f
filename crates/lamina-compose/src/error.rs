//! Input-contract errors.
//!
//! The composition protocol is silent by design for its expected-absence
//! cases (redefinition, unready lookup). The only typed failures are
//! caller mistakes that can be rejected before anything registers.

/// Rejections raised by `Namespace::define` before any wait is taken.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DefineError {
    #[error("class name is required")]
    EmptyClassName,

    #[error("prerequisite name is required")]
    EmptyPrerequisiteName,
}
