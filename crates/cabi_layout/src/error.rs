//! Errors surfaced by the layout entry points and struct views.

use cabi_abi::TargetError;
use cabi_types::TypeError;
use thiserror::Error;

/// Everything that can go wrong between naming a target and touching bytes.
///
/// Computing a layout over a valid descriptor never fails; these errors come
/// from resolving the target, from descriptor construction (forwarded so
/// callers can use one `?` chain), or from struct views.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Target(#[from] TargetError),
    #[error(transparent)]
    Type(#[from] TypeError),
    /// Backing buffer is shorter than the struct.
    #[error("buffer of {actual} bytes is too small for {owner} ({required} bytes required)")]
    BufferTooSmall {
        owner: String,
        required: u64,
        actual: usize,
    },
    #[error("no field named `{field}` in {owner}")]
    UnknownField { owner: String, field: String },
    /// Field is an array, a struct, or a scalar without a native
    /// representation (`long double`).
    #[error("field `{field}` of type `{ty}` cannot be accessed as a scalar")]
    NotAScalar { field: String, ty: String },
    /// Field is not a nested struct.
    #[error("field `{field}` of type `{ty}` is not a struct")]
    NotAStruct { field: String, ty: String },
    #[error("field `{field}` of type `{ty}` cannot hold a {found} value")]
    ScalarMismatch {
        field: String,
        ty: String,
        found: &'static str,
    },
    #[error("value {value} does not fit in field `{field}` of type `{ty}`")]
    ValueOutOfRange {
        field: String,
        ty: String,
        value: String,
    },
}
