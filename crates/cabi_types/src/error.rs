//! Descriptor construction errors.

use thiserror::Error;

/// A structural problem found while building a type descriptor.
///
/// Every variant is raised at construction time; a descriptor that exists
/// is always valid to lay out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Array declared with a negative element count.
    #[error("invalid array length {count}: length must be non-negative")]
    InvalidArrayLength { count: i64 },
    /// Two sibling fields share a name.
    #[error("field `{field}` specified twice in {owner}")]
    DuplicateFieldName { owner: String, field: String },
    /// A struct contains itself by value, directly or through nested
    /// value-embedded structs or arrays.
    #[error("struct `{name}` embeds itself by value through `{path}`; use a pointer instead")]
    InvalidRecursiveEmbedding { name: String, path: String },
}
