//! Type descriptors for C struct layout.
//!
//! A struct definition is a [`StructType`]: an optional tag plus named
//! [`TypeDesc`] fields in declaration order. Descriptors carry no layout
//! information of their own; sizes and offsets come from combining them with
//! an ABI profile in `cabi_layout`.
//!
//! All structural validation happens here, eagerly, so that layout over an
//! existing descriptor cannot fail:
//!
//! - negative array lengths ([`TypeError::InvalidArrayLength`])
//! - duplicate sibling field names ([`TypeError::DuplicateFieldName`])
//! - structs containing themselves by value
//!   ([`TypeError::InvalidRecursiveEmbedding`])
//!
//! Self reference is expressed through pointers, either to an opaque tag
//! ([`TypeDesc::opaque_ptr`]) or to an earlier complete definition.

mod desc;
mod error;
mod structs;

pub use cabi_abi::PrimitiveKind;
pub use desc::{ArrayType, Pointee, TypeDesc};
pub use error::TypeError;
pub use structs::{Field, StructBuilder, StructType};
