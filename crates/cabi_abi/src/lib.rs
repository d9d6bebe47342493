//! Target ABI profiles for C struct layout.
//!
//! This crate answers one question per target: how big is each C primitive,
//! how is it aligned, and how wide is a pointer. Everything is static lookup
//! data; the actual struct layout algorithm lives in `cabi_layout`.
//!
//! ```text
//! let profile = AbiProfile::for_target("i686-unknown-linux-gnu")?;
//! assert_eq!(profile.align_of(PrimitiveKind::Double), 4);
//! ```

mod primitive;
mod profile;
mod target;

pub use primitive::PrimitiveKind;
pub use profile::{AbiProfile, ByteOrder, EmptyStructRule, ProfileBuilder, ScalarLayout};
pub use target::{host_triple, TargetError, TargetTriple, SUPPORTED_TARGETS};
