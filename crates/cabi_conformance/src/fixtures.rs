//! The sample structs every layout must agree on.
//!
//! Covers ordering effects on padding, nested structs, char arrays,
//! arrays of structs, a mimic of libffi's `ffi_type` (`struct _test11 **`),
//! and the libdespotify track record with an opaque `struct artist *`.

use std::sync::Arc;

use cabi_abi::PrimitiveKind::{
    self, Bool, Char, Double, Float, Int, Short, SizeT, UChar, UInt, UShort,
};
use cabi_types::{StructType, TypeDesc};
use rustc_hash::FxHashMap;

use crate::catalog::CatalogError;

/// Declared type of one fixture field.
#[derive(Copy, Clone, Debug)]
enum Decl {
    Prim(PrimitiveKind),
    Array(PrimitiveKind, i64),
    Ptr(PrimitiveKind),
    /// `struct tag *`, possibly never defined.
    Opaque(&'static str),
    /// `struct tag **`
    OpaqueTwice(&'static str),
    /// An earlier fixture stored by value.
    Struct(&'static str),
    StructArray(&'static str, i64),
}

use Decl::{Array, Opaque, OpaqueTwice, Prim, Ptr, Struct, StructArray};

/// Name, struct tag, and fields of each fixture, in definition order.
const DEFINITIONS: &[(&str, &str, &[(&str, Decl)])] = &[
    ("test1", "_test1", &[("a", Prim(Int)), ("b", Prim(Int)), ("c", Prim(Double))]),
    ("test2", "_test2", &[("a", Prim(Int)), ("b", Prim(Double)), ("c", Prim(Int))]),
    ("test3", "_test3", &[("a", Prim(Double)), ("b", Prim(Int)), ("c", Prim(Int))]),
    ("test4", "_test4", &[("a", Prim(Double)), ("b", Prim(Double)), ("c", Prim(Int))]),
    ("test5", "_test5", &[("a", Prim(Int)), ("b", Prim(Double)), ("c", Prim(Double))]),
    ("test6", "_test6", &[("a", Prim(Char)), ("b", Prim(Short)), ("c", Prim(Int))]),
    ("test7", "_test7", &[("a", Prim(Int)), ("b", Prim(Short)), ("c", Prim(Char))]),
    (
        "test8",
        "_test8",
        &[("a", Prim(Int)), ("b", Prim(Short)), ("c", Prim(Char)), ("d", Prim(Char))],
    ),
    (
        "test9",
        "_test9",
        &[
            ("a", Prim(Int)),
            ("b", Prim(Short)),
            ("c", Prim(Char)),
            ("d", Prim(Char)),
            ("e", Prim(Char)),
        ],
    ),
    ("test10", "_test10", &[("a", Struct("_test1")), ("b", Prim(Char))]),
    (
        "test11",
        "_test11",
        &[
            ("a", Prim(SizeT)),
            ("b", Prim(UShort)),
            ("c", Prim(UShort)),
            ("d", OpaqueTwice("_test11")),
        ],
    ),
    ("test12", "_test12", &[("a", Ptr(Char)), ("b", Prim(Int))]),
    ("test13", "_test13", &[("a", Prim(Char)), ("b", Array(Char, 2))]),
    (
        "test14",
        "_test14",
        &[("a", Prim(Char)), ("b", Array(Char, 2)), ("c", Prim(Short)), ("d", Prim(Char))],
    ),
    ("test15", "_test15", &[("a", Struct("_test1")), ("b", Struct("_test1"))]),
    (
        "test16",
        "_test16",
        &[("a", Array(Double, 10)), ("b", Array(Char, 3)), ("c", Array(Int, 6))],
    ),
    ("test17", "_test17", &[("a", Array(Char, 3))]),
    ("test18", "_test18", &[("a", StructArray("_test17", 100))]),
    (
        "test19",
        "_test19",
        &[
            ("has_meta_data", Prim(Bool)),
            ("playable", Prim(Bool)),
            ("geo_restricted", Prim(Bool)),
            ("track_id", Array(UChar, 33)),
            ("file_id", Array(UChar, 41)),
            ("file_bitrate", Prim(UInt)),
            ("album_id", Array(UChar, 33)),
            ("cover_id", Array(UChar, 41)),
            ("key", Ptr(UChar)),
            ("allowed", Ptr(Char)),
            ("forbidden", Ptr(Char)),
            ("title", Array(Char, 256)),
            ("artist", Opaque("artist")),
            ("album", Array(Char, 256)),
            ("length", Prim(Int)),
            ("tracknumber", Prim(Int)),
            ("year", Prim(Int)),
            ("popularity", Prim(Float)),
            ("next", Opaque("_test19")),
        ],
    ),
];

/// A named sample struct.
#[derive(Clone, Debug)]
pub struct Fixture {
    /// Name used in property keys (`test1 sizeof`).
    pub name: &'static str,
    pub ty: Arc<StructType>,
}

/// Build all sample structs in definition order.
pub fn fixtures() -> Result<Vec<Fixture>, CatalogError> {
    let mut by_tag: FxHashMap<&str, Arc<StructType>> = FxHashMap::default();
    let mut out = Vec::with_capacity(DEFINITIONS.len());

    for &(name, tag, fields) in DEFINITIONS {
        let fields = fields
            .iter()
            .map(|&(field, decl)| Ok((field, resolve(decl, &by_tag)?)))
            .collect::<Result<Vec<_>, CatalogError>>()?;
        let ty = StructType::new(tag, fields)?;
        by_tag.insert(tag, Arc::clone(&ty));
        out.push(Fixture { name, ty });
    }

    Ok(out)
}

fn resolve(decl: Decl, by_tag: &FxHashMap<&str, Arc<StructType>>) -> Result<TypeDesc, CatalogError> {
    let lookup = |tag: &str| {
        by_tag
            .get(tag)
            .map(|ty| TypeDesc::from(Arc::clone(ty)))
            .ok_or_else(|| CatalogError::UnknownStruct {
                tag: tag.to_string(),
            })
    };
    let desc = match decl {
        Prim(kind) => TypeDesc::prim(kind),
        Array(kind, len) => TypeDesc::array(TypeDesc::prim(kind), len)?,
        Ptr(kind) => TypeDesc::ptr(TypeDesc::prim(kind)),
        Opaque(tag) => TypeDesc::opaque_ptr(tag),
        OpaqueTwice(tag) => TypeDesc::ptr(TypeDesc::opaque_ptr(tag)),
        Struct(tag) => lookup(tag)?,
        StructArray(tag, len) => TypeDesc::array(lookup(tag)?, len)?,
    };
    Ok(desc)
}

#[cfg(test)]
mod tests;
