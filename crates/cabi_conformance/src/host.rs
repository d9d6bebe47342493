//! Host ground truth.
//!
//! Each fixture is mirrored as a `#[repr(C)]` Rust struct, which rustc lays
//! out exactly as the platform C compiler would. The mirrors are never
//! constructed; only their size, alignment, and field offsets are read.

#![allow(dead_code, reason = "layout mirrors are measured, never constructed")]

use std::ffi::{c_char, c_double, c_float, c_int, c_short, c_uchar, c_uint, c_ushort, c_void};
use std::mem::{align_of, offset_of, size_of};

use rustc_hash::FxHashMap;

use crate::catalog::Reference;

fn width(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Measure a mirror: `measure!(Test1 { a, b, c })`.
macro_rules! measure {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        Reference {
            size: width(size_of::<$ty>()),
            alignment: width(align_of::<$ty>()),
            offsets: vec![$((stringify!($field).to_string(), width(offset_of!($ty, $field)))),*],
        }
    };
}

#[repr(C)]
struct Test1 {
    a: c_int,
    b: c_int,
    c: c_double,
}

#[repr(C)]
struct Test2 {
    a: c_int,
    b: c_double,
    c: c_int,
}

#[repr(C)]
struct Test3 {
    a: c_double,
    b: c_int,
    c: c_int,
}

#[repr(C)]
struct Test4 {
    a: c_double,
    b: c_double,
    c: c_int,
}

#[repr(C)]
struct Test5 {
    a: c_int,
    b: c_double,
    c: c_double,
}

#[repr(C)]
struct Test6 {
    a: c_char,
    b: c_short,
    c: c_int,
}

#[repr(C)]
struct Test7 {
    a: c_int,
    b: c_short,
    c: c_char,
}

#[repr(C)]
struct Test8 {
    a: c_int,
    b: c_short,
    c: c_char,
    d: c_char,
}

#[repr(C)]
struct Test9 {
    a: c_int,
    b: c_short,
    c: c_char,
    d: c_char,
    e: c_char,
}

#[repr(C)]
struct Test10 {
    a: Test1,
    b: c_char,
}

#[repr(C)]
struct Test11 {
    a: usize,
    b: c_ushort,
    c: c_ushort,
    d: *mut *mut Test11,
}

#[repr(C)]
struct Test12 {
    a: *mut c_char,
    b: c_int,
}

#[repr(C)]
struct Test13 {
    a: c_char,
    b: [c_char; 2],
}

#[repr(C)]
struct Test14 {
    a: c_char,
    b: [c_char; 2],
    c: c_short,
    d: c_char,
}

#[repr(C)]
struct Test15 {
    a: Test1,
    b: Test1,
}

#[repr(C)]
struct Test16 {
    a: [c_double; 10],
    b: [c_char; 3],
    c: [c_int; 6],
}

#[repr(C)]
struct Test17 {
    a: [c_char; 3],
}

#[repr(C)]
struct Test18 {
    a: [Test17; 100],
}

const STRING_LENGTH: usize = 256;

#[repr(C)]
struct Test19 {
    has_meta_data: bool,
    playable: bool,
    geo_restricted: bool,
    track_id: [c_uchar; 33],
    file_id: [c_uchar; 41],
    file_bitrate: c_uint,
    album_id: [c_uchar; 33],
    cover_id: [c_uchar; 41],
    key: *mut c_uchar,
    allowed: *mut c_char,
    forbidden: *mut c_char,
    title: [c_char; STRING_LENGTH],
    artist: *mut c_void,
    album: [c_char; STRING_LENGTH],
    length: c_int,
    tracknumber: c_int,
    year: c_int,
    popularity: c_float,
    next: *mut Test19,
}

/// Host references keyed by fixture name.
pub(crate) fn references() -> FxHashMap<&'static str, Reference> {
    let mut map = FxHashMap::default();
    map.insert("test1", measure!(Test1 { a, b, c }));
    map.insert("test2", measure!(Test2 { a, b, c }));
    map.insert("test3", measure!(Test3 { a, b, c }));
    map.insert("test4", measure!(Test4 { a, b, c }));
    map.insert("test5", measure!(Test5 { a, b, c }));
    map.insert("test6", measure!(Test6 { a, b, c }));
    map.insert("test7", measure!(Test7 { a, b, c }));
    map.insert("test8", measure!(Test8 { a, b, c, d }));
    map.insert("test9", measure!(Test9 { a, b, c, d, e }));
    map.insert("test10", measure!(Test10 { a, b }));
    map.insert("test11", measure!(Test11 { a, b, c, d }));
    map.insert("test12", measure!(Test12 { a, b }));
    map.insert("test13", measure!(Test13 { a, b }));
    map.insert("test14", measure!(Test14 { a, b, c, d }));
    map.insert("test15", measure!(Test15 { a, b }));
    map.insert("test16", measure!(Test16 { a, b, c }));
    map.insert("test17", measure!(Test17 { a }));
    map.insert("test18", measure!(Test18 { a }));
    map.insert(
        "test19",
        measure!(Test19 {
            has_meta_data,
            playable,
            geo_restricted,
            track_id,
            file_id,
            file_bitrate,
            album_id,
            cover_id,
            key,
            allowed,
            forbidden,
            title,
            artist,
            album,
            length,
            tracknumber,
            year,
            popularity,
            next,
        }),
    );
    map
}
