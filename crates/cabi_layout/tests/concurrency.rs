//! Layouts computed from many threads at once must agree with a serial run.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use std::sync::Arc;

use cabi_layout::{
    compute_layout, AbiProfile, PrimitiveKind, StructLayout, StructType, TypeDesc,
};
use pretty_assertions::assert_eq;
use rayon::prelude::*;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn shared_types_are_send_and_sync() {
    assert_send_sync::<AbiProfile>();
    assert_send_sync::<StructType>();
    assert_send_sync::<TypeDesc>();
    assert_send_sync::<StructLayout>();
}

/// A family of structs that share nested definitions through `Arc`.
fn corpus() -> Vec<Arc<StructType>> {
    let point = StructType::new(
        "point",
        [
            ("x", TypeDesc::prim(PrimitiveKind::Double)),
            ("y", TypeDesc::prim(PrimitiveKind::Double)),
        ],
    )
    .unwrap();

    (0..64)
        .map(|i| {
            StructType::new(
                format!("shape{i}"),
                [
                    ("tag", TypeDesc::prim(PrimitiveKind::Char)),
                    (
                        "points",
                        TypeDesc::array(TypeDesc::from(Arc::clone(&point)), i % 5).unwrap(),
                    ),
                    ("count", TypeDesc::prim(PrimitiveKind::Short)),
                    ("next", TypeDesc::opaque_ptr(format!("shape{i}"))),
                ],
            )
            .unwrap()
        })
        .collect()
}

#[test]
fn parallel_layouts_match_serial_layouts() {
    cabi_layout::init_tracing();
    let corpus = corpus();
    let profiles = AbiProfile::builtin();

    let serial: Vec<StructLayout> = profiles
        .iter()
        .flat_map(|profile| corpus.iter().map(move |ty| compute_layout(ty, profile)))
        .collect();

    let parallel: Vec<StructLayout> = profiles
        .par_iter()
        .flat_map_iter(|profile| corpus.iter().map(move |ty| compute_layout(ty, profile)))
        .collect();

    assert_eq!(serial.len(), corpus.len() * profiles.len());
    assert_eq!(serial, parallel);
}

#[test]
fn same_struct_laid_out_concurrently() {
    let corpus = corpus();
    let ty = &corpus[3];
    let profile = AbiProfile::for_target("x86_64-unknown-linux-gnu").unwrap();
    let expected = compute_layout(ty, profile);

    let results: Vec<StructLayout> = (0..256)
        .into_par_iter()
        .map(|_| compute_layout(ty, profile))
        .collect();

    assert!(results.iter().all(|layout| *layout == expected));
    // char, pad to 8, three points of 16 bytes, short, pad to 8, pointer.
    assert_eq!(expected.offset_of("points"), Some(8));
    assert_eq!(expected.offset_of("count"), Some(56));
    assert_eq!(expected.offset_of("next"), Some(64));
    assert_eq!(expected.size(), 72);
}
