#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;

use cabi_types::TypeDesc;

use super::*;

fn profile(triple: &str) -> &'static AbiProfile {
    AbiProfile::for_target(triple).unwrap()
}

/// `struct pwd { char* username; int salt; short flags; unsigned char tag; bool ok; }`
fn pwd() -> Arc<StructType> {
    StructType::new(
        "pwd",
        [
            ("username", TypeDesc::ptr(TypeDesc::prim(PrimitiveKind::Char))),
            ("salt", TypeDesc::prim(PrimitiveKind::Int)),
            ("flags", TypeDesc::prim(PrimitiveKind::Short)),
            ("tag", TypeDesc::prim(PrimitiveKind::UChar)),
            ("ok", TypeDesc::prim(PrimitiveKind::Bool)),
        ],
    )
    .unwrap()
}

#[test]
fn write_then_read_little_endian() {
    let ty = pwd();
    let p = profile("x86_64-unknown-linux-gnu");
    let mut buf = vec![0u8; 16];
    {
        let mut view = StructViewMut::new(&ty, p, &mut buf).unwrap();
        view.write("username", Scalar::Pointer(0xdead_beef)).unwrap();
        view.write("salt", Scalar::Int(-820_088)).unwrap();
        view.write("flags", Scalar::UInt(0x0102)).unwrap();
        view.write("tag", Scalar::UInt(200)).unwrap();
        view.write("ok", Scalar::Bool(true)).unwrap();

        assert_eq!(view.read("salt").unwrap(), Scalar::Int(-820_088));
        assert_eq!(view.as_view().read("ok").unwrap(), Scalar::Bool(true));
    }

    // flags @12, little endian.
    assert_eq!(&buf[12..14], &[0x02, 0x01]);
    assert_eq!(buf[14], 200);
    assert_eq!(buf[15], 1);

    let view = StructView::new(&ty, p, &buf).unwrap();
    assert_eq!(view.read("username").unwrap(), Scalar::Pointer(0xdead_beef));
    assert_eq!(view.read("flags").unwrap(), Scalar::Int(0x0102));
    assert_eq!(view.read("tag").unwrap(), Scalar::UInt(200));
}

#[test]
fn big_endian_target_stores_most_significant_byte_first() {
    let ty = StructType::new("be", [("x", TypeDesc::prim(PrimitiveKind::U32))]).unwrap();
    let mut buf = [0u8; 4];
    let mut view = StructViewMut::new(&ty, profile("powerpc64-unknown-linux-gnu"), &mut buf).unwrap();
    view.write("x", Scalar::UInt(0x0A0B_0C0D)).unwrap();
    assert_eq!(buf, [0x0A, 0x0B, 0x0C, 0x0D]);
}

#[test]
fn plain_char_signedness_follows_target() {
    let ty = StructType::new("c", [("c", TypeDesc::prim(PrimitiveKind::Char))]).unwrap();
    let buf = [0xFFu8];

    let x86 = StructView::new(&ty, profile("x86_64-unknown-linux-gnu"), &buf).unwrap();
    assert_eq!(x86.read("c").unwrap(), Scalar::Int(-1));

    let arm = StructView::new(&ty, profile("aarch64-unknown-linux-gnu"), &buf).unwrap();
    assert_eq!(arm.read("c").unwrap(), Scalar::UInt(255));
}

#[test]
fn floats_round_trip() {
    let ty = StructType::new(
        "f",
        [
            ("single", TypeDesc::prim(PrimitiveKind::Float)),
            ("double", TypeDesc::prim(PrimitiveKind::Double)),
        ],
    )
    .unwrap();
    let mut buf = [0u8; 16];
    let mut view = StructViewMut::new(&ty, profile("x86_64-unknown-linux-gnu"), &mut buf).unwrap();
    view.write("single", Scalar::Float(1.5)).unwrap();
    view.write("double", Scalar::Float(-0.25)).unwrap();
    assert_eq!(view.read("single").unwrap(), Scalar::Float(1.5));
    assert_eq!(view.read("double").unwrap(), Scalar::Float(-0.25));
}

#[test]
fn buffer_too_small() {
    let ty = pwd();
    let buf = [0u8; 15];
    let err = StructView::new(&ty, profile("x86_64-unknown-linux-gnu"), &buf).err().unwrap();
    assert_eq!(
        err,
        LayoutError::BufferTooSmall {
            owner: "struct `pwd`".to_string(),
            required: 16,
            actual: 15,
        }
    );
}

#[test]
fn unknown_field() {
    let ty = pwd();
    let buf = [0u8; 16];
    let view = StructView::new(&ty, profile("x86_64-unknown-linux-gnu"), &buf).unwrap();
    let err = view.read("password").unwrap_err();
    assert!(matches!(err, LayoutError::UnknownField { ref field, .. } if field == "password"));
}

#[test]
fn out_of_range_and_mismatched_values() {
    let ty = pwd();
    let mut buf = [0u8; 16];
    let mut view = StructViewMut::new(&ty, profile("x86_64-unknown-linux-gnu"), &mut buf).unwrap();

    let err = view.write("flags", Scalar::Int(40_000)).unwrap_err();
    assert!(matches!(err, LayoutError::ValueOutOfRange { .. }));

    let err = view.write("tag", Scalar::Int(-1)).unwrap_err();
    assert!(matches!(err, LayoutError::ValueOutOfRange { .. }));

    let err = view.write("ok", Scalar::UInt(1)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "field `ok` of type `bool` cannot hold a unsigned integer value"
    );

    let err = view.write("salt", Scalar::Float(1.0)).unwrap_err();
    assert!(matches!(err, LayoutError::ScalarMismatch { .. }));

    // Nothing was written by the failed calls.
    assert_eq!(buf, [0u8; 16]);
}

#[test]
fn pointer_width_is_enforced() {
    let ty = pwd();
    let mut buf = [0u8; 12];
    let mut view = StructViewMut::new(&ty, profile("i686-pc-windows-msvc"), &mut buf).unwrap();
    assert!(view.write("username", Scalar::Pointer(0xFFFF_FFFF)).is_ok());
    let err = view.write("username", Scalar::Pointer(0x1_0000_0000)).unwrap_err();
    assert!(matches!(err, LayoutError::ValueOutOfRange { .. }));
}

#[test]
fn arrays_and_nested_structs() {
    let inner = StructType::new(
        "inner",
        [
            ("x", TypeDesc::prim(PrimitiveKind::Short)),
            ("y", TypeDesc::prim(PrimitiveKind::Short)),
        ],
    )
    .unwrap();
    let outer = StructType::new(
        "outer",
        [
            ("name", TypeDesc::array(TypeDesc::prim(PrimitiveKind::Char), 3).unwrap()),
            ("pos", TypeDesc::from(inner)),
        ],
    )
    .unwrap();
    let p = profile("x86_64-unknown-linux-gnu");
    let mut buf = [0u8; 8];
    {
        let mut view = StructViewMut::new(&outer, p, &mut buf).unwrap();
        view.bytes_mut("name").unwrap().copy_from_slice(b"abc");
        let mut pos = view.nested_mut("pos").unwrap();
        pos.write("y", Scalar::Int(-2)).unwrap();

        let err = view.read("name").unwrap_err();
        assert!(matches!(err, LayoutError::NotAScalar { .. }));
        let err = view.nested_mut("name").err().unwrap();
        assert!(matches!(err, LayoutError::NotAStruct { .. }));
    }

    let view = StructView::new(&outer, p, &buf).unwrap();
    assert_eq!(view.bytes("name").unwrap(), b"abc");
    assert_eq!(view.layout().offset_of("pos"), Some(4));
    let pos = view.nested("pos").unwrap();
    assert_eq!(pos.read("x").unwrap(), Scalar::Int(0));
    assert_eq!(pos.read("y").unwrap(), Scalar::Int(-2));
}

#[test]
fn long_double_is_not_readable() {
    let ty = StructType::new("ld", [("v", TypeDesc::prim(PrimitiveKind::LongDouble))]).unwrap();
    let buf = [0u8; 16];
    let view = StructView::new(&ty, profile("x86_64-unknown-linux-gnu"), &buf).unwrap();
    assert!(matches!(view.read("v"), Err(LayoutError::NotAScalar { .. })));

    // On MSVC it is a plain double.
    let buf = [0u8; 8];
    let view = StructView::new(&ty, profile("x86_64-pc-windows-msvc"), &buf).unwrap();
    assert_eq!(view.read("v").unwrap(), Scalar::Float(0.0));
}

#[test]
fn sign_extension_helpers() {
    assert_eq!(sign_extend(0xFF, 1), -1);
    assert_eq!(sign_extend(0x7F, 1), 127);
    assert_eq!(sign_extend(0x8000, 2), -32768);
    assert!(fits_signed(-128, 1));
    assert!(!fits_signed(128, 1));
    assert!(fits_unsigned(255, 1));
    assert!(!fits_unsigned(256, 1));
    assert!(fits_unsigned(u64::MAX, 8));
}

#[test]
fn zero_width_scalars_hold_only_zero() {
    assert_eq!(sign_extend(0, 0), 0);
    assert!(fits_signed(0, 0));
    assert!(!fits_signed(-1, 0));
    assert!(!fits_signed(1, 0));
    assert!(fits_unsigned(0, 0));
    assert!(!fits_unsigned(1, 0));
}
