#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::*;

fn profile(triple: &str) -> &'static AbiProfile {
    AbiProfile::for_target(triple).unwrap()
}

#[test]
fn every_supported_target_has_a_profile() {
    assert_eq!(AbiProfile::builtin().len(), SUPPORTED_TARGETS.len());
    for triple in SUPPORTED_TARGETS {
        assert_eq!(profile(triple).name(), *triple);
    }
}

#[test]
fn unknown_target_is_rejected() {
    let err = AbiProfile::for_target("sparc64-sun-solaris").unwrap_err();
    match err {
        TargetError::UnsupportedTarget { triple, supported } => {
            assert_eq!(triple, "sparc64-sun-solaris");
            assert_eq!(supported, SUPPORTED_TARGETS.to_vec());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_target_is_a_format_error() {
    let err = AbiProfile::for_target("linux").unwrap_err();
    assert!(matches!(err, TargetError::InvalidTripleFormat { .. }));
}

#[test]
fn lp64_linux_table() {
    let p = profile("x86_64-unknown-linux-gnu");
    assert_eq!(p.size_of(PrimitiveKind::Char), 1);
    assert_eq!(p.size_of(PrimitiveKind::Short), 2);
    assert_eq!(p.size_of(PrimitiveKind::Int), 4);
    assert_eq!(p.size_of(PrimitiveKind::Long), 8);
    assert_eq!(p.align_of(PrimitiveKind::Double), 8);
    assert_eq!(p.scalar(PrimitiveKind::LongDouble), ScalarLayout::new(16, 16));
    assert_eq!(p.pointer_size(), 8);
    assert_eq!(p.pointer_align(), 8);
    assert_eq!(p.byte_order(), ByteOrder::Little);
    assert_eq!(p.empty_struct(), EmptyStructRule::ZeroSized);
    assert!(p.char_is_signed());
}

#[test]
fn i386_linux_underaligns_eight_byte_scalars() {
    let p = profile("i686-unknown-linux-gnu");
    assert_eq!(p.scalar(PrimitiveKind::Double), ScalarLayout::new(8, 4));
    assert_eq!(p.scalar(PrimitiveKind::LongLong), ScalarLayout::new(8, 4));
    assert_eq!(p.scalar(PrimitiveKind::U64), ScalarLayout::new(8, 4));
    assert_eq!(p.scalar(PrimitiveKind::LongDouble), ScalarLayout::new(12, 4));
    assert_eq!(p.pointer_size(), 4);
}

#[test]
fn msvc_targets() {
    let x64 = profile("x86_64-pc-windows-msvc");
    assert_eq!(x64.size_of(PrimitiveKind::Long), 4);
    assert_eq!(x64.size_of(PrimitiveKind::WCharT), 2);
    assert_eq!(x64.size_of(PrimitiveKind::LongDouble), 8);
    assert_eq!(x64.pointer_size(), 8);
    assert_eq!(x64.empty_struct(), EmptyStructRule::OneByte);

    let x86 = profile("i686-pc-windows-msvc");
    assert_eq!(x86.scalar(PrimitiveKind::Double), ScalarLayout::new(8, 8));
    assert_eq!(x86.pointer_size(), 4);
    assert_eq!(x86.size_of(PrimitiveKind::SizeT), 4);

    let gnu = profile("x86_64-pc-windows-gnu");
    assert_eq!(gnu.size_of(PrimitiveKind::Long), 4);
    assert_eq!(gnu.empty_struct(), EmptyStructRule::ZeroSized);
}

#[test]
fn apple_arm64_long_double_is_double() {
    let p = profile("aarch64-apple-darwin");
    assert_eq!(p.scalar(PrimitiveKind::LongDouble), p.scalar(PrimitiveKind::Double));
}

#[test]
fn powerpc64_is_big_endian() {
    let p = profile("powerpc64-unknown-linux-gnu");
    assert_eq!(p.byte_order(), ByteOrder::Big);
    assert!(!p.char_is_signed());
}

#[test]
fn with_empty_struct_only_changes_the_rule() {
    let base = profile("x86_64-unknown-linux-gnu");
    let derived = base.with_empty_struct(EmptyStructRule::OneByte);
    assert_eq!(derived.empty_struct(), EmptyStructRule::OneByte);
    assert_eq!(derived.name(), base.name());
    for kind in PrimitiveKind::ALL {
        assert_eq!(derived.scalar(kind), base.scalar(kind));
    }
}

#[test]
fn all_builtin_alignments_are_powers_of_two() {
    for p in AbiProfile::builtin() {
        for kind in PrimitiveKind::ALL {
            assert!(p.align_of(kind).is_power_of_two(), "{p}: {kind}");
            assert!(p.size_of(kind) >= p.align_of(kind) || kind == PrimitiveKind::LongDouble);
        }
        assert!(p.pointer_align().is_power_of_two(), "{p}");
    }
}

#[test]
fn builder_overrides_class() {
    let base = profile("x86_64-unknown-linux-gnu");
    let custom = AbiProfile::builder("packed-ints", base)
        .primitive(PrimitiveKind::UInt, 4, 2)
        .pointer(4, 4)
        .build()
        .unwrap();
    assert_eq!(custom.name(), "packed-ints");
    assert_eq!(custom.align_of(PrimitiveKind::Int), 2);
    assert_eq!(custom.align_of(PrimitiveKind::I32), 2);
    assert_eq!(custom.pointer_size(), 4);
}

#[test]
fn builder_rejects_non_power_of_two_alignment() {
    let base = profile("x86_64-unknown-linux-gnu");
    let err = AbiProfile::builder("broken", base)
        .primitive(PrimitiveKind::Double, 8, 6)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        TargetError::InvalidAlignment {
            subject: "double",
            align: 6
        }
    );

    let err = AbiProfile::builder("broken", base).pointer(8, 0).build().unwrap_err();
    assert!(matches!(err, TargetError::InvalidAlignment { subject: "pointer", .. }));
}

#[test]
fn builder_rejects_zero_sizes() {
    let base = profile("x86_64-unknown-linux-gnu");
    let err = AbiProfile::builder("zero", base)
        .primitive(PrimitiveKind::Int, 0, 1)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        TargetError::InvalidSize {
            subject: "int",
            size: 0,
            align: 1
        }
    );

    let err = AbiProfile::builder("zero", base).pointer(0, 8).build().unwrap_err();
    assert!(matches!(err, TargetError::InvalidSize { subject: "pointer", size: 0, .. }));
}

#[test]
fn builder_rejects_sizes_that_break_array_stride() {
    let base = profile("x86_64-unknown-linux-gnu");
    let err = AbiProfile::builder("odd", base)
        .primitive(PrimitiveKind::Int, 3, 4)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        TargetError::InvalidSize {
            subject: "int",
            size: 3,
            align: 4
        }
    );
    assert_eq!(
        err.to_string(),
        "invalid size 3 for `int`: size must be a non-zero multiple of its alignment 4"
    );

    // i386 long double: 12 bytes, 4-aligned.
    let ok = AbiProfile::builder("x87", base)
        .primitive(PrimitiveKind::LongDouble, 12, 4)
        .build()
        .unwrap();
    assert_eq!(ok.size_of(PrimitiveKind::LongDouble), 12);
}

#[test]
fn builtin_profiles_pass_builder_validation() {
    for p in AbiProfile::builtin() {
        assert!(AbiProfile::builder(p.name().to_string(), p).build().is_ok(), "{p}");
    }
}
