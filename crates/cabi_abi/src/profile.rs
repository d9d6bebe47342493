//! ABI profiles.
//!
//! An [`AbiProfile`] is a pure lookup table: the size and alignment of each
//! C primitive on one target, plus the pointer width, byte order, and the
//! target's convention for structs without members. Built-in profiles are
//! `static` data looked up by triple with [`AbiProfile::for_target`].
//!
//! # Sources
//!
//! The tables follow the platform ABI documents: System V i386/x86-64 psABI,
//! AAPCS/AAPCS64, the ELFv1 `PowerPC64` ABI, Apple's arm64 deviations
//! (`long double` is `double`), the Microsoft x86/x64 conventions, and the
//! `WebAssembly` C ABI (`wasm32` is ILP32 with 16-byte `long double`).

use std::borrow::Cow;
use std::fmt;

use crate::primitive::{PrimitiveClass, PrimitiveKind};
use crate::target::{TargetError, TargetTriple, SUPPORTED_TARGETS};

/// Size and alignment of one scalar, in bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarLayout {
    pub size: u64,
    pub align: u64,
}

impl ScalarLayout {
    #[inline]
    pub const fn new(size: u64, align: u64) -> Self {
        Self { size, align }
    }
}

/// Byte order used when reading or writing scalars in native memory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    Little,
    Big,
}

/// How a struct with no members is laid out.
///
/// GCC and Clang accept empty structs in C as an extension and give them
/// size 0. MSVC rejects them in C and gives them size 1 in C++, so a
/// Windows/MSVC consumer expects one byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmptyStructRule {
    /// `size = 0`, `alignment = 1`.
    #[default]
    ZeroSized,
    /// `size = 1`, `alignment = 1`.
    OneByte,
}

/// Primitive layout table for one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbiProfile {
    name: Cow<'static, str>,
    primitives: [ScalarLayout; PrimitiveClass::COUNT],
    pointer: ScalarLayout,
    byte_order: ByteOrder,
    char_signed: bool,
    empty_struct: EmptyStructRule,
}

impl AbiProfile {
    /// Look up the built-in profile for a target triple.
    pub fn for_target(triple: &str) -> Result<&'static AbiProfile, TargetError> {
        TargetTriple::parse(triple)?;
        match BUILTIN_PROFILES.iter().find(|profile| profile.name == triple) {
            Some(profile) => Ok(profile),
            None => {
                tracing::debug!(triple, "no ABI profile registered for target");
                Err(TargetError::UnsupportedTarget {
                    triple: triple.to_string(),
                    supported: SUPPORTED_TARGETS.to_vec(),
                })
            }
        }
    }

    /// The profile for the target this crate was compiled for.
    pub fn host() -> Result<&'static AbiProfile, TargetError> {
        match crate::target::host_triple() {
            Some(triple) => Self::for_target(triple),
            None => Err(TargetError::UnsupportedTarget {
                triple: "<host>".to_string(),
                supported: SUPPORTED_TARGETS.to_vec(),
            }),
        }
    }

    /// All built-in profiles, in [`SUPPORTED_TARGETS`] order.
    pub fn builtin() -> &'static [AbiProfile] {
        BUILTIN_PROFILES
    }

    /// Start a custom profile from a copy of `base`.
    pub fn builder(name: impl Into<Cow<'static, str>>, base: &AbiProfile) -> ProfileBuilder {
        ProfileBuilder {
            profile: AbiProfile {
                name: name.into(),
                ..base.clone()
            },
        }
    }

    /// Triple for built-in profiles, caller-chosen name for custom ones.
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn size_of(&self, kind: PrimitiveKind) -> u64 {
        self.primitives[kind.class().index()].size
    }

    #[inline]
    pub fn align_of(&self, kind: PrimitiveKind) -> u64 {
        self.primitives[kind.class().index()].align
    }

    #[inline]
    pub fn scalar(&self, kind: PrimitiveKind) -> ScalarLayout {
        self.primitives[kind.class().index()]
    }

    #[inline]
    pub fn pointer_size(&self) -> u64 {
        self.pointer.size
    }

    #[inline]
    pub fn pointer_align(&self) -> u64 {
        self.pointer.align
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Whether plain `char` (and `wchar_t` on Unix) is signed.
    pub fn char_is_signed(&self) -> bool {
        self.char_signed
    }

    pub fn empty_struct(&self) -> EmptyStructRule {
        self.empty_struct
    }

    /// A copy of this profile using a different zero-member struct rule.
    #[must_use]
    pub fn with_empty_struct(&self, rule: EmptyStructRule) -> AbiProfile {
        AbiProfile {
            empty_struct: rule,
            ..self.clone()
        }
    }
}

impl fmt::Display for AbiProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder for profiles outside the built-in registry.
#[derive(Clone, Debug)]
pub struct ProfileBuilder {
    profile: AbiProfile,
}

impl ProfileBuilder {
    /// Set the layout of `kind`.
    ///
    /// Kinds that share a layout class (`int`, `unsigned int`, `int32_t`)
    /// share the entry, so setting one sets all of them.
    #[must_use]
    pub fn primitive(mut self, kind: PrimitiveKind, size: u64, align: u64) -> Self {
        self.profile.primitives[kind.class().index()] = ScalarLayout::new(size, align);
        self
    }

    #[must_use]
    pub fn pointer(mut self, size: u64, align: u64) -> Self {
        self.profile.pointer = ScalarLayout::new(size, align);
        self
    }

    #[must_use]
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.profile.byte_order = order;
        self
    }

    #[must_use]
    pub fn char_signed(mut self, signed: bool) -> Self {
        self.profile.char_signed = signed;
        self
    }

    #[must_use]
    pub fn empty_struct(mut self, rule: EmptyStructRule) -> Self {
        self.profile.empty_struct = rule;
        self
    }

    /// Finish the profile.
    ///
    /// Every alignment must be a power of two and every size a non-zero
    /// multiple of its alignment, as C requires of `sizeof(T)`.
    pub fn build(self) -> Result<AbiProfile, TargetError> {
        for kind in PrimitiveKind::ALL {
            check_scalar(kind.c_name(), self.profile.scalar(kind))?;
        }
        check_scalar("pointer", self.profile.pointer)?;
        Ok(self.profile)
    }
}

fn check_scalar(subject: &'static str, layout: ScalarLayout) -> Result<(), TargetError> {
    let ScalarLayout { size, align } = layout;
    if !align.is_power_of_two() {
        return Err(TargetError::InvalidAlignment { subject, align });
    }
    if size == 0 || size % align != 0 {
        return Err(TargetError::InvalidSize {
            subject,
            size,
            align,
        });
    }
    Ok(())
}

// Built-in tables

/// Named-field form of a profile, so targets can be declared as deltas.
#[derive(Copy, Clone)]
struct Table {
    boolean: ScalarLayout,
    char: ScalarLayout,
    short: ScalarLayout,
    int: ScalarLayout,
    long: ScalarLayout,
    long_long: ScalarLayout,
    float: ScalarLayout,
    double: ScalarLayout,
    long_double: ScalarLayout,
    size: ScalarLayout,
    wchar: ScalarLayout,
    pointer: ScalarLayout,
    byte_order: ByteOrder,
    char_signed: bool,
    empty_struct: EmptyStructRule,
}

impl Table {
    const fn build(self, triple: &'static str) -> AbiProfile {
        AbiProfile {
            name: Cow::Borrowed(triple),
            // Indexed by `PrimitiveClass` discriminant.
            primitives: [
                self.boolean,
                self.char,
                self.short,
                self.int,
                self.long,
                self.long_long,
                self.float,
                self.double,
                self.long_double,
                self.size,
                self.wchar,
            ],
            pointer: self.pointer,
            byte_order: self.byte_order,
            char_signed: self.char_signed,
            empty_struct: self.empty_struct,
        }
    }
}

const fn s(size: u64, align: u64) -> ScalarLayout {
    ScalarLayout::new(size, align)
}

/// LP64 Unix (System V x86-64).
const LP64: Table = Table {
    boolean: s(1, 1),
    char: s(1, 1),
    short: s(2, 2),
    int: s(4, 4),
    long: s(8, 8),
    long_long: s(8, 8),
    float: s(4, 4),
    double: s(8, 8),
    long_double: s(16, 16),
    size: s(8, 8),
    wchar: s(4, 4),
    pointer: s(8, 8),
    byte_order: ByteOrder::Little,
    char_signed: true,
    empty_struct: EmptyStructRule::ZeroSized,
};

/// ILP32 Unix (System V i386). 8-byte scalars are only 4-aligned in structs.
const ILP32_I386: Table = Table {
    long: s(4, 4),
    long_long: s(8, 4),
    double: s(8, 4),
    long_double: s(12, 4),
    size: s(4, 4),
    pointer: s(4, 4),
    ..LP64
};

/// ILP32 AAPCS (32-bit ARM hard-float).
const ILP32_ARM: Table = Table {
    long: s(4, 4),
    long_double: s(8, 8),
    size: s(4, 4),
    pointer: s(4, 4),
    char_signed: false,
    ..LP64
};

/// LLP64 (Microsoft x64).
const LLP64_MSVC: Table = Table {
    long: s(4, 4),
    long_double: s(8, 8),
    wchar: s(2, 2),
    empty_struct: EmptyStructRule::OneByte,
    ..LP64
};

static BUILTIN_PROFILES: &[AbiProfile] = &[
    LP64.build("x86_64-unknown-linux-gnu"),
    Table {
        char_signed: false,
        ..LP64
    }
    .build("aarch64-unknown-linux-gnu"),
    ILP32_I386.build("i686-unknown-linux-gnu"),
    ILP32_ARM.build("armv7-unknown-linux-gnueabihf"),
    Table {
        byte_order: ByteOrder::Big,
        char_signed: false,
        ..LP64
    }
    .build("powerpc64-unknown-linux-gnu"),
    LP64.build("x86_64-apple-darwin"),
    Table {
        long_double: s(8, 8),
        ..LP64
    }
    .build("aarch64-apple-darwin"),
    LLP64_MSVC.build("x86_64-pc-windows-msvc"),
    Table {
        size: s(4, 4),
        pointer: s(4, 4),
        ..LLP64_MSVC
    }
    .build("i686-pc-windows-msvc"),
    Table {
        long_double: s(16, 16),
        empty_struct: EmptyStructRule::ZeroSized,
        ..LLP64_MSVC
    }
    .build("x86_64-pc-windows-gnu"),
    Table {
        long: s(4, 4),
        size: s(4, 4),
        pointer: s(4, 4),
        ..LP64
    }
    .build("wasm32-unknown-unknown"),
];

#[cfg(test)]
mod tests;
