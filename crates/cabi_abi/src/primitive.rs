//! C primitive kinds.
//!
//! Every scalar a C struct field can hold maps to one [`PrimitiveKind`].
//! Kinds that always share a size and alignment on a given target (for
//! example `int` and `unsigned int`) resolve to the same [`PrimitiveClass`],
//! so a profile only stores one entry per class.

use std::fmt;

/// A C scalar type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    /// `_Bool` / `bool`
    Bool,
    /// `char` (signedness is target-defined)
    Char,
    SChar,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    LongDouble,
    /// `size_t`
    SizeT,
    /// `ptrdiff_t`
    PtrDiffT,
    /// `wchar_t`
    WCharT,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

/// Layout class shared by primitive kinds that are laid out identically.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PrimitiveClass {
    Bool,
    Char,
    Short,
    Int,
    Long,
    LongLong,
    Float,
    Double,
    LongDouble,
    Size,
    WChar,
}

impl PrimitiveClass {
    pub(crate) const COUNT: usize = 11;

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl PrimitiveKind {
    /// Every primitive kind, in declaration order.
    pub const ALL: [PrimitiveKind; 26] = [
        Self::Bool,
        Self::Char,
        Self::SChar,
        Self::UChar,
        Self::Short,
        Self::UShort,
        Self::Int,
        Self::UInt,
        Self::Long,
        Self::ULong,
        Self::LongLong,
        Self::ULongLong,
        Self::Float,
        Self::Double,
        Self::LongDouble,
        Self::SizeT,
        Self::PtrDiffT,
        Self::WCharT,
        Self::I8,
        Self::U8,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::I64,
        Self::U64,
    ];

    /// The spelling of this kind in a C declaration.
    pub const fn c_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::SChar => "signed char",
            Self::UChar => "unsigned char",
            Self::Short => "short",
            Self::UShort => "unsigned short",
            Self::Int => "int",
            Self::UInt => "unsigned int",
            Self::Long => "long",
            Self::ULong => "unsigned long",
            Self::LongLong => "long long",
            Self::ULongLong => "unsigned long long",
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long double",
            Self::SizeT => "size_t",
            Self::PtrDiffT => "ptrdiff_t",
            Self::WCharT => "wchar_t",
            Self::I8 => "int8_t",
            Self::U8 => "uint8_t",
            Self::I16 => "int16_t",
            Self::U16 => "uint16_t",
            Self::I32 => "int32_t",
            Self::U32 => "uint32_t",
            Self::I64 => "int64_t",
            Self::U64 => "uint64_t",
        }
    }

    /// Look a kind up by its C spelling (`"unsigned short"`, `"int64_t"`, ...).
    pub fn from_c_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.c_name() == name)
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double | Self::LongDouble)
    }

    pub const fn is_integer(self) -> bool {
        !self.is_float() && !matches!(self, Self::Bool)
    }

    /// Whether the integer kind is signed.
    ///
    /// Returns `None` for plain `char` and `wchar_t`, whose signedness
    /// depends on the target. Floats and `bool` report `None` as well.
    pub const fn is_signed(self) -> Option<bool> {
        match self {
            Self::SChar
            | Self::Short
            | Self::Int
            | Self::Long
            | Self::LongLong
            | Self::PtrDiffT
            | Self::I8
            | Self::I16
            | Self::I32
            | Self::I64 => Some(true),
            Self::UChar
            | Self::UShort
            | Self::UInt
            | Self::ULong
            | Self::ULongLong
            | Self::SizeT
            | Self::U8
            | Self::U16
            | Self::U32
            | Self::U64 => Some(false),
            Self::Bool
            | Self::Char
            | Self::WCharT
            | Self::Float
            | Self::Double
            | Self::LongDouble => None,
        }
    }

    pub(crate) const fn class(self) -> PrimitiveClass {
        match self {
            Self::Bool => PrimitiveClass::Bool,
            Self::Char | Self::SChar | Self::UChar | Self::I8 | Self::U8 => PrimitiveClass::Char,
            Self::Short | Self::UShort | Self::I16 | Self::U16 => PrimitiveClass::Short,
            Self::Int | Self::UInt | Self::I32 | Self::U32 => PrimitiveClass::Int,
            Self::Long | Self::ULong => PrimitiveClass::Long,
            Self::LongLong | Self::ULongLong | Self::I64 | Self::U64 => PrimitiveClass::LongLong,
            Self::Float => PrimitiveClass::Float,
            Self::Double => PrimitiveClass::Double,
            Self::LongDouble => PrimitiveClass::LongDouble,
            Self::SizeT | Self::PtrDiffT => PrimitiveClass::Size,
            Self::WCharT => PrimitiveClass::WChar,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}
