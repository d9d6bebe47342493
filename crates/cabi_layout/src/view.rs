//! Reading and writing struct fields in native memory.
//!
//! A view pairs a struct definition with a byte buffer holding an instance
//! of it, as laid out for one target. Scalars are decoded at their computed
//! offsets in the target's byte order; arrays and nested structs are exposed
//! as raw bytes or as nested views.

use std::fmt;
use std::ops::Range;

use cabi_abi::{AbiProfile, ByteOrder, PrimitiveKind};
use cabi_types::StructType;

use crate::compute::compute_layout;
use crate::error::LayoutError;
use crate::layout::{FieldKind, FieldLayout, StructLayout};

/// A decoded field value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Raw address; the pointee is never dereferenced.
    Pointer(u64),
}

impl Scalar {
    fn kind_name(self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "signed integer",
            Scalar::UInt(_) => "unsigned integer",
            Scalar::Float(_) => "floating-point",
            Scalar::Pointer(_) => "pointer",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::UInt(u) => write!(f, "{u}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Pointer(p) => write!(f, "{p:#x}"),
        }
    }
}

/// Read-only view of a struct instance.
pub struct StructView<'a> {
    ty: &'a StructType,
    profile: &'a AbiProfile,
    layout: StructLayout,
    bytes: &'a [u8],
}

impl<'a> StructView<'a> {
    /// View `bytes` as an instance of `ty`. The buffer may be longer than
    /// the struct; trailing bytes are ignored.
    pub fn new(
        ty: &'a StructType,
        profile: &'a AbiProfile,
        bytes: &'a [u8],
    ) -> Result<Self, LayoutError> {
        let layout = compute_layout(ty, profile);
        check_len(&layout, bytes.len())?;
        Ok(Self {
            ty,
            profile,
            layout,
            bytes,
        })
    }

    pub fn layout(&self) -> &StructLayout {
        &self.layout
    }

    /// Decode a scalar or pointer field.
    pub fn read(&self, field: &str) -> Result<Scalar, LayoutError> {
        let (field, range) = locate(&self.layout, field)?;
        decode(field, &self.bytes[range], self.profile)
    }

    /// Raw bytes of any field, arrays and nested structs included.
    pub fn bytes(&self, field: &str) -> Result<&'a [u8], LayoutError> {
        let (_, range) = locate(&self.layout, field)?;
        let bytes: &'a [u8] = self.bytes;
        Ok(&bytes[range])
    }

    /// View a nested struct field.
    pub fn nested(&self, field: &str) -> Result<StructView<'a>, LayoutError> {
        let (layout, range) = locate(&self.layout, field)?;
        let inner = nested_type(self.ty, layout)?;
        let bytes: &'a [u8] = self.bytes;
        StructView::new(inner, self.profile, &bytes[range])
    }
}

/// Mutable view of a struct instance.
pub struct StructViewMut<'a> {
    ty: &'a StructType,
    profile: &'a AbiProfile,
    layout: StructLayout,
    bytes: &'a mut [u8],
}

impl<'a> StructViewMut<'a> {
    pub fn new(
        ty: &'a StructType,
        profile: &'a AbiProfile,
        bytes: &'a mut [u8],
    ) -> Result<Self, LayoutError> {
        let layout = compute_layout(ty, profile);
        check_len(&layout, bytes.len())?;
        Ok(Self {
            ty,
            profile,
            layout,
            bytes,
        })
    }

    pub fn layout(&self) -> &StructLayout {
        &self.layout
    }

    pub fn read(&self, field: &str) -> Result<Scalar, LayoutError> {
        let (field, range) = locate(&self.layout, field)?;
        decode(field, &self.bytes[range], self.profile)
    }

    /// Encode `value` into a scalar or pointer field.
    ///
    /// Integers must fit the field's width and signedness; floats are
    /// narrowed to `float` when the field is 4 bytes.
    pub fn write(&mut self, field: &str, value: Scalar) -> Result<(), LayoutError> {
        let (field, range) = locate(&self.layout, field)?;
        encode(field, value, &mut self.bytes[range], self.profile)
    }

    pub fn bytes_mut(&mut self, field: &str) -> Result<&mut [u8], LayoutError> {
        let (_, range) = locate(&self.layout, field)?;
        Ok(&mut self.bytes[range])
    }

    /// Mutable view of a nested struct field.
    pub fn nested_mut(&mut self, field: &str) -> Result<StructViewMut<'_>, LayoutError> {
        let (layout, range) = locate(&self.layout, field)?;
        let inner = nested_type(self.ty, layout)?;
        StructViewMut::new(inner, self.profile, &mut self.bytes[range])
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> StructView<'_> {
        StructView {
            ty: self.ty,
            profile: self.profile,
            layout: self.layout.clone(),
            bytes: &*self.bytes,
        }
    }
}

fn check_len(layout: &StructLayout, actual: usize) -> Result<(), LayoutError> {
    let fits = usize::try_from(layout.size()).is_ok_and(|required| required <= actual);
    if fits {
        Ok(())
    } else {
        Err(LayoutError::BufferTooSmall {
            owner: layout.owner(),
            required: layout.size(),
            actual,
        })
    }
}

/// Find a field and its byte range. The range is in bounds: views check
/// the buffer against the struct size on construction.
fn locate<'l>(
    layout: &'l StructLayout,
    name: &str,
) -> Result<(&'l FieldLayout, Range<usize>), LayoutError> {
    let field = layout.field(name).ok_or_else(|| LayoutError::UnknownField {
        owner: layout.owner(),
        field: name.to_string(),
    })?;
    let start = usize::try_from(field.offset).unwrap_or(usize::MAX);
    let end = usize::try_from(field.end()).unwrap_or(usize::MAX);
    Ok((field, start..end))
}

fn nested_type<'t>(ty: &'t StructType, field: &FieldLayout) -> Result<&'t StructType, LayoutError> {
    ty.field(&field.name)
        .and_then(|decl| decl.ty().as_struct())
        .map(|inner| &**inner)
        .ok_or_else(|| LayoutError::NotAStruct {
            field: field.name.clone(),
            ty: field.c_type.clone(),
        })
}

/// How the bytes of a scalar field are interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Repr {
    Bool,
    Signed,
    Unsigned,
    Float,
    Pointer,
}

fn repr(field: &FieldLayout, profile: &AbiProfile) -> Result<Repr, LayoutError> {
    let not_scalar = || LayoutError::NotAScalar {
        field: field.name.clone(),
        ty: field.c_type.clone(),
    };
    match field.kind {
        FieldKind::Pointer => Ok(Repr::Pointer),
        FieldKind::Scalar(PrimitiveKind::Bool) => Ok(Repr::Bool),
        // Extended-precision formats have no native Rust counterpart.
        FieldKind::Scalar(kind) if kind.is_float() => match field.size {
            4 | 8 => Ok(Repr::Float),
            _ => Err(not_scalar()),
        },
        FieldKind::Scalar(kind) => {
            let signed = match kind.is_signed() {
                Some(signed) => signed,
                // 16-bit wchar_t is always unsigned (Windows).
                None if kind == PrimitiveKind::WCharT && field.size == 2 => false,
                None => profile.char_is_signed(),
            };
            Ok(if signed { Repr::Signed } else { Repr::Unsigned })
        }
        FieldKind::Array { .. } | FieldKind::Struct => Err(not_scalar()),
    }
}

fn decode(field: &FieldLayout, bytes: &[u8], profile: &AbiProfile) -> Result<Scalar, LayoutError> {
    let repr = repr(field, profile)?;
    if bytes.len() > 8 {
        return Err(LayoutError::NotAScalar {
            field: field.name.clone(),
            ty: field.c_type.clone(),
        });
    }
    let raw = load(bytes, profile.byte_order());
    let value = match repr {
        Repr::Bool => Scalar::Bool(raw != 0),
        Repr::Unsigned => Scalar::UInt(raw),
        Repr::Pointer => Scalar::Pointer(raw),
        Repr::Signed => Scalar::Int(sign_extend(raw, bytes.len())),
        Repr::Float if bytes.len() == 4 => {
            Scalar::Float(f64::from(f32::from_bits(u32::try_from(raw).unwrap_or(0))))
        }
        Repr::Float => Scalar::Float(f64::from_bits(raw)),
    };
    Ok(value)
}

fn encode(
    field: &FieldLayout,
    value: Scalar,
    bytes: &mut [u8],
    profile: &AbiProfile,
) -> Result<(), LayoutError> {
    let repr = repr(field, profile)?;
    let width = bytes.len();
    if width > 8 {
        return Err(LayoutError::NotAScalar {
            field: field.name.clone(),
            ty: field.c_type.clone(),
        });
    }
    let mismatch = || LayoutError::ScalarMismatch {
        field: field.name.clone(),
        ty: field.c_type.clone(),
        found: value.kind_name(),
    };
    let out_of_range = || LayoutError::ValueOutOfRange {
        field: field.name.clone(),
        ty: field.c_type.clone(),
        value: value.to_string(),
    };

    let raw = match (repr, value) {
        (Repr::Bool, Scalar::Bool(b)) => u64::from(b),
        (Repr::Signed, Scalar::Int(i)) => {
            if !fits_signed(i, width) {
                return Err(out_of_range());
            }
            u64::from_ne_bytes(i.to_ne_bytes())
        }
        (Repr::Signed, Scalar::UInt(u)) => match i64::try_from(u) {
            Ok(i) if fits_signed(i, width) => u,
            _ => return Err(out_of_range()),
        },
        (Repr::Unsigned | Repr::Pointer, Scalar::UInt(u) | Scalar::Pointer(u)) => {
            if !fits_unsigned(u, width) {
                return Err(out_of_range());
            }
            u
        }
        (Repr::Unsigned | Repr::Pointer, Scalar::Int(i)) => match u64::try_from(i) {
            Ok(u) if fits_unsigned(u, width) => u,
            _ => return Err(out_of_range()),
        },
        (Repr::Float, Scalar::Float(x)) if width == 4 => {
            #[allow(clippy::cast_possible_truncation, reason = "narrowing to C float")]
            let narrowed = x as f32;
            u64::from(narrowed.to_bits())
        }
        (Repr::Float, Scalar::Float(x)) => x.to_bits(),
        _ => return Err(mismatch()),
    };
    store(raw, bytes, profile.byte_order());
    Ok(())
}

fn load(bytes: &[u8], order: ByteOrder) -> u64 {
    let mut buf = [0u8; 8];
    match order {
        ByteOrder::Little => {
            buf[..bytes.len()].copy_from_slice(bytes);
            u64::from_le_bytes(buf)
        }
        ByteOrder::Big => {
            buf[8 - bytes.len()..].copy_from_slice(bytes);
            u64::from_be_bytes(buf)
        }
    }
}

fn store(raw: u64, bytes: &mut [u8], order: ByteOrder) {
    let width = bytes.len();
    match order {
        ByteOrder::Little => bytes.copy_from_slice(&raw.to_le_bytes()[..width]),
        ByteOrder::Big => bytes.copy_from_slice(&raw.to_be_bytes()[8 - width..]),
    }
}

fn sign_extend(raw: u64, width: usize) -> i64 {
    let value = i64::from_ne_bytes(raw.to_ne_bytes());
    if width == 0 || width >= 8 {
        return value;
    }
    let shift = 64 - 8 * width;
    (value << shift) >> shift
}

fn fits_signed(value: i64, width: usize) -> bool {
    if width == 0 {
        return value == 0;
    }
    if width >= 8 {
        return true;
    }
    let bits = 8 * width;
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    (min..=max).contains(&value)
}

fn fits_unsigned(value: u64, width: usize) -> bool {
    match width {
        0 => value == 0,
        1..=7 => value < (1u64 << (8 * width)),
        _ => true,
    }
}

#[cfg(test)]
mod tests;
