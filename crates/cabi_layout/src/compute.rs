//! The layout algorithm.
//!
//! Fields are placed in declaration order. Each field is padded up to its
//! own alignment, the struct takes the largest member alignment (at least 1),
//! and the total size is padded up to that alignment so arrays of the struct
//! keep every element aligned:
//!
//! ```text
//! struct { char a; short b; int c; }     struct { int a; short b; char c; }
//!   a @0 (1)                               a @0 (4)
//!   .  1 byte hole                         b @4 (2)
//!   b @2 (2)                               c @6 (1)
//!   c @4 (4)                               .  1 byte tail padding
//!   size 8, align 4                        size 8, align 4
//! ```
//!
//! Nested structs recurse; the descriptor model guarantees a struct never
//! contains itself by value, so recursion depth is bounded by nesting depth.

use cabi_abi::{AbiProfile, EmptyStructRule};
use cabi_types::{StructType, TypeDesc};

use crate::layout::{FieldKind, FieldLayout, StructLayout, TypeLayout};
use crate::stack::ensure_sufficient_stack;

/// Lay out `ty` for `profile`.
///
/// Total over valid descriptors: every structural error was rejected when
/// the descriptor was built.
///
/// Sizes do not wrap. A struct whose bytes exceed `u64::MAX` gets size
/// `u64::MAX` rounded down to its alignment, and fields placed past that
/// point keep their clamped offsets, so their `end()` may exceed `size`.
/// A warning is logged when this happens.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(name = ty.name().unwrap_or("<anonymous>"), profile = %profile)
)]
pub fn compute_layout(ty: &StructType, profile: &AbiProfile) -> StructLayout {
    let mut fields = Vec::with_capacity(ty.fields().len());
    let shape = place_fields(ty, profile, |field, offset, layout| {
        tracing::trace!(
            field = field.name(),
            offset,
            size = layout.size,
            align = layout.alignment,
            "placed field"
        );
        fields.push(FieldLayout {
            name: field.name().to_string(),
            c_type: field.ty().to_string(),
            kind: field_kind(field.ty()),
            offset,
            size: layout.size,
            alignment: layout.alignment,
        });
    });
    tracing::debug!(size = shape.size, align = shape.alignment, "struct laid out");
    StructLayout::from_parts(
        ty.name().map(str::to_string),
        shape.size,
        shape.alignment,
        fields,
    )
}

/// Size and alignment of any descriptor.
pub fn type_layout(ty: &TypeDesc, profile: &AbiProfile) -> TypeLayout {
    match ty {
        TypeDesc::Primitive(kind) => TypeLayout::new(profile.size_of(*kind), profile.align_of(*kind)),
        // Pointee is never resolved; opaque and complete targets look the same.
        TypeDesc::Pointer(_) => TypeLayout::new(profile.pointer_size(), profile.pointer_align()),
        TypeDesc::Array(array) => {
            let element = type_layout(array.element(), profile);
            TypeLayout::new(element.size.saturating_mul(array.len()), element.alignment)
        }
        TypeDesc::Struct(inner) => {
            ensure_sufficient_stack(|| place_fields(inner, profile, |_, _, _| {}))
        }
    }
}

/// Walk the fields of `ty`, reporting each placement, and return the
/// struct's own size and alignment.
fn place_fields<F>(ty: &StructType, profile: &AbiProfile, mut on_field: F) -> TypeLayout
where
    F: FnMut(&cabi_types::Field, u64, TypeLayout),
{
    if ty.is_empty() {
        let size = match profile.empty_struct() {
            EmptyStructRule::ZeroSized => 0,
            EmptyStructRule::OneByte => 1,
        };
        return TypeLayout::new(size, 1);
    }

    let mut cursor: u64 = 0;
    let mut max_align: u64 = 1;
    for field in ty.fields() {
        let layout = type_layout(field.ty(), profile);
        cursor = round_up(cursor, layout.alignment);
        on_field(field, cursor, layout);
        cursor = cursor.checked_add(layout.size).unwrap_or_else(|| {
            tracing::warn!(field = field.name(), "struct size saturated at u64::MAX");
            u64::MAX
        });
        max_align = max_align.max(layout.alignment);
    }

    TypeLayout::new(round_up(cursor, max_align), max_align)
}

fn field_kind(ty: &TypeDesc) -> FieldKind {
    match ty {
        TypeDesc::Primitive(kind) => FieldKind::Scalar(*kind),
        TypeDesc::Pointer(_) => FieldKind::Pointer,
        TypeDesc::Array(array) => FieldKind::Array { len: array.len() },
        TypeDesc::Struct(_) => FieldKind::Struct,
    }
}

/// Round `value` up to a multiple of `align` (a power of two), saturating at
/// the largest representable multiple.
#[inline]
pub(crate) fn round_up(value: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two(), "alignment {align} is not a power of two");
    value
        .checked_next_multiple_of(align)
        .unwrap_or(u64::MAX & !(align - 1))
}
