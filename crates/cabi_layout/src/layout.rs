//! Computed layouts.

use std::fmt;

use cabi_abi::PrimitiveKind;
use rustc_hash::FxHashMap;

/// Size and alignment of any type, in bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeLayout {
    pub size: u64,
    pub alignment: u64,
}

impl TypeLayout {
    #[inline]
    pub const fn new(size: u64, alignment: u64) -> Self {
        Self { size, alignment }
    }
}

/// Coarse shape of a field, enough to decide how its bytes can be accessed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKind {
    Scalar(PrimitiveKind),
    Pointer,
    Array { len: u64 },
    Struct,
}

/// Placement of one field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldLayout {
    pub name: String,
    /// C spelling of the field type, e.g. `unsigned char[33]`.
    pub c_type: String,
    pub kind: FieldKind,
    pub offset: u64,
    pub size: u64,
    pub alignment: u64,
}

impl FieldLayout {
    /// One past the last byte of the field.
    #[inline]
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }
}

/// Size, alignment, and field offsets of one struct on one target.
///
/// Derived data: recompute it rather than patching it. Field lookup by name
/// is O(1); iteration follows declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawStructLayout", into = "RawStructLayout")
)]
pub struct StructLayout {
    name: Option<String>,
    size: u64,
    alignment: u64,
    fields: Vec<FieldLayout>,
    index: FxHashMap<String, usize>,
}

impl StructLayout {
    pub(crate) fn from_parts(
        name: Option<String>,
        size: u64,
        alignment: u64,
        fields: Vec<FieldLayout>,
    ) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.name.clone(), i))
            .collect();
        Self {
            name,
            size,
            alignment,
            fields,
            index,
        }
    }

    /// Tag of the struct this layout was computed for.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// `sizeof`, including tail padding.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// `alignof`; always a power of two.
    #[inline]
    pub fn alignment(&self) -> u64 {
        self.alignment
    }

    pub fn type_layout(&self) -> TypeLayout {
        TypeLayout::new(self.size, self.alignment)
    }

    /// `offsetof(struct, name)`.
    pub fn offset_of(&self, name: &str) -> Option<u64> {
        self.field(name).map(|field| field.offset)
    }

    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldLayout] {
        &self.fields
    }

    /// Total interior and tail padding, in bytes.
    ///
    /// Zero for a saturated layout whose fields add up past `u64::MAX`.
    pub fn padding(&self) -> u64 {
        let used = self
            .fields
            .iter()
            .fold(0u64, |used, field| used.saturating_add(field.size));
        self.size.saturating_sub(used)
    }

    /// Named numeric properties in the form a host binding exposes them:
    /// `"<name> sizeof"`, `"<name> alignof"`, then `"<name> offsetof <field>"`
    /// for each field in declaration order.
    pub fn properties<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (String, u64)> + 'a {
        [
            (format!("{name} sizeof"), self.size),
            (format!("{name} alignof"), self.alignment),
        ]
        .into_iter()
        .chain(
            self.fields
                .iter()
                .map(move |field| (format!("{name} offsetof {}", field.name), field.offset)),
        )
    }

    pub(crate) fn owner(&self) -> String {
        match &self.name {
            Some(tag) => format!("struct `{tag}`"),
            None => "anonymous struct".to_string(),
        }
    }
}

impl fmt::Display for StructLayout {
    /// A `pahole`-style dump: one line per field with offset and size,
    /// padding holes called out, totals at the end.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(tag) => writeln!(f, "struct {tag} {{")?,
            None => writeln!(f, "struct {{")?,
        }
        let mut cursor = 0;
        for field in &self.fields {
            if field.offset > cursor {
                write_hole(f, field.offset - cursor)?;
            }
            writeln!(
                f,
                "    {:<24} {:<20} /* {:>6} {:>6} */",
                field.c_type, field.name, field.offset, field.size
            )?;
            cursor = cursor.max(field.end());
        }
        let tail = self.size.saturating_sub(cursor);
        writeln!(f)?;
        writeln!(
            f,
            "    /* size: {}, alignment: {}, tail padding: {} */",
            self.size, self.alignment, tail
        )?;
        write!(f, "}};")
    }
}

fn write_hole(f: &mut fmt::Formatter<'_>, bytes: u64) -> fmt::Result {
    let unit = if bytes == 1 { "byte" } else { "bytes" };
    writeln!(f, "    /* XXX {bytes} {unit} hole */")
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawStructLayout {
    name: Option<String>,
    size: u64,
    alignment: u64,
    fields: Vec<FieldLayout>,
}

#[cfg(feature = "serde")]
impl From<RawStructLayout> for StructLayout {
    fn from(raw: RawStructLayout) -> Self {
        StructLayout::from_parts(raw.name, raw.size, raw.alignment, raw.fields)
    }
}

#[cfg(feature = "serde")]
impl From<StructLayout> for RawStructLayout {
    fn from(layout: StructLayout) -> Self {
        RawStructLayout {
            name: layout.name,
            size: layout.size,
            alignment: layout.alignment,
            fields: layout.fields,
        }
    }
}
