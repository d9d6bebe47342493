//! Field type descriptors.

use std::fmt;
use std::sync::Arc;

use cabi_abi::PrimitiveKind;

use crate::error::TypeError;
use crate::structs::StructType;

/// The type of one struct field.
///
/// Descriptors are immutable values. Nested structs are shared through
/// `Arc`, so cloning a descriptor never copies a struct definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDesc {
    /// A C scalar, laid out from the ABI profile table.
    Primitive(PrimitiveKind),
    /// A data pointer. Always pointer-sized; the pointee is never laid out.
    Pointer(Box<Pointee>),
    /// A fixed-length array.
    Array(ArrayType),
    /// A struct embedded by value.
    Struct(Arc<StructType>),
}

/// What a pointer points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pointee {
    /// An incomplete or forward-declared struct known only by its tag
    /// (`struct artist*`). Also how a struct refers to itself.
    Opaque(String),
    /// A complete type.
    Type(TypeDesc),
}

/// `element[len]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayType {
    element: Box<TypeDesc>,
    len: u64,
}

impl ArrayType {
    pub fn element(&self) -> &TypeDesc {
        &self.element
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl TypeDesc {
    #[inline]
    pub fn prim(kind: PrimitiveKind) -> Self {
        TypeDesc::Primitive(kind)
    }

    /// Pointer to a complete type.
    pub fn ptr(pointee: TypeDesc) -> Self {
        TypeDesc::Pointer(Box::new(Pointee::Type(pointee)))
    }

    /// Pointer to an incomplete struct, referenced by tag only.
    pub fn opaque_ptr(tag: impl Into<String>) -> Self {
        TypeDesc::Pointer(Box::new(Pointee::Opaque(tag.into())))
    }

    /// `element[count]`. Fails for negative counts; zero is allowed.
    pub fn array(element: TypeDesc, count: i64) -> Result<Self, TypeError> {
        let Ok(len) = u64::try_from(count) else {
            tracing::debug!(count, "rejecting negative array length");
            return Err(TypeError::InvalidArrayLength { count });
        };
        Ok(TypeDesc::Array(ArrayType {
            element: Box::new(element),
            len,
        }))
    }

    /// The struct stored inline by this field, looking through arrays.
    ///
    /// `struct foo` and `struct foo[4]` both embed `foo` by value; a
    /// pointer embeds nothing.
    pub fn embedded_struct(&self) -> Option<&Arc<StructType>> {
        match self {
            TypeDesc::Struct(inner) => Some(inner),
            TypeDesc::Array(array) => array.element.embedded_struct(),
            TypeDesc::Primitive(_) | TypeDesc::Pointer(_) => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Arc<StructType>> {
        match self {
            TypeDesc::Struct(inner) => Some(inner),
            _ => None,
        }
    }

    /// Split into the innermost non-array type and the array dimensions,
    /// outermost first, the order C writes them.
    pub(crate) fn peel_arrays(&self) -> (&TypeDesc, Vec<u64>) {
        let mut dims = Vec::new();
        let mut ty = self;
        while let TypeDesc::Array(array) = ty {
            dims.push(array.len);
            ty = &array.element;
        }
        (ty, dims)
    }

    /// Write the non-array part of a declaration (`int`, `struct foo*`).
    pub(crate) fn fmt_base(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Primitive(kind) => f.write_str(kind.c_name()),
            TypeDesc::Pointer(pointee) => match &**pointee {
                Pointee::Opaque(tag) => write!(f, "struct {tag}*"),
                Pointee::Type(ty) => write!(f, "{ty}*"),
            },
            TypeDesc::Struct(inner) => match inner.name() {
                Some(tag) => write!(f, "struct {tag}"),
                None => f.write_str("struct <anonymous>"),
            },
            TypeDesc::Array(_) => write!(f, "{self}"),
        }
    }
}

impl From<PrimitiveKind> for TypeDesc {
    fn from(kind: PrimitiveKind) -> Self {
        TypeDesc::Primitive(kind)
    }
}

impl From<Arc<StructType>> for TypeDesc {
    fn from(inner: Arc<StructType>) -> Self {
        TypeDesc::Struct(inner)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, dims) = self.peel_arrays();
        base.fmt_base(f)?;
        for dim in dims {
            write!(f, "[{dim}]")?;
        }
        Ok(())
    }
}
