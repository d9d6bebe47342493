//! Struct definitions.
//!
//! A [`StructType`] is validated once, when it is built:
//!
//! - field names are unique within the struct
//! - the struct does not contain its own tag by value, directly or through
//!   value-embedded structs and arrays of them
//!
//! Each struct remembers the tags of every struct it embeds by value
//! (transitively), so the recursion check for a new definition only looks
//! at its direct fields.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::desc::TypeDesc;
use crate::error::TypeError;

/// One named member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    name: String,
    ty: TypeDesc,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }
}

/// An aggregate: an optional tag and fields in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructType {
    name: Option<String>,
    fields: Vec<Field>,
    /// Tags of all structs stored inline, at any depth.
    embedded: FxHashSet<String>,
}

impl StructType {
    /// Define `struct tag { ... }`.
    pub fn new<N, I>(tag: impl Into<String>, fields: I) -> Result<Arc<StructType>, TypeError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, TypeDesc)>,
    {
        Self::define(Some(tag.into()), fields)
    }

    /// Define an untagged struct. It cannot be referred to by name, so it
    /// can never be part of an embedding cycle.
    pub fn anonymous<N, I>(fields: I) -> Result<Arc<StructType>, TypeError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, TypeDesc)>,
    {
        Self::define(None, fields)
    }

    fn define<N, I>(name: Option<String>, fields: I) -> Result<Arc<StructType>, TypeError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, TypeDesc)>,
    {
        let mut builder = StructBuilder {
            name,
            fields: Vec::new(),
            seen: FxHashSet::default(),
        };
        for (field, ty) in fields {
            builder = builder.field(field, ty)?;
        }
        builder.build()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether `tag` is stored inline somewhere inside this struct.
    pub fn embeds(&self, tag: &str) -> bool {
        self.embedded.contains(tag)
    }

    /// Field names leading from this struct to an inline `tag`, if any.
    fn path_to(&self, tag: &str) -> Option<SmallVec<[&str; 4]>> {
        for field in &self.fields {
            let Some(inner) = field.ty.embedded_struct() else {
                continue;
            };
            if inner.name() == Some(tag) {
                let mut path = SmallVec::new();
                path.push(field.name.as_str());
                return Some(path);
            }
            if inner.embeds(tag) {
                if let Some(rest) = inner.path_to(tag) {
                    let mut path = SmallVec::new();
                    path.push(field.name.as_str());
                    path.extend(rest);
                    return Some(path);
                }
            }
        }
        None
    }
}

fn describe_owner(name: Option<&str>) -> String {
    match name {
        Some(tag) => format!("struct `{tag}`"),
        None => "anonymous struct".to_string(),
    }
}

/// Incremental struct definition.
///
/// Fields are added one at a time in declaration order; a duplicate name is
/// reported by the `field` call that introduces it.
///
/// ```text
/// let node = StructBuilder::named("node")
///     .field("value", TypeDesc::prim(PrimitiveKind::Int))?
///     .field("next", TypeDesc::opaque_ptr("node"))?
///     .build()?;
/// ```
#[derive(Clone, Debug)]
pub struct StructBuilder {
    name: Option<String>,
    fields: Vec<Field>,
    seen: FxHashSet<String>,
}

impl StructBuilder {
    pub fn named(tag: impl Into<String>) -> Self {
        Self {
            name: Some(tag.into()),
            fields: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            name: None,
            fields: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    /// Append a field.
    pub fn field(mut self, name: impl Into<String>, ty: TypeDesc) -> Result<Self, TypeError> {
        let name = name.into();
        if !self.seen.insert(name.clone()) {
            let owner = describe_owner(self.name.as_deref());
            tracing::debug!(%owner, field = %name, "duplicate field name");
            return Err(TypeError::DuplicateFieldName { owner, field: name });
        }
        self.fields.push(Field { name, ty });
        Ok(self)
    }

    /// Number of fields added so far.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finish the definition, rejecting value-embedding cycles.
    pub fn build(self) -> Result<Arc<StructType>, TypeError> {
        let mut embedded = FxHashSet::default();

        for field in &self.fields {
            let Some(inner) = field.ty.embedded_struct() else {
                continue;
            };

            if let Some(tag) = self.name.as_deref() {
                if inner.name() == Some(tag) || inner.embeds(tag) {
                    let mut path: SmallVec<[&str; 4]> = SmallVec::new();
                    path.push(field.name.as_str());
                    path.extend(inner.path_to(tag).unwrap_or_default());
                    let path = path.join(".");
                    tracing::debug!(tag, %path, "struct embeds itself by value");
                    return Err(TypeError::InvalidRecursiveEmbedding {
                        name: tag.to_string(),
                        path,
                    });
                }
            }

            if let Some(tag) = inner.name() {
                embedded.insert(tag.to_string());
            }
            embedded.extend(inner.embedded.iter().cloned());
        }

        Ok(Arc::new(StructType {
            name: self.name,
            fields: self.fields,
            embedded,
        }))
    }
}

impl fmt::Display for StructType {
    /// Renders a C declaration: `struct tag { int a; char b[2]; }`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(tag) => write!(f, "struct {tag} {{")?,
            None => f.write_str("struct {")?,
        }
        for field in &self.fields {
            let (base, dims) = field.ty.peel_arrays();
            f.write_str(" ")?;
            base.fmt_base(f)?;
            write!(f, " {}", field.name)?;
            for dim in dims {
                write!(f, "[{dim}]")?;
            }
            f.write_str(";")?;
        }
        f.write_str(" }")
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}
