//! Struct definitions paired with the layout a compiler gave them.

use std::sync::Arc;

use cabi_abi::{host_triple, AbiProfile};
use cabi_types::{StructType, TypeError};
use thiserror::Error;

use crate::fixtures::{fixtures, Fixture};
use crate::{host, recorded};

/// Problems assembling a catalog from fixture data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Type(#[from] TypeError),
    /// A fixture embeds a struct that was not defined before it.
    #[error("fixture refers to undefined struct `{tag}`")]
    UnknownStruct { tag: String },
    #[error("no recorded layouts for target '{triple}'")]
    NoRecordedTable { triple: String },
    /// Reference data exists for fewer structs than the fixtures define.
    #[error("no reference layout for `{name}`")]
    MissingReference { name: String },
    #[error("reference for `{name}` lists {actual} offsets but the struct has {expected} fields")]
    OffsetCount {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Ground-truth size, alignment, and field offsets of one struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub size: u64,
    pub alignment: u64,
    /// `(field, offset)` in declaration order.
    pub offsets: Vec<(String, u64)>,
}

impl Reference {
    /// Pair `offsets` with the fields of `ty` in declaration order.
    pub fn for_struct(
        name: &str,
        ty: &StructType,
        size: u64,
        alignment: u64,
        offsets: &[u64],
    ) -> Result<Self, CatalogError> {
        if offsets.len() != ty.fields().len() {
            return Err(CatalogError::OffsetCount {
                name: name.to_string(),
                expected: ty.fields().len(),
                actual: offsets.len(),
            });
        }
        Ok(Self {
            size,
            alignment,
            offsets: ty
                .fields()
                .iter()
                .zip(offsets)
                .map(|(field, &offset)| (field.name().to_string(), offset))
                .collect(),
        })
    }

    /// The same `(key, value)` table as `StructLayout::properties`.
    pub fn properties<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (String, u64)> + 'a {
        [
            (format!("{name} sizeof"), self.size),
            (format!("{name} alignof"), self.alignment),
        ]
        .into_iter()
        .chain(
            self.offsets
                .iter()
                .map(move |(field, offset)| (format!("{name} offsetof {field}"), *offset)),
        )
    }
}

/// Where a reference came from, which decides the profile it applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expected {
    /// Measured on the machine running the harness.
    Host(Reference),
    /// Recorded from a compiler for `triple`.
    Recorded { triple: String, reference: Reference },
}

impl Expected {
    pub fn reference(&self) -> &Reference {
        match self {
            Expected::Host(reference) | Expected::Recorded { reference, .. } => reference,
        }
    }

    /// Whether this reference describes layouts under `profile`.
    pub fn applies_to(&self, profile: &AbiProfile) -> bool {
        match self {
            Expected::Host(_) => host_triple() == Some(profile.name()),
            Expected::Recorded { triple, .. } => triple == profile.name(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub name: String,
    pub ty: Arc<StructType>,
    pub expected: Expected,
}

/// An ordered set of structs with known layouts.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fixture, with references measured from this machine's compiler.
    pub fn host() -> Result<Self, CatalogError> {
        let references = host::references();
        Self::from_fixtures(|fixture| {
            let reference = references
                .get(fixture.name)
                .cloned()
                .ok_or_else(|| CatalogError::MissingReference {
                    name: fixture.name.to_string(),
                })?;
            Ok(Expected::Host(reference))
        })
    }

    /// Every fixture, with references recorded for `triple`.
    pub fn recorded(triple: &str) -> Result<Self, CatalogError> {
        let table = recorded::table(triple).ok_or_else(|| CatalogError::NoRecordedTable {
            triple: triple.to_string(),
        })?;
        Self::from_fixtures(|fixture| {
            let &(_, size, alignment, offsets) = table
                .iter()
                .find(|(name, ..)| *name == fixture.name)
                .ok_or_else(|| CatalogError::MissingReference {
                    name: fixture.name.to_string(),
                })?;
            let reference = Reference::for_struct(fixture.name, &fixture.ty, size, alignment, offsets)?;
            Ok(Expected::Recorded {
                triple: triple.to_string(),
                reference,
            })
        })
    }

    fn from_fixtures(
        mut reference_for: impl FnMut(&Fixture) -> Result<Expected, CatalogError>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for fixture in fixtures()? {
            let expected = reference_for(&fixture)?;
            catalog.push(CatalogEntry {
                name: fixture.name.to_string(),
                ty: fixture.ty,
                expected,
            });
        }
        Ok(catalog)
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
