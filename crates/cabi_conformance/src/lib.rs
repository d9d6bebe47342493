//! Conformance harness for the layout computer.
//!
//! A [`Catalog`] pairs struct definitions with the layout a real compiler
//! produced for them, either captured on the host through `#[repr(C)]`
//! mirrors or recorded ahead of time for other targets. [`check`] lays out
//! every entry under a profile and collects all divergences into a
//! [`Report`] rather than stopping at the first.
//!
//! ```text
//! let report = check(&Catalog::host()?, AbiProfile::host()?);
//! assert!(report.is_clean(), "{report}");
//! ```

mod catalog;
mod check;
mod fixtures;
mod host;
mod recorded;

pub use catalog::{Catalog, CatalogEntry, CatalogError, Expected, Reference};
pub use check::{check, Mismatch, Report};
pub use fixtures::{fixtures, Fixture};
pub use recorded::recorded_triples;
