//! Compare computed layouts against a catalog.

use std::fmt;

use cabi_abi::AbiProfile;
use cabi_layout::compute_layout;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::catalog::Catalog;

/// One property whose computed value differs from the reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub struct_name: String,
    /// `sizeof`, `alignof`, or `offsetof <field>`.
    pub subject: String,
    /// `None` when the reference has no such property.
    pub expected: Option<u64>,
    /// `None` when the computed layout has no such property.
    pub actual: Option<u64>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: expected ", self.struct_name, self.subject)?;
        match self.expected {
            Some(value) => write!(f, "{value}")?,
            None => f.write_str("nothing")?,
        }
        f.write_str(", computed ")?;
        match self.actual {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("nothing"),
        }
    }
}

/// Outcome of checking one catalog under one profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    target: String,
    checked: usize,
    skipped: usize,
    mismatches: Vec<Mismatch>,
}

impl Report {
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Entries whose reference applied to the profile.
    pub fn checked(&self) -> usize {
        self.checked
    }

    /// Entries whose reference belongs to a different target.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} checked, {} skipped, {} mismatch(es)",
            self.target,
            self.checked,
            self.skipped,
            self.mismatches.len()
        )?;
        for mismatch in &self.mismatches {
            write!(f, "\n  {mismatch}")?;
        }
        Ok(())
    }
}

/// Lay out every applicable entry of `catalog` under `profile` and record
/// each property that disagrees with its reference.
#[tracing::instrument(level = "debug", skip_all, fields(triple = %profile.name(), entries = catalog.len()))]
pub fn check(catalog: &Catalog, profile: &AbiProfile) -> Report {
    let mut report = Report {
        target: profile.name().to_string(),
        checked: 0,
        skipped: 0,
        mismatches: Vec::new(),
    };

    for entry in catalog.entries() {
        if !entry.expected.applies_to(profile) {
            report.skipped += 1;
            continue;
        }
        report.checked += 1;

        let name = entry.name.as_str();
        let layout = compute_layout(&entry.ty, profile);
        let computed: FxHashMap<String, u64> = layout.properties(name).collect();
        let reference = entry.expected.reference();
        let mut seen = FxHashSet::default();

        for (key, expected) in reference.properties(name) {
            let actual = computed.get(&key).copied();
            if actual != Some(expected) {
                report.mismatches.push(mismatch(name, &key, Some(expected), actual));
            }
            seen.insert(key);
        }
        for (key, actual) in layout.properties(name) {
            if !seen.contains(&key) {
                report.mismatches.push(mismatch(name, &key, None, Some(actual)));
            }
        }
    }

    for diff in &report.mismatches {
        tracing::debug!(%diff, "layout mismatch");
    }
    tracing::debug!(
        checked = report.checked,
        skipped = report.skipped,
        mismatches = report.mismatches.len(),
        "conformance check finished"
    );
    report
}

fn mismatch(name: &str, key: &str, expected: Option<u64>, actual: Option<u64>) -> Mismatch {
    let subject = key
        .strip_prefix(name)
        .map_or(key, str::trim_start)
        .to_string();
    Mismatch {
        struct_name: name.to_string(),
        subject,
        expected,
        actual,
    }
}
