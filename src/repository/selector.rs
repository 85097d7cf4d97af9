// src/repository/selector.rs

//! Picking one package record out of a catalog
//!
//! Only records whose `Package` field equals the requested name exactly are
//! considered. Among those, the greatest `Version` wins; when several share
//! the greatest version the one seen first is kept.

use super::parsers::PackageRecord;
use crate::version::{VersionCompare, VersionOrder};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Selects the newest record for a package name
#[derive(Debug, Clone, Copy)]
pub struct PackageSelector<C = VersionOrder> {
    order: C,
}

impl<C: VersionCompare> PackageSelector<C> {
    /// Create a selector using the given version ordering
    pub fn new(order: C) -> Self {
        Self { order }
    }

    /// Select from a slice of records
    pub fn select<'a>(&self, records: &'a [PackageRecord], name: &str) -> Option<&'a PackageRecord> {
        self.newest(records.iter(), name)
    }

    /// Select from any sequence of records without collecting it first
    pub fn select_from<I>(&self, records: I, name: &str) -> Option<PackageRecord>
    where
        I: IntoIterator<Item = PackageRecord>,
    {
        self.newest(records, name)
    }

    /// Every record for `name`, newest first
    ///
    /// The sort is stable, so records with equal versions keep catalog order.
    pub fn candidates<'a>(&self, records: &'a [PackageRecord], name: &str) -> Vec<&'a PackageRecord> {
        let mut matches: Vec<&PackageRecord> = records
            .iter()
            .filter(|record| record.package() == Some(name))
            .collect();
        matches.sort_by(|a, b| self.compare_records(b, a));
        matches
    }

    fn newest<R, I>(&self, records: I, name: &str) -> Option<R>
    where
        R: Borrow<PackageRecord>,
        I: IntoIterator<Item = R>,
    {
        let mut best: Option<R> = None;
        for record in records {
            if record.borrow().package() != Some(name) {
                continue;
            }
            // Replace only on a strictly greater version so the first of equals stays
            let newer = match &best {
                None => true,
                Some(current) => self.compare_records(record.borrow(), current.borrow()) == Ordering::Greater,
            };
            if newer {
                best = Some(record);
            }
        }
        best
    }

    fn compare_records(&self, a: &PackageRecord, b: &PackageRecord) -> Ordering {
        self.order
            .compare(a.version().unwrap_or_default(), b.version().unwrap_or_default())
    }
}
