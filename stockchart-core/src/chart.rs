//! Display-side registry of loaded series.
//!
//! The chart collaborator needs to add a named series, remove one without
//! disturbing the order of the rest, and see every series over one date
//! axis. `SeriesRegistry` is the in-memory implementation used by the CLI
//! and tests; a GUI implements [`ChartSink`] over its own surface.
//!
//! Removal takes a [`SeriesHandle`], which only `add_series` creates and which
//! cannot be cloned, so a series that was never added, or was already
//! removed, cannot be named for deletion.

use crate::domain::NamedSeries;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("a series named '{0}' is already loaded")]
    DuplicateName(String),
}

/// Proof that a series is currently registered with a sink.
#[derive(Debug, PartialEq, Eq)]
pub struct SeriesHandle {
    registry: u64,
    id: u64,
    name: String,
}

impl SeriesHandle {
    /// Construct a handle. Only sinks should call this, from `add_series`;
    /// a handle built anywhere else is refused by `remove_series`.
    pub fn new(registry: u64, id: u64, name: impl Into<String>) -> Self {
        Self {
            registry,
            id,
            name: name.into(),
        }
    }

    /// Display name of the registered series.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Receiver of pipeline output.
pub trait ChartSink {
    /// Register a series. Names must be unique among registered series.
    fn add_series(&mut self, series: NamedSeries) -> Result<SeriesHandle, ChartError>;

    /// Remove a registered series, keeping the order of the others.
    ///
    /// Returns `None` for a handle this sink did not mint: one from another
    /// sink, or one built directly with [`SeriesHandle::new`].
    fn remove_series(&mut self, handle: SeriesHandle) -> Option<NamedSeries>;
}

/// Ordered collection of named series.
#[derive(Debug)]
pub struct SeriesRegistry {
    id: u64,
    next_series: u64,
    entries: Vec<(u64, NamedSeries)>,
}

impl SeriesRegistry {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            next_series: 0,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Series in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &NamedSeries> {
        self.entries.iter().map(|(_, s)| s)
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(NamedSeries::name).collect()
    }

    pub fn get(&self, handle: &SeriesHandle) -> Option<&NamedSeries> {
        if handle.registry != self.id {
            return None;
        }
        self.entries
            .iter()
            .find(|(id, _)| *id == handle.id)
            .map(|(_, s)| s)
    }

    /// Lay every series out on the union of their dates.
    ///
    /// A cell is `None` where a series has no entry for that date.
    pub fn overlay(&self) -> OverlayTable {
        let dates: Vec<NaiveDate> = self
            .iter()
            .flat_map(|s| s.series().dates())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = self
            .iter()
            .map(|s| OverlayColumn {
                name: s.name().to_string(),
                values: dates.iter().map(|d| s.series().get(*d)).collect(),
            })
            .collect();

        OverlayTable { dates, columns }
    }
}

impl Default for SeriesRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartSink for SeriesRegistry {
    fn add_series(&mut self, series: NamedSeries) -> Result<SeriesHandle, ChartError> {
        if self.iter().any(|s| s.name() == series.name()) {
            return Err(ChartError::DuplicateName(series.name().to_string()));
        }
        let id = self.next_series;
        self.next_series += 1;
        let handle = SeriesHandle::new(self.id, id, series.name());
        self.entries.push((id, series));
        Ok(handle)
    }

    fn remove_series(&mut self, handle: SeriesHandle) -> Option<NamedSeries> {
        if handle.registry != self.id {
            return None;
        }
        let pos = self.entries.iter().position(|(id, _)| *id == handle.id)?;
        Some(self.entries.remove(pos).1)
    }
}

/// One column of an [`OverlayTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Several series on a common date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayTable {
    /// The common date axis (sorted ascending).
    pub dates: Vec<NaiveDate>,
    /// One column per series, each the same length as `dates`.
    pub columns: Vec<OverlayColumn>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Series;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn named(name: &str, points: &[(&str, f64)]) -> NamedSeries {
        NamedSeries::new(name, points.iter().map(|(s, p)| (d(s), *p)).collect::<Series>())
    }

    #[test]
    fn removal_keeps_relative_order() {
        let mut registry = SeriesRegistry::new();
        let _a = registry.add_series(named("A (none)", &[])).unwrap();
        let b = registry.add_series(named("B (none)", &[])).unwrap();
        let _c = registry.add_series(named("C (none)", &[])).unwrap();

        let removed = registry.remove_series(b).unwrap();
        assert_eq!(removed.name(), "B (none)");
        assert_eq!(registry.names(), vec!["A (none)", "C (none)"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = SeriesRegistry::new();
        registry.add_series(named("SPY (20)", &[])).unwrap();
        let err = registry.add_series(named("SPY (20)", &[])).unwrap_err();
        assert_eq!(err, ChartError::DuplicateName("SPY (20)".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn name_is_reusable_after_removal() {
        let mut registry = SeriesRegistry::new();
        let h = registry.add_series(named("SPY (none)", &[])).unwrap();
        registry.remove_series(h);
        assert!(registry.add_series(named("SPY (none)", &[])).is_ok());
    }

    #[test]
    fn foreign_handle_is_refused() {
        let mut first = SeriesRegistry::new();
        let mut second = SeriesRegistry::new();
        let h = first.add_series(named("SPY (none)", &[])).unwrap();
        second.add_series(named("SPY (none)", &[])).unwrap();

        assert!(second.get(&h).is_none());
        assert!(second.remove_series(h).is_none());
        assert_eq!(second.len(), 1);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn hand_built_handle_is_refused() {
        let mut registry = SeriesRegistry::new();
        registry.add_series(named("SPY (none)", &[])).unwrap();

        let forged = SeriesHandle::new(registry.id, 99, "SPY (none)");
        assert!(registry.get(&forged).is_none());
        assert!(registry.remove_series(forged).is_none());
        assert_eq!(registry.names(), vec!["SPY (none)"]);
    }

    #[test]
    fn overlay_unions_dates() {
        let mut registry = SeriesRegistry::new();
        registry
            .add_series(named("A", &[("2020-01-01", 1.0), ("2020-01-02", 2.0)]))
            .unwrap();
        registry
            .add_series(named("B", &[("2020-01-02", 20.0), ("2020-01-03", 30.0)]))
            .unwrap();

        let table = registry.overlay();
        assert_eq!(table.dates, vec![d("2020-01-01"), d("2020-01-02"), d("2020-01-03")]);
        assert_eq!(table.columns[0].values, vec![Some(1.0), Some(2.0), None]);
        assert_eq!(table.columns[1].values, vec![None, Some(20.0), Some(30.0)]);
    }

    #[test]
    fn handle_exposes_name() {
        let mut registry = SeriesRegistry::new();
        let h = registry.add_series(named("QQQ (50)", &[])).unwrap();
        assert_eq!(h.name(), "QQQ (50)");
        assert_eq!(registry.get(&h).map(NamedSeries::name), Some("QQQ (50)"));
    }
}
