//! Date-indexed price series.
//!
//! A `Series` is keyed by calendar date and always iterates in ascending date
//! order. Keys are unique; what happens when a date is inserted twice is
//! decided by an explicit [`DuplicatePolicy`] at the call site.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// What to do when a date is inserted that the series already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The most recently inserted price replaces the existing one.
    #[default]
    LastWins,
    /// The existing price is kept and the new one discarded.
    FirstWins,
}

/// Ordered mapping from date to price, strictly increasing by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    points: BTreeMap<NaiveDate, f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a price under `policy`.
    ///
    /// Returns the price that was displaced (for `LastWins`) or rejected
    /// (for `FirstWins`), or `None` when the date was new.
    pub fn insert(&mut self, date: NaiveDate, price: f64, policy: DuplicatePolicy) -> Option<f64> {
        use std::collections::btree_map::Entry;

        match self.points.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(price);
                None
            }
            Entry::Occupied(mut slot) => match policy {
                DuplicatePolicy::LastWins => Some(slot.insert(price)),
                DuplicatePolicy::FirstWins => Some(price),
            },
        }
    }

    /// Drop every entry dated after `last`. Returns how many were dropped.
    pub fn truncate_after(&mut self, last: NaiveDate) -> usize {
        match last.succ_opt() {
            Some(next) => self.points.split_off(&next).len(),
            None => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points.get(&date).copied()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.points.contains_key(&date)
    }

    /// Earliest date in the series.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.keys().next().copied()
    }

    /// Latest date in the series.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.keys().next_back().copied()
    }

    /// Iterate `(date, price)` pairs in ascending date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, f64)> + ExactSizeIterator + '_ {
        self.points.iter().map(|(d, p)| (*d, *p))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.values().copied()
    }
}

/// Collects with [`DuplicatePolicy::LastWins`].
impl FromIterator<(NaiveDate, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        let mut series = Series::new();
        for (date, price) in iter {
            series.insert(date, price, DuplicatePolicy::LastWins);
        }
        series
    }
}

impl IntoIterator for Series {
    type Item = (NaiveDate, f64);
    type IntoIter = std::collections::btree_map::IntoIter<NaiveDate, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

/// A series paired with the name it is displayed and deleted under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    name: String,
    series: Series,
}

impl NamedSeries {
    pub fn new(name: impl Into<String>, series: Series) -> Self {
        Self {
            name: name.into(),
            series,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn into_parts(self) -> (String, Series) {
        (self.name, self.series)
    }
}
