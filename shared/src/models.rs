use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Derived status for one car, read from its spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarRecord {
    pub last_reserved: Option<NaiveDate>,
    pub available_again: Option<NaiveDate>,
    pub available: bool,
}

impl CarRecord {
    /// Build a record, deriving `available` relative to `today`.
    pub fn new(
        last_reserved: Option<NaiveDate>,
        available_again: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        Self {
            last_reserved,
            available_again,
            available: is_available(available_again, today),
        }
    }
}

/// A car is available once its "available again" date has been reached.
pub fn is_available(available_again: Option<NaiveDate>, today: NaiveDate) -> bool {
    available_again.is_some_and(|date| date <= today)
}

/// Category of a failed spreadsheet read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanErrorKind {
    NotFound,
    Unreadable,
    MissingWorksheet,
    Io,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFailure {
    pub kind: ScanErrorKind,
    pub message: String,
}

/// Cached outcome for one file: either a record or the reason it could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CarStatus {
    Ready(CarRecord),
    Failed(ScanFailure),
}

impl CarStatus {
    pub fn record(&self) -> Option<&CarRecord> {
        match self {
            CarStatus::Ready(record) => Some(record),
            CarStatus::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ScanFailure> {
        match self {
            CarStatus::Ready(_) => None,
            CarStatus::Failed(failure) => Some(failure),
        }
    }
}

/// Immutable result of one refresh run, published as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub refreshed_at: Option<DateTime<Utc>>,
    pub cars: BTreeMap<String, CarStatus>,
}

impl StatusSnapshot {
    pub fn new(cars: BTreeMap<String, CarStatus>) -> Self {
        Self {
            refreshed_at: Some(Utc::now()),
            cars,
        }
    }

    pub fn get(&self, filename: &str) -> Option<&CarStatus> {
        self.cars.get(filename)
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.cars
            .values()
            .filter(|status| status.failure().is_some())
            .count()
    }
}
