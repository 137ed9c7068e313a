//! Completed trips and their display rows.

use std::fmt::Write;

use chrono::{DateTime, Duration, Local};
use serde::Serialize;

use crate::distance::format_distance;

/// One finished start/stop cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub distance_km: f64,
    pub started_at: DateTime<Local>,
    pub ended_at: DateTime<Local>,
}

impl TripRecord {
    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }
}

/// A trip as shown in the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRow {
    /// Position in the list; stable because the list only grows.
    pub key: usize,
    pub distance_km: f64,
    pub distance: String,
    pub started: String,
    pub ended: String,
    pub duration: String,
}

/// Append-only, chronologically ordered list of finished trips.
#[derive(Debug, Clone, Default)]
pub struct TripList {
    records: Vec<TripRecord>,
}

impl TripList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its index.
    pub(crate) fn push(&mut self, record: TripRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TripRecord> {
        self.records.get(index)
    }

    pub fn last(&self) -> Option<&TripRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TripRecord> {
        self.records.iter()
    }

    /// Display rows, one per record, timestamps rendered with `time_format`.
    pub fn rows(&self, time_format: &str) -> Vec<TripRow> {
        self.records
            .iter()
            .enumerate()
            .map(|(key, r)| TripRow {
                key,
                distance_km: r.distance_km,
                distance: format_distance(r.distance_km),
                started: format_time(&r.started_at, time_format),
                ended: format_time(&r.ended_at, time_format),
                duration: format_duration(r.duration()),
            })
            .collect()
    }
}

/// Render `time` with `time_format`, falling back to RFC 3339 when the
/// pattern is invalid.
fn format_time(time: &DateTime<Local>, time_format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", time.format(time_format)).is_err() {
        return time.to_rfc3339();
    }
    out
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}
