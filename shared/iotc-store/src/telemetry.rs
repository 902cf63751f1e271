//! Telemetry Store
//!
//! Append-only time series per entity. Samples are kept in arrival order;
//! queries group them by key, sort each series by timestamp and optionally
//! keep only the most recent samples.

use dashmap::DashMap;
use iotc_core::{now_millis, EntityRef, Result};
use iotc_tracing::{Counter, Gauge};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::value::telemetry_string;

/// One stored sample. The owning entity is the map key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub key: String,
    pub ts: i64,
    pub value: String,
}

/// A point in a returned series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsValue {
    pub ts: i64,
    pub value: String,
}

/// Series keyed by telemetry key. Keys without matching samples are absent.
pub type TimeseriesResult = BTreeMap<String, Vec<TsValue>>;

/// Sample predicate shared by queries and range deletes.
///
/// Every supplied bound must hold; both time bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleFilter {
    pub keys: Option<Vec<String>>,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
}

impl SampleFilter {
    pub fn matches(&self, sample: &TelemetrySample) -> bool {
        if let Some(keys) = &self.keys {
            if !keys.iter().any(|k| *k == sample.key) {
                return false;
            }
        }
        if self.start_ts.is_some_and(|start| sample.ts < start) {
            return false;
        }
        if self.end_ts.is_some_and(|end| sample.ts > end) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeseriesQuery {
    pub filter: SampleFilter,
    /// Keep only the last `limit` samples of each series. `None` and `Some(0)` keep all.
    pub limit: Option<usize>,
}

#[derive(Clone)]
pub struct TelemetryStore {
    series: Arc<DashMap<EntityRef, Vec<TelemetrySample>>>,
    written: Counter,
    deleted: Counter,
    stored: Gauge,
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self {
            series: Arc::new(DashMap::new()),
            written: Counter::new("telemetry_samples_written"),
            deleted: Counter::new("telemetry_samples_deleted"),
            stored: Gauge::new("telemetry_samples_stored"),
        }
    }

    /// Append one sample per entry, all stamped with the current time.
    ///
    /// Nothing is written if any value cannot be stringified.
    pub fn save(&self, entity: &EntityRef, values: &Map<String, Value>) -> Result<i64> {
        let ts = now_millis();
        self.save_at(entity, values, ts)?;
        Ok(ts)
    }

    /// [`save`](Self::save) with an explicit timestamp. Returns the number of samples appended.
    pub fn save_at(&self, entity: &EntityRef, values: &Map<String, Value>, ts: i64) -> Result<usize> {
        let samples = values
            .iter()
            .map(|(key, value)| {
                Ok(TelemetrySample {
                    key: key.clone(),
                    ts,
                    value: telemetry_string(key, value)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let appended = samples.len();
        if appended == 0 {
            return Ok(0);
        }

        self.series.entry(entity.clone()).or_default().extend(samples);

        self.written.add(appended as u64);
        self.stored.add(appended as u64);
        debug!(entity = %entity, ts, appended, "Telemetry saved");

        Ok(appended)
    }

    /// Filter, group by key, sort ascending by timestamp, then tail-limit.
    pub fn query(&self, entity: &EntityRef, query: &TimeseriesQuery) -> TimeseriesResult {
        let mut grouped = TimeseriesResult::new();

        if let Some(samples) = self.series.get(entity) {
            for sample in samples.iter().filter(|s| query.filter.matches(s)) {
                grouped.entry(sample.key.clone()).or_default().push(TsValue {
                    ts: sample.ts,
                    value: sample.value.clone(),
                });
            }
        }

        let limit = query.limit.filter(|l| *l > 0);
        for points in grouped.values_mut() {
            // stable: equal timestamps keep arrival order
            points.sort_by_key(|p| p.ts);
            if let Some(limit) = limit {
                if points.len() > limit {
                    points.drain(..points.len() - limit);
                }
            }
        }

        grouped
    }

    /// Remove every sample of `entity` matching `filter`; returns how many were removed.
    pub fn delete_range(&self, entity: &EntityRef, filter: &SampleFilter) -> usize {
        let removed = match self.series.get_mut(entity) {
            Some(mut samples) => {
                let before = samples.len();
                samples.retain(|s| !filter.matches(s));
                before - samples.len()
            }
            None => 0,
        };

        if removed > 0 {
            self.series.remove_if(entity, |_, samples| samples.is_empty());
            self.deleted.add(removed as u64);
            self.stored.sub(removed as u64);
        }
        debug!(entity = %entity, removed, "Telemetry range deleted");

        removed
    }

    /// Total stored samples across every entity
    pub fn len(&self) -> usize {
        self.stored.get() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn written(&self) -> &Counter {
        &self.written
    }

    pub fn deleted(&self) -> &Counter {
        &self.deleted
    }

    pub fn stored(&self) -> &Gauge {
        &self.stored
    }
}
