//! Generic in-memory registry backing the profile, asset and device catalogs

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use iotc_core::{IotcError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

/// Fields an update patch can never overwrite
const PROTECTED_FIELDS: [&str; 2] = ["id", "createdAt"];

/// A record type held in a [`Catalog`]
pub trait CatalogEntry: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human-readable kind used in messages ("Asset", "Device profile", ...)
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn set_updated_at(&mut self, at: DateTime<Utc>);
}

struct Slot<T> {
    seq: u64,
    entry: T,
}

#[derive(Clone)]
pub struct Catalog<T: CatalogEntry> {
    entries: Arc<DashMap<String, Slot<T>>>,
    next_seq: Arc<AtomicU64>,
}

impl<T: CatalogEntry> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CatalogEntry> Catalog<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Entries accepted by `predicate`, in creation order
    pub fn list<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        let mut matched: Vec<(u64, T)> = self
            .entries
            .iter()
            .filter(|slot| predicate(&slot.entry))
            .map(|slot| (slot.seq, slot.entry.clone()))
            .collect();
        matched.sort_by_key(|(seq, _)| *seq);
        matched.into_iter().map(|(_, entry)| entry).collect()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.entries.get(id).map(|slot| slot.entry.clone())
    }

    pub fn insert(&self, entry: T) -> T {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        debug!(kind = T::KIND, id = entry.id(), "Catalog entry created");
        self.entries.insert(
            entry.id().to_string(),
            Slot {
                seq,
                entry: entry.clone(),
            },
        );
        entry
    }

    /// Shallow-merge `patch` onto the stored entry and refresh `updatedAt`.
    ///
    /// Returns `Ok(None)` when no entry has this id. Keys the record type does
    /// not know are ignored; values of the wrong shape are a validation error.
    pub fn update(&self, id: &str, patch: Map<String, Value>) -> Result<Option<T>> {
        let Some(mut slot) = self.entries.get_mut(id) else {
            return Ok(None);
        };

        let mut fields = match serde_json::to_value(&slot.entry)? {
            Value::Object(fields) => fields,
            _ => {
                return Err(IotcError::Internal(format!(
                    "{} does not serialize to an object",
                    T::KIND
                )))
            }
        };
        for (key, value) in patch {
            if !PROTECTED_FIELDS.contains(&key.as_str()) {
                fields.insert(key, value);
            }
        }

        let mut updated: T = serde_json::from_value(Value::Object(fields))
            .map_err(|e| IotcError::validation(format!("Invalid {} update: {}", T::KIND, e)))?;
        updated.set_updated_at(Utc::now());
        slot.entry = updated.clone();

        debug!(kind = T::KIND, id, "Catalog entry updated");
        Ok(Some(updated))
    }

    pub fn remove(&self, id: &str) -> bool {
        let removed = self.entries.remove(id).is_some();
        if removed {
            debug!(kind = T::KIND, id, "Catalog entry deleted");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run `validator` rules on a create request.
pub fn validated<R: Validate>(request: R) -> Result<R> {
    request
        .validate()
        .map_err(|e| IotcError::validation(e.to_string()))?;
    Ok(request)
}

/// Case-insensitive substring match on name or description.
pub(crate) fn search_matches(search: Option<&str>, name: &str, description: &str) -> bool {
    match search {
        None | Some("") => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            name.to_lowercase().contains(&needle) || description.to_lowercase().contains(&needle)
        }
    }
}
