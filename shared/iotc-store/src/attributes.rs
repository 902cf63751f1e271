//! Attribute Store
//!
//! Scoped key/value attributes for assets and devices. Records are grouped
//! per `(entity, scope)`; a save swaps the whole group in one step, so a
//! scope is never observed half-written.

use dashmap::DashMap;
use iotc_core::{generate_id, now_millis, AttributeScope, EntityRef, EntityType};
use iotc_tracing::Counter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// One stored attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRecord {
    pub id: String,
    pub entity_id: String,
    pub entity_type: EntityType,
    pub scope: AttributeScope,
    pub key: String,
    pub value: Value,
    pub last_update_ts: i64,
}

/// Optional filters for [`AttributeStore::query`]; supplied filters are ANDed.
#[derive(Debug, Clone, Default)]
pub struct AttributeFilter {
    pub entity_id: Option<String>,
    pub entity_type: Option<EntityType>,
    pub scope: Option<AttributeScope>,
}

impl AttributeFilter {
    fn matches(&self, entity: &EntityRef, scope: AttributeScope) -> bool {
        self.entity_id.as_deref().map_or(true, |id| id == entity.entity_id)
            && self.entity_type.map_or(true, |t| t == entity.entity_type)
            && self.scope.map_or(true, |s| s == scope)
    }
}

type ScopeKey = (EntityRef, AttributeScope);

/// Records of one `(entity, scope)`, tagged with the order of the save that wrote them.
struct ScopeGroup {
    seq: u64,
    records: Vec<AttributeRecord>,
}

#[derive(Clone)]
pub struct AttributeStore {
    scopes: Arc<DashMap<ScopeKey, ScopeGroup>>,
    next_seq: Arc<AtomicU64>,
    writes: Counter,
    deletes: Counter,
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeStore {
    pub fn new() -> Self {
        Self {
            scopes: Arc::new(DashMap::new()),
            next_seq: Arc::new(AtomicU64::new(0)),
            writes: Counter::new("attribute_writes"),
            deletes: Counter::new("attribute_deletes"),
        }
    }

    /// All records matching the filter, in save order.
    pub fn query(&self, filter: &AttributeFilter) -> Vec<AttributeRecord> {
        let mut groups: Vec<(u64, Vec<AttributeRecord>)> = self
            .scopes
            .iter()
            .filter(|entry| {
                let (entity, scope) = entry.key();
                filter.matches(entity, *scope)
            })
            .map(|entry| (entry.value().seq, entry.value().records.clone()))
            .collect();

        groups.sort_by_key(|(seq, _)| *seq);
        groups.into_iter().flat_map(|(_, records)| records).collect()
    }

    /// Replace every attribute under `(entity, scope)` with `values`.
    ///
    /// Keys stored under the scope but absent from `values` are dropped.
    /// Returns the number of records written.
    pub fn save(&self, entity: &EntityRef, scope: AttributeScope, values: Map<String, Value>) -> usize {
        self.save_at(entity, scope, values, now_millis())
    }

    /// [`save`](Self::save) with an explicit update timestamp.
    pub fn save_at(
        &self,
        entity: &EntityRef,
        scope: AttributeScope,
        values: Map<String, Value>,
        ts: i64,
    ) -> usize {
        let records: Vec<AttributeRecord> = values
            .into_iter()
            .map(|(key, value)| AttributeRecord {
                id: generate_id(),
                entity_id: entity.entity_id.clone(),
                entity_type: entity.entity_type,
                scope,
                key,
                value,
                last_update_ts: ts,
            })
            .collect();
        let written = records.len();
        let scope_key = (entity.clone(), scope);

        let replaced = if records.is_empty() {
            self.scopes.remove(&scope_key).map(|(_, old)| old.records.len())
        } else {
            let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
            self.scopes
                .insert(scope_key, ScopeGroup { seq, records })
                .map(|old| old.records.len())
        };

        self.writes.add(written as u64);
        debug!(
            entity = %entity,
            scope = %scope,
            written,
            replaced = replaced.unwrap_or(0),
            "Attributes saved"
        );

        written
    }

    /// Delete the single record for `(entity, scope, key)`.
    ///
    /// Returns `false` without touching the store when no such record exists.
    pub fn remove(&self, entity: &EntityRef, scope: AttributeScope, key: &str) -> bool {
        let scope_key = (entity.clone(), scope);

        let removed = match self.scopes.get_mut(&scope_key) {
            Some(mut group) => {
                let before = group.records.len();
                group.records.retain(|r| r.key != key);
                group.records.len() != before
            }
            None => false,
        };

        if removed {
            self.scopes.remove_if(&scope_key, |_, group| group.records.is_empty());
            self.deletes.inc();
            debug!(entity = %entity, scope = %scope, key, "Attribute removed");
        }

        removed
    }

    /// Number of stored records across every entity and scope
    pub fn len(&self) -> usize {
        self.scopes.iter().map(|entry| entry.value().records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn writes(&self) -> &Counter {
        &self.writes
    }

    pub fn deletes(&self) -> &Counter {
        &self.deletes
    }
}
