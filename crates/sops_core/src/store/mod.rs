use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::domain::{Incident, IncidentPatch, IncidentStatus};
use crate::error::AppError;
use crate::workflow;

type Callback = Arc<dyn Fn() + Send + Sync + 'static>;

struct SubscriberEntry {
    id: u64,
    callback: Callback,
}

struct StoreInner {
    records: Mutex<BTreeMap<String, Incident>>,
    subscribers: Mutex<Vec<SubscriberEntry>>,
    next_subscriber_id: AtomicU64,
}

/// Authoritative in-memory incident collection shared by many independent
/// consumers. Cheap to clone; all clones observe the same records and the
/// same subscriber list.
///
/// Mutation and notification are synchronous. Records and subscribers sit
/// behind separate mutexes; overlapping updates to one id serialize in lock
/// order, last write wins. Notification snapshots the subscriber list and
/// releases every lock before invoking callbacks, so a subscriber may re-read,
/// subscribe, or unsubscribe (including itself) from inside its callback.
#[derive(Clone)]
pub struct IncidentStore {
    inner: Arc<StoreInner>,
}

/// Handle returned by `IncidentStore::subscribe`. Disposal is explicit:
/// dropping the handle does NOT unsubscribe.
pub struct Subscription {
    inner: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    /// Remove this subscriber. Idempotent; other subscribers are unaffected.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .subscribers
                .lock()
                .unwrap()
                .retain(|entry| entry.id != self.id);
        }
    }
}

impl IncidentStore {
    /// Build an isolated store over the supplied records. When `initial`
    /// carries duplicate ids the later record wins, matching the
    /// last-write-wins contract of `update_incident`.
    pub fn new(initial: Vec<Incident>) -> Self {
        let mut records = BTreeMap::new();
        for incident in initial {
            records.insert(incident.id.clone(), incident);
        }
        Self {
            inner: Arc::new(StoreInner {
                records: Mutex::new(records),
                subscribers: Mutex::new(Vec::new()),
                next_subscriber_id: AtomicU64::new(1),
            }),
        }
    }

    /// Pure lookup. Absence is an ordinary value, never an error; consumers
    /// render a "not found" state from `None`.
    pub fn get_incident(&self, id: &str) -> Option<Incident> {
        self.inner.records.lock().unwrap().get(id).cloned()
    }

    /// All records in deterministic order (by id). Input for analytics and
    /// metrics over caller-filtered views.
    pub fn list_incidents(&self) -> Vec<Incident> {
        self.inner.records.lock().unwrap().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// New report raised by a guard. Incidents enter the store `Active`;
    /// ids are caller-assigned and must be unique.
    pub fn insert_incident(&self, incident: Incident) -> Result<(), AppError> {
        if incident.id.trim().is_empty() {
            return Err(AppError::new(
                "VALIDATION_FIELD_REQUIRED",
                "id must be non-empty",
            )
            .with_field("id"));
        }
        if incident.status != IncidentStatus::Active {
            return Err(AppError::new(
                "INVALID_INITIAL_STATUS",
                "New incidents must be created in the Active state",
            )
            .with_field("status")
            .with_details(format!("status={}", incident.status.as_str())));
        }
        {
            let mut records = self.inner.records.lock().unwrap();
            if records.contains_key(&incident.id) {
                return Err(AppError::new(
                    "DUPLICATE_INCIDENT_ID",
                    "An incident with this id already exists",
                )
                .with_details(format!("id={}", incident.id)));
            }
            records.insert(incident.id.clone(), incident);
        }
        self.notify();
        Ok(())
    }

    /// Merge `patch` into the record for `id`, enforce the workflow guards,
    /// and notify every subscriber.
    ///
    /// Unknown id: silent no-op, `Ok(())`, no notification — callers that must
    /// distinguish absence check `get_incident` first. Guard failure: `Err`,
    /// record untouched, no notification. The merge is all-or-nothing.
    pub fn update_incident(&self, id: &str, patch: IncidentPatch) -> Result<(), AppError> {
        {
            let mut records = self.inner.records.lock().unwrap();
            let Some(current) = records.get(id) else {
                return Ok(());
            };
            workflow::validate_patch(current, &patch)?;
            let mut updated = current.clone();
            updated.apply_patch(patch);
            records.insert(id.to_string(), updated);
        }
        self.notify();
        Ok(())
    }

    /// Register a change callback, invoked once per applied mutation, for any
    /// id. No payload is delivered; subscribers re-read via `get_incident`.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.lock().unwrap().push(SubscriberEntry {
            id,
            callback: Arc::new(callback),
        });
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    fn notify(&self) {
        // Snapshot, then release the lock before invoking: a callback that
        // mutates the subscriber list must not deadlock or skew this pass.
        let snapshot: Vec<Callback> = self
            .inner
            .subscribers
            .lock()
            .unwrap()
            .iter()
            .map(|entry| Arc::clone(&entry.callback))
            .collect();
        for callback in snapshot {
            callback();
        }
    }
}
