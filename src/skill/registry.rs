//! The scheduled-entry registry — the one shared mutable resource.
//!
//! Per key: absent → armed → (fired | canceled) → absent. Every mutation
//! (register, cancel, delete-last, the fire callback's removal step) goes
//! through the single interior lock; critical sections are map
//! insert/remove plus task abort, never rendering or publishing.

use chrono::{DateTime, Local, Utc};
use std::sync::{Arc, Mutex};
use tempo_core::{duration::format_duration, traits::Transport};
use tempo_memory::{EntryKind, Store};
use tempo_nlu::TimerSummary;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::respond;

/// When a scheduled entry is due.
#[derive(Debug, Clone)]
pub enum Schedule {
    /// A countdown timer: due `total` after `started`.
    Countdown {
        started: DateTime<Utc>,
        total: chrono::Duration,
    },
    /// An alarm: due at a wall-clock instant.
    Clock { fire_at: DateTime<Local> },
}

impl Schedule {
    fn kind(&self) -> EntryKind {
        match self {
            Schedule::Countdown { .. } => EntryKind::Timer,
            Schedule::Clock { .. } => EntryKind::Alarm,
        }
    }

    fn time_left(&self, now: DateTime<Utc>) -> chrono::Duration {
        match self {
            Schedule::Countdown { started, total } => *total - (now - *started),
            Schedule::Clock { fire_at } => fire_at.with_timezone(&Utc) - now,
        }
    }

    fn scheduled_time(&self) -> DateTime<Utc> {
        match self {
            Schedule::Countdown { started, total } => *started + *total,
            Schedule::Clock { fire_at } => fire_at.with_timezone(&Utc),
        }
    }
}

/// One live scheduled entry. Created on register, destroyed on fire or
/// cancel; replaced whole, never mutated in place.
struct Entry {
    /// Identity for the armed task's callback: a replace retires the old
    /// task, and a stale callback must not remove its successor.
    id: Uuid,
    key: String,
    destination: String,
    schedule: Schedule,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Inner {
    /// Insertion-ordered; at most one live entry per key.
    entries: Vec<Entry>,
    /// Key of the most recently registered entry. May dangle once that
    /// entry fires or is canceled; re-validated before every use.
    last_created: Option<String>,
}

/// Registry of pending scheduled notifications.
pub struct Registry {
    inner: Mutex<Inner>,
    transport: Arc<dyn Transport>,
    store: Option<Store>,
}

impl Registry {
    pub fn new(transport: Arc<dyn Transport>, store: Option<Store>) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner::default()),
            transport,
            store,
        })
    }

    /// Arm a countdown timer under `key`, replacing any entry already
    /// there. Setting a second timer with an identical duration name
    /// resets the first rather than stacking a duplicate.
    pub fn register_timer(self: &Arc<Self>, key: &str, total: chrono::Duration, destination: &str) {
        self.register(
            key,
            Schedule::Countdown {
                started: Utc::now(),
                total,
            },
            destination,
        );
    }

    /// Arm an alarm under `key`. An already-due instant fires immediately.
    pub fn register_alarm(self: &Arc<Self>, key: &str, fire_at: DateTime<Local>, destination: &str) {
        self.register(key, Schedule::Clock { fire_at }, destination);
    }

    fn register(self: &Arc<Self>, key: &str, schedule: Schedule, destination: &str) {
        let id = Uuid::new_v4();
        let delay = schedule
            .time_left(Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);

        let task_registry = Arc::clone(self);
        let task_key = key.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task_registry.fire(&task_key, id).await;
        });

        let entry = Entry {
            id,
            key: key.to_string(),
            destination: destination.to_string(),
            schedule: schedule.clone(),
            handle,
        };

        match self.inner.lock() {
            Ok(mut inner) => {
                // Replace: retire any live entry under the same key first.
                if let Some(pos) = inner.entries.iter().position(|e| e.key == key) {
                    let old = inner.entries.remove(pos);
                    old.handle.abort();
                    debug!("existing entry '{key}' canceled before registering a new one");
                }
                inner.entries.push(entry);
                inner.last_created = Some(key.to_string());
            }
            Err(e) => {
                warn!("registry lock poisoned, dropping registration for '{key}': {e}");
                entry.handle.abort();
                return;
            }
        }

        // Best-effort bookkeeping; never awaited, never rolled back.
        if let Some(store) = self.store.clone() {
            let kind = schedule.kind();
            let name = key.to_string();
            let topic = destination.to_string();
            let scheduled_time = schedule.scheduled_time();
            tokio::spawn(async move {
                let _ = store.remove_entry(kind, &name).await;
                if let Err(e) = store.insert_entry(kind, &name, &topic, scheduled_time).await {
                    warn!("failed to persist entry '{name}': {e}");
                }
            });
        }

        info!("entry '{key}' registered and armed");
    }

    /// Completion path for an armed task. Removes the entry only when it
    /// is still present under `key` with this task's identity (a replace
    /// may already have retired this callback's entry), then broadcasts
    /// the triggered notification outside the lock.
    async fn fire(&self, key: &str, id: Uuid) {
        let entry = match self.inner.lock() {
            Ok(mut inner) => {
                match inner.entries.iter().position(|e| e.key == key && e.id == id) {
                    Some(pos) => inner.entries.remove(pos),
                    None => {
                        debug!("stale fire callback for '{key}' ignored");
                        return;
                    }
                }
            }
            Err(e) => {
                warn!("registry lock poisoned in fire path for '{key}': {e}");
                return;
            }
        };

        let answer = respond::triggered(entry.schedule.kind(), key);
        if let Err(e) = self
            .transport
            .publish(&answer, &entry.destination, true)
            .await
        {
            warn!("failed to publish triggered notification for '{key}': {e}");
        }
        self.retire_persisted(entry.schedule.kind(), key);
        info!("entry '{key}' fired");
    }

    /// Cancel and remove the entry under `key`. Canceling an absent or
    /// already-fired key is a no-op.
    pub fn cancel(&self, key: &str) -> bool {
        let removed = match self.inner.lock() {
            Ok(mut inner) => match inner.entries.iter().position(|e| e.key == key) {
                Some(pos) => Some(inner.entries.remove(pos)),
                None => None,
            },
            Err(e) => {
                warn!("registry lock poisoned in cancel for '{key}': {e}");
                None
            }
        };

        match removed {
            Some(entry) => {
                entry.handle.abort();
                self.retire_persisted(entry.schedule.kind(), key);
                info!("entry '{key}' canceled");
                true
            }
            None => false,
        }
    }

    /// Delete the most recently registered entry, if it is still live.
    /// Returns the deleted key, or `None` when there is nothing to delete
    /// (including a last-created pointer that dangles).
    pub fn delete_last(&self) -> Option<String> {
        let entry = {
            let mut inner = match self.inner.lock() {
                Ok(inner) => inner,
                Err(e) => {
                    warn!("registry lock poisoned in delete_last: {e}");
                    return None;
                }
            };
            let last = inner.last_created.clone()?;
            let Some(pos) = inner.entries.iter().position(|e| e.key == last) else {
                debug!("last-created pointer '{last}' no longer live, nothing to delete");
                return None;
            };
            inner.last_created = None;
            inner.entries.remove(pos)
        };

        entry.handle.abort();
        self.retire_persisted(entry.schedule.kind(), &entry.key);
        info!("last created entry '{}' deleted", entry.key);
        Some(entry.key)
    }

    /// Snapshot live entries with positive remaining time, in registry
    /// insertion order. Remaining time is computed outside the lock.
    ///
    /// An entry whose remaining time has reached zero but whose callback
    /// has not yet removed it is excluded from the output.
    pub fn list_active(&self) -> Vec<TimerSummary> {
        let snapshot: Vec<(String, Schedule)> = match self.inner.lock() {
            Ok(inner) => inner
                .entries
                .iter()
                .map(|e| (e.key.clone(), e.schedule.clone()))
                .collect(),
            Err(e) => {
                warn!("registry lock poisoned in list_active: {e}");
                return Vec::new();
            }
        };

        let now = Utc::now();
        snapshot
            .into_iter()
            .filter_map(|(key, schedule)| {
                let left = schedule.time_left(now);
                (left > chrono::Duration::zero()).then(|| TimerSummary {
                    id: key,
                    time_left: format_duration(left),
                })
            })
            .collect()
    }

    /// Whether a live entry exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        match self.inner.lock() {
            Ok(inner) => inner.entries.iter().any(|e| e.key == key),
            Err(_) => false,
        }
    }

    fn retire_persisted(&self, kind: EntryKind, name: &str) {
        if let Some(store) = self.store.clone() {
            let name = name.to_string();
            tokio::spawn(async move {
                if let Err(e) = store.remove_entry(kind, &name).await {
                    warn!("failed to retire persisted entry '{name}': {e}");
                }
            });
        }
    }
}
