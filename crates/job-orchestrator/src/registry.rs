//! Job registry: id → per-job watch slot.
//!
//! Each job lives in its own `watch` channel. Writers mutate their own slot
//! through `send_modify`, so distinct jobs never contend on one lock. The
//! map lock is held only for lookups and insert/remove, never across an
//! await.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use crate::job::{Job, JobId};

type Slot = Arc<watch::Sender<Job>>;

#[derive(Debug, Default)]
pub struct JobRegistry {
    slots: RwLock<HashMap<JobId, Slot>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, job: Job) -> JobId {
        let id = job.id.clone();
        let (tx, _rx) = watch::channel(job);
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), Arc::new(tx));
        id
    }

    fn slot(&self, id: &JobId) -> Option<Slot> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Snapshot of one job.
    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.slot(id).map(|slot| slot.borrow().clone())
    }

    /// Read a projection of a job without cloning the whole record.
    pub(crate) fn inspect<R>(&self, id: &JobId, f: impl FnOnce(&Job) -> R) -> Option<R> {
        self.slot(id).map(|slot| f(&slot.borrow()))
    }

    /// Mutate a job in place and notify its observers.
    ///
    /// Returns `None` when the job is no longer registered.
    pub(crate) fn update<R>(&self, id: &JobId, f: impl FnOnce(&mut Job) -> R) -> Option<R> {
        let slot = self.slot(id)?;
        let mut out = None;
        slot.send_modify(|job| out = Some(f(job)));
        out
    }

    pub fn subscribe(&self, id: &JobId) -> Option<watch::Receiver<Job>> {
        self.slot(id).map(|slot| slot.subscribe())
    }

    /// Snapshots of every job, in no particular order.
    pub fn snapshot(&self) -> Vec<Job> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|slot| slot.borrow().clone())
            .collect()
    }

    pub fn remove(&self, id: &JobId) -> Option<Job> {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .map(|slot| slot.borrow().clone())
    }

    /// Drop every job matching `predicate`. Returns how many were dropped.
    pub(crate) fn remove_where(&self, predicate: impl Fn(&Job) -> bool) -> usize {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let before = slots.len();
        slots.retain(|_, slot| !predicate(&slot.borrow()));
        before - slots.len()
    }
}
