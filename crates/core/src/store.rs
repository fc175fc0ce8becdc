//! Registry of simulation runs keyed by identifier.
//!
//! A runner takes a record out with [`SimulationStore::checkout`], mutates it
//! without holding any lock, and returns it with [`SimulationStore::checkin`].
//! While a record is out its slot remembers the last known status, so status
//! queries keep working and a second checkout is refused.

use crate::error::StoreError;
use crate::record::{SimulationRecord, SimulationSummary};
use crate::status::SimulationStatus;
use parking_lot::Mutex;
use std::collections::HashMap;
use townsim_types::SimulationId;
use tracing::debug;

#[derive(Debug)]
enum Slot {
    Available(Box<SimulationRecord>),
    CheckedOut { status: SimulationStatus },
}

/// Thread-safe map from [`SimulationId`] to [`SimulationRecord`].
#[derive(Debug, Default)]
pub struct SimulationStore {
    slots: Mutex<HashMap<SimulationId, Slot>>,
}

impl SimulationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new record.
    pub fn insert(&self, record: SimulationRecord) -> Result<(), StoreError> {
        let mut slots = self.slots.lock();
        let id = record.id().clone();
        if slots.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        debug!(simulation = %id, "Stored simulation");
        slots.insert(id, Slot::Available(Box::new(record)));
        Ok(())
    }

    /// Last known status, including for checked-out records.
    pub fn status(&self, id: &SimulationId) -> Result<SimulationStatus, StoreError> {
        match self.slots.lock().get(id) {
            Some(Slot::Available(record)) => Ok(record.status()),
            Some(Slot::CheckedOut { status }) => Ok(*status),
            None => Err(StoreError::NotFound(id.clone())),
        }
    }

    /// Progress summary of a record that is not checked out.
    pub fn snapshot(&self, id: &SimulationId) -> Result<SimulationSummary, StoreError> {
        match self.slots.lock().get(id) {
            Some(Slot::Available(record)) => Ok(record.summary()),
            Some(Slot::CheckedOut { .. }) => Err(StoreError::CheckedOut(id.clone())),
            None => Err(StoreError::NotFound(id.clone())),
        }
    }

    /// Take exclusive ownership of a record.
    pub fn checkout(&self, id: &SimulationId) -> Result<SimulationRecord, StoreError> {
        let mut slots = self.slots.lock();
        let slot = slots
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let status = match slot {
            Slot::Available(record) => record.status(),
            Slot::CheckedOut { .. } => return Err(StoreError::CheckedOut(id.clone())),
        };

        match std::mem::replace(slot, Slot::CheckedOut { status }) {
            Slot::Available(record) => {
                debug!(simulation = %id, %status, "Checked out simulation");
                Ok(*record)
            }
            Slot::CheckedOut { .. } => Err(StoreError::CheckedOut(id.clone())),
        }
    }

    /// Return a checked-out record.
    ///
    /// Fails if the identifier was discarded meanwhile or is not checked out.
    pub fn checkin(&self, record: SimulationRecord) -> Result<(), StoreError> {
        let mut slots = self.slots.lock();
        let id = record.id().clone();
        match slots.get_mut(&id) {
            Some(slot @ Slot::CheckedOut { .. }) => {
                debug!(simulation = %id, status = %record.status(), "Checked in simulation");
                *slot = Slot::Available(Box::new(record));
                Ok(())
            }
            Some(Slot::Available(_)) => Err(StoreError::AlreadyExists(id)),
            None => Err(StoreError::NotFound(id)),
        }
    }

    /// Forget a record. Discarding a checked-out record makes its checkin fail.
    pub fn discard(&self, id: &SimulationId) -> Result<(), StoreError> {
        self.slots
            .lock()
            .remove(id)
            .map(|_| debug!(simulation = %id, "Discarded simulation"))
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Identifiers of every stored run, sorted.
    pub fn ids(&self) -> Vec<SimulationId> {
        let mut ids: Vec<SimulationId> = self.slots.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}
