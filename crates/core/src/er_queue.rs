//! Emergency-room intake queue.
//!
//! Strict first-in-first-out: `dequeue` always serves the earliest arrival. The
//! `priority` carried by each intake is stored and shown but never used to reorder the
//! queue.

use crate::config::CoreConfig;
use crate::constants::FIRST_ER_ID;
use crate::error::{RecordError, RecordResult};
use crate::store::RecordStore;
use ward_flatfile::ErIntake;

#[derive(Debug)]
pub struct ErQueue {
    store: RecordStore<ErIntake>,
}

impl ErQueue {
    /// Loads the queue from the configured ER file.
    pub fn open(cfg: &CoreConfig) -> RecordResult<Self> {
        let store = RecordStore::open(cfg.er_queue_file(), FIRST_ER_ID)?;
        Ok(Self { store })
    }

    /// Adds an intake at the tail and returns its id. `priority` is not range checked.
    pub fn enqueue(&mut self, name: &str, priority: i32) -> RecordResult<u32> {
        let id = self.store.append_new(|id| ErIntake {
            id,
            name: name.to_owned(),
            priority,
        })?;

        tracing::info!("queued ER intake {} with priority {}", id, priority);
        Ok(id)
    }

    /// Removes and returns the earliest arrival.
    pub fn dequeue(&mut self) -> RecordResult<ErIntake> {
        let intake = self.store.pop_front()?.ok_or(RecordError::EmptyQueue)?;
        tracing::info!("processing ER intake {}", intake.id);
        Ok(intake)
    }

    /// Iterates intakes from head (next to be served) to tail.
    pub fn list(&self) -> impl Iterator<Item = &ErIntake> + '_ {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The id the next intake will receive.
    pub fn next_id(&self) -> Option<u32> {
        self.store.next_id()
    }
}
