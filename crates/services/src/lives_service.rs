use std::sync::Arc;

use quest_core::model::Lives;
use storage::records::save_json;
use storage::{KeyValueStore, StoreKey};

use crate::Clock;
use crate::error::LivesError;
use crate::events::{StateChange, StateEvents};
use crate::stored::load_or_absent;

/// Result of spending a life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivesUpdate {
    pub lives: Lives,
    /// Set when the decrement left no lives.
    pub exhausted: bool,
}

/// Sole owner of the `lives` slot.
#[derive(Clone)]
pub struct LivesService {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
    events: StateEvents,
}

impl LivesService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>, events: StateEvents) -> Self {
        Self {
            clock,
            store,
            events,
        }
    }

    /// Load today's lives, refilling them on the first read of a new day.
    ///
    /// A missing or malformed record is replaced by a full allowance.
    ///
    /// # Errors
    ///
    /// Returns `LivesError::Storage` if the store cannot be read or written.
    pub async fn get_lives(&self) -> Result<Lives, LivesError> {
        let today = self.clock.today();
        let stored: Option<Lives> = load_or_absent(self.store.as_ref(), StoreKey::Lives).await?;

        match stored {
            Some(lives) if !lives.needs_reset(today) => Ok(lives),
            Some(lives) => {
                tracing::info!(
                    last_reset = %lives.last_reset(),
                    %today,
                    "refilling lives for a new day"
                );
                self.save(Lives::full(today)).await
            }
            None => {
                tracing::debug!(%today, "initializing lives");
                self.save(Lives::full(today)).await
            }
        }
    }

    /// Spend one life, persist it, and report whether none are left.
    ///
    /// Decrementing an empty record keeps it at zero.
    ///
    /// # Errors
    ///
    /// Returns `LivesError::Storage` if the record cannot be written.
    pub async fn decrement_lives(&self, lives: Lives) -> Result<LivesUpdate, LivesError> {
        let lives = self.save(lives.decremented()).await?;
        let exhausted = lives.is_exhausted();
        if exhausted {
            tracing::warn!("no lives remaining");
        } else {
            tracing::debug!(count = lives.count(), "life spent");
        }
        Ok(LivesUpdate { lives, exhausted })
    }

    /// Ensure the slot holds a record, without touching an existing one.
    ///
    /// # Errors
    ///
    /// Returns `LivesError::Storage` if the store cannot be read or written.
    pub async fn ensure_initialized(&self) -> Result<(), LivesError> {
        let stored: Option<Lives> = load_or_absent(self.store.as_ref(), StoreKey::Lives).await?;
        if stored.is_none() {
            self.save(Lives::full(self.clock.today())).await?;
        }
        Ok(())
    }

    async fn save(&self, lives: Lives) -> Result<Lives, LivesError> {
        save_json(self.store.as_ref(), StoreKey::Lives, &lives).await?;
        self.events.publish(StateChange::LivesChanged(lives));
        Ok(lives)
    }
}
