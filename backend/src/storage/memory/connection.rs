//! Shared in-memory store state.
//!
//! One `MemoryConnection` is constructed at process start and handed to
//! every repository by `Arc`; there is no module-level global. Access is
//! serialized through a single mutex, which matches the intended
//! single-writer execution model: no transactions span multiple record
//! writes and the last writer wins.

use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use shared::{Appointment, BusinessSettings, Client, Crew};

/// All record collections behind one lock.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub appointments: Vec<Appointment>,
    pub crews: Vec<Crew>,
    pub clients: Vec<Client>,
    pub settings: Option<BusinessSettings>,
}

/// Connection to the in-memory store.
pub struct MemoryConnection {
    state: Mutex<StoreState>,
}

impl MemoryConnection {
    /// Create an empty store with default business settings.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                settings: Some(BusinessSettings::default()),
                ..StoreState::default()
            }),
        }
    }

    /// Lock the store state. Surfaces a poisoned mutex as an error
    /// instead of propagating the panic.
    pub(crate) fn state(&self) -> Result<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("in-memory store mutex poisoned"))
    }
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}
