use std::sync::Arc;

use anyhow::Result;
use shared::BusinessSettings;

use super::connection::MemoryConnection;
use crate::storage::traits::SettingsStorage;

/// In-memory settings repository. Settings are a singleton record,
/// seeded with defaults when the connection is created.
#[derive(Clone)]
pub struct SettingsRepository {
    connection: Arc<MemoryConnection>,
}

impl SettingsRepository {
    /// Create a new settings repository on the shared connection.
    pub fn new(connection: Arc<MemoryConnection>) -> Self {
        Self { connection }
    }
}

impl SettingsStorage for SettingsRepository {
    fn get_settings(&self) -> Result<BusinessSettings> {
        let state = self.connection.state()?;
        Ok(state.settings.clone().unwrap_or_default())
    }

    fn put_settings(&self, settings: &BusinessSettings) -> Result<()> {
        let mut state = self.connection.state()?;
        state.settings = Some(settings.clone());
        Ok(())
    }
}
