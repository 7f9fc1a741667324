use std::sync::Arc;

use anyhow::Result;
use shared::Crew;

use super::connection::MemoryConnection;
use crate::storage::traits::CrewStorage;

/// In-memory crew repository.
#[derive(Clone)]
pub struct CrewRepository {
    connection: Arc<MemoryConnection>,
}

impl CrewRepository {
    /// Create a new crew repository on the shared connection.
    pub fn new(connection: Arc<MemoryConnection>) -> Self {
        Self { connection }
    }
}

impl CrewStorage for CrewRepository {
    fn store_crew(&self, crew: &Crew) -> Result<()> {
        let mut state = self.connection.state()?;
        state.crews.push(crew.clone());
        Ok(())
    }

    fn get_crew(&self, id: &str) -> Result<Option<Crew>> {
        let state = self.connection.state()?;
        Ok(state.crews.iter().find(|c| c.id == id).cloned())
    }

    fn list_crews(&self) -> Result<Vec<Crew>> {
        let state = self.connection.state()?;
        Ok(state.crews.clone())
    }

    fn update_crew(&self, crew: &Crew) -> Result<bool> {
        let mut state = self.connection.state()?;
        match state.crews.iter_mut().find(|c| c.id == crew.id) {
            Some(existing) => {
                *existing = crew.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_crew(&self, id: &str) -> Result<bool> {
        let mut state = self.connection.state()?;
        let before = state.crews.len();
        state.crews.retain(|c| c.id != id);
        Ok(state.crews.len() < before)
    }

    fn find_crew_by_name(&self, name: &str) -> Result<Option<Crew>> {
        let state = self.connection.state()?;
        Ok(state.crews.iter().find(|c| c.name == name).cloned())
    }
}
