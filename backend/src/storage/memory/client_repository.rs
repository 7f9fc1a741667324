use std::sync::Arc;

use anyhow::Result;
use shared::Client;

use super::connection::MemoryConnection;
use crate::storage::traits::ClientStorage;

/// In-memory client repository.
#[derive(Clone)]
pub struct ClientRepository {
    connection: Arc<MemoryConnection>,
}

impl ClientRepository {
    /// Create a new client repository on the shared connection.
    pub fn new(connection: Arc<MemoryConnection>) -> Self {
        Self { connection }
    }
}

impl ClientStorage for ClientRepository {
    fn store_client(&self, client: &Client) -> Result<()> {
        let mut state = self.connection.state()?;
        state.clients.push(client.clone());
        Ok(())
    }

    fn get_client(&self, id: &str) -> Result<Option<Client>> {
        let state = self.connection.state()?;
        Ok(state.clients.iter().find(|c| c.id == id).cloned())
    }

    fn list_clients(&self) -> Result<Vec<Client>> {
        let state = self.connection.state()?;
        Ok(state.clients.clone())
    }

    fn update_client(&self, client: &Client) -> Result<bool> {
        let mut state = self.connection.state()?;
        match state.clients.iter_mut().find(|c| c.id == client.id) {
            Some(existing) => {
                *existing = client.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_client(&self, id: &str) -> Result<bool> {
        let mut state = self.connection.state()?;
        let before = state.clients.len();
        state.clients.retain(|c| c.id != id);
        Ok(state.clients.len() < before)
    }

    fn find_client_by_name(&self, name: &str) -> Result<Option<Client>> {
        let needle = name.trim().to_lowercase();
        let state = self.connection.state()?;
        Ok(state
            .clients
            .iter()
            .find(|c| c.name.trim().to_lowercase() == needle)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_client(id: &str, name: &str) -> Client {
        Client {
            id: id.to_string(),
            name: name.to_string(),
            phone: String::new(),
            email: String::new(),
            address: "1234 Oak Street".to_string(),
            city: "Kansas City".to_string(),
            state: "MO".to_string(),
            zip: "64108".to_string(),
            sqft: 0,
            bedrooms: 0,
            bathrooms: 0,
            care_instructions: String::new(),
            images: vec![],
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let repo = ClientRepository::new(Arc::new(MemoryConnection::new()));
        repo.store_client(&make_client("client-1", "Acme Corp")).unwrap();

        let found = repo.find_client_by_name("  acme corp ").unwrap();
        assert_eq!(found.map(|c| c.id), Some("client-1".to_string()));
        assert!(repo.find_client_by_name("Acme Inc").unwrap().is_none());
    }
}
