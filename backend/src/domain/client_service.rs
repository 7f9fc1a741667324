//! Client record management.

use anyhow::Result;
use chrono::Utc;
use log::info;

use shared::{Client, CreateClientRequest, UpdateClientRequest};

use crate::domain::next_id;
use crate::storage::memory::ClientRepository;
use crate::storage::traits::ClientStorage;

/// Service for managing client records.
#[derive(Clone)]
pub struct ClientService {
    repository: ClientRepository,
}

impl ClientService {
    /// Create a new ClientService.
    pub fn new(repository: ClientRepository) -> Self {
        Self { repository }
    }

    /// List all clients.
    pub fn list(&self) -> Result<Vec<Client>> {
        self.repository.list_clients()
    }

    /// Get a client by ID.
    pub fn get(&self, id: &str) -> Result<Option<Client>> {
        self.repository.get_client(id)
    }

    /// Look up a client by name, case-insensitively, ignoring
    /// surrounding whitespace.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Client>> {
        self.repository.find_client_by_name(name)
    }

    /// Create a new client record.
    pub fn create(&self, request: CreateClientRequest) -> Result<Client> {
        let client = Client {
            id: next_id("client"),
            name: request.name,
            phone: request.phone,
            email: request.email,
            address: request.address,
            city: request.city,
            state: request.state,
            zip: request.zip,
            sqft: request.sqft,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            care_instructions: request.care_instructions,
            images: request.images.unwrap_or_default(),
            created_at: Utc::now().to_rfc3339(),
        };
        self.repository.store_client(&client)?;
        info!("Created client {} ({})", client.name, client.id);
        Ok(client)
    }

    /// Shallow-merge the provided fields into an existing client.
    pub fn update(&self, id: &str, request: UpdateClientRequest) -> Result<Option<Client>> {
        let mut client = match self.repository.get_client(id)? {
            Some(client) => client,
            None => return Ok(None),
        };

        if let Some(name) = request.name {
            client.name = name;
        }
        if let Some(phone) = request.phone {
            client.phone = phone;
        }
        if let Some(email) = request.email {
            client.email = email;
        }
        if let Some(address) = request.address {
            client.address = address;
        }
        if let Some(city) = request.city {
            client.city = city;
        }
        if let Some(state) = request.state {
            client.state = state;
        }
        if let Some(zip) = request.zip {
            client.zip = zip;
        }
        if let Some(sqft) = request.sqft {
            client.sqft = sqft;
        }
        if let Some(bedrooms) = request.bedrooms {
            client.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = request.bathrooms {
            client.bathrooms = bathrooms;
        }
        if let Some(care_instructions) = request.care_instructions {
            client.care_instructions = care_instructions;
        }
        if let Some(images) = request.images {
            client.images = images;
        }

        self.repository.update_client(&client)?;
        Ok(Some(client))
    }

    /// Delete a client. Returns false when it does not exist.
    pub fn delete(&self, id: &str) -> Result<bool> {
        self.repository.delete_client(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryConnection;
    use std::sync::Arc;

    fn setup_service() -> ClientService {
        ClientService::new(ClientRepository::new(Arc::new(MemoryConnection::new())))
    }

    fn create_request(name: &str) -> CreateClientRequest {
        CreateClientRequest {
            name: name.to_string(),
            phone: "(816) 555-2201".to_string(),
            email: "contact@example.com".to_string(),
            address: "401 Main St".to_string(),
            city: "Kansas City".to_string(),
            state: "MO".to_string(),
            zip: "64105".to_string(),
            sqft: 1800,
            bedrooms: 3,
            bathrooms: 2,
            care_instructions: "Key under the mat".to_string(),
            images: None,
        }
    }

    #[test]
    fn test_create_assigns_prefixed_id() {
        let service = setup_service();
        let client = service.create(create_request("Acme Corp")).unwrap();
        assert!(client.id.starts_with("client-"));
        assert!(client.images.is_empty());
    }

    #[test]
    fn test_find_by_name_ignores_case_and_whitespace() {
        let service = setup_service();
        service.create(create_request("Acme Corp")).unwrap();

        let found = service.find_by_name("  acme corp ").unwrap();
        assert_eq!(found.map(|c| c.name), Some("Acme Corp".to_string()));
        assert!(service.find_by_name("Acme Inc").unwrap().is_none());
    }

    #[test]
    fn test_update_merges_only_provided_fields() {
        let service = setup_service();
        let client = service.create(create_request("Acme Corp")).unwrap();

        let updated = service
            .update(
                &client.id,
                UpdateClientRequest {
                    phone: Some("(816) 555-9999".to_string()),
                    ..UpdateClientRequest::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.phone, "(816) 555-9999");
        assert_eq!(updated.address, "401 Main St");
    }
}
