//! Crew and crew-member management.
//!
//! Enforces the single-leader invariant: a crew has at most one member
//! with role `Lider`, and assigning a second one demotes the existing
//! leader (last write wins). Also owns the "Sin asignar" sentinel crew
//! that receives imported appointments.

use anyhow::Result;
use log::{info, warn};

use shared::{
    AddCrewMemberRequest, Crew, CrewMember, CrewRole, CreateCrewRequest, UpdateCrewMemberRequest,
    UpdateCrewRequest,
};

use crate::domain::next_id;
use crate::storage::memory::CrewRepository;
use crate::storage::traits::CrewStorage;

/// Name of the sentinel crew that holds imported appointments until a
/// real crew is assigned.
pub const UNASSIGNED_CREW_NAME: &str = "Sin asignar";
const UNASSIGNED_CREW_COLOR: &str = "#888888";

/// Service for managing crews and their members.
#[derive(Clone)]
pub struct CrewService {
    repository: CrewRepository,
}

impl CrewService {
    /// Create a new CrewService.
    pub fn new(repository: CrewRepository) -> Self {
        Self { repository }
    }

    /// List all crews.
    pub fn list(&self) -> Result<Vec<Crew>> {
        self.repository.list_crews()
    }

    /// Get a crew by ID.
    pub fn get(&self, id: &str) -> Result<Option<Crew>> {
        self.repository.get_crew(id)
    }

    /// Create a new crew with no members.
    pub fn create(&self, request: CreateCrewRequest) -> Result<Crew> {
        let crew = Crew {
            id: next_id("crew"),
            name: request.name,
            members: Vec::new(),
            color: request.color,
        };
        self.repository.store_crew(&crew)?;
        info!("Created crew {} ({})", crew.name, crew.id);
        Ok(crew)
    }

    /// Update a crew's name and/or color.
    pub fn update(&self, id: &str, request: UpdateCrewRequest) -> Result<Option<Crew>> {
        let mut crew = match self.repository.get_crew(id)? {
            Some(crew) => crew,
            None => return Ok(None),
        };
        if let Some(name) = request.name {
            crew.name = name;
        }
        if let Some(color) = request.color {
            crew.color = color;
        }
        self.repository.update_crew(&crew)?;
        Ok(Some(crew))
    }

    /// Delete a crew. Returns false when it does not exist.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self.repository.delete_crew(id)?;
        if deleted {
            info!("Deleted crew {}", id);
        } else {
            warn!("Attempted to delete non-existent crew {}", id);
        }
        Ok(deleted)
    }

    /// Add a member to a crew. Assigning a `Lider` demotes any existing
    /// leader to `Empleado General`.
    pub fn add_member(&self, crew_id: &str, request: AddCrewMemberRequest) -> Result<Option<Crew>> {
        let mut crew = match self.repository.get_crew(crew_id)? {
            Some(crew) => crew,
            None => return Ok(None),
        };

        if request.role == CrewRole::Lider {
            Self::demote_leaders(&mut crew, None);
        }

        crew.members.push(CrewMember {
            id: next_id("m"),
            name: request.name,
            role: request.role,
            phone: request.phone,
            avatar: request.avatar,
            documents: request.documents.unwrap_or_default(),
        });
        self.repository.update_crew(&crew)?;
        Ok(Some(crew))
    }

    /// Update a member, searching across all crews. Promoting a member
    /// to `Lider` demotes any other leader in the same crew.
    pub fn update_member(
        &self,
        member_id: &str,
        request: UpdateCrewMemberRequest,
    ) -> Result<Option<CrewMember>> {
        for mut crew in self.repository.list_crews()? {
            let Some(index) = crew.members.iter().position(|m| m.id == member_id) else {
                continue;
            };

            if request.role == Some(CrewRole::Lider) {
                Self::demote_leaders(&mut crew, Some(member_id));
            }

            let member = &mut crew.members[index];
            if let Some(name) = request.name {
                member.name = name;
            }
            if let Some(role) = request.role {
                member.role = role;
            }
            if let Some(phone) = request.phone {
                member.phone = phone;
            }
            if let Some(avatar) = request.avatar {
                member.avatar = Some(avatar);
            }
            if let Some(documents) = request.documents {
                member.documents = documents;
            }
            let updated = member.clone();
            self.repository.update_crew(&crew)?;
            return Ok(Some(updated));
        }
        Ok(None)
    }

    /// Remove a member, searching across all crews. Returns false when
    /// no crew holds the member.
    pub fn delete_member(&self, member_id: &str) -> Result<bool> {
        for mut crew in self.repository.list_crews()? {
            let before = crew.members.len();
            crew.members.retain(|m| m.id != member_id);
            if crew.members.len() < before {
                self.repository.update_crew(&crew)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Get the sentinel crew for imported appointments, creating it on
    /// first use.
    pub fn get_or_create_unassigned(&self) -> Result<Crew> {
        if let Some(crew) = self.repository.find_crew_by_name(UNASSIGNED_CREW_NAME)? {
            return Ok(crew);
        }
        let crew = Crew {
            id: next_id("crew"),
            name: UNASSIGNED_CREW_NAME.to_string(),
            members: Vec::new(),
            color: UNASSIGNED_CREW_COLOR.to_string(),
        };
        self.repository.store_crew(&crew)?;
        info!("Created unassigned sentinel crew {}", crew.id);
        Ok(crew)
    }
}

impl CrewService {
    /// Demote every leader except `keep` to `Empleado General`.
    fn demote_leaders(crew: &mut Crew, keep: Option<&str>) {
        for member in crew.members.iter_mut() {
            if member.role == CrewRole::Lider && keep.map_or(true, |id| member.id != id) {
                member.role = CrewRole::EmpleadoGeneral;
            }
        }
    }
}
