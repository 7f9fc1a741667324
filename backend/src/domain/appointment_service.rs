//! Appointment store operations and their per-operation invariants.
//!
//! This service is the sole mutator of appointment records. It enforces
//! the create/delete/cancel rules but deliberately applies **no**
//! status-transition guard on `update`/`set_status` — transition
//! validation beyond the cancel/delete rules is kept out of the store
//! layer on purpose (see DESIGN.md).

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use thiserror::Error;

use shared::{Appointment, AppointmentStatus, AppointmentTask};

use crate::domain::commands::appointments::{
    AppointmentListQuery, CreateAppointmentCommand, DeleteOutcome, UpdateAppointmentCommand,
};
use crate::domain::next_id;
use crate::storage::memory::AppointmentRepository;
use crate::storage::traits::AppointmentStorage;

/// Error taxonomy for appointment operations. `NotFound` and `Rejected`
/// are distinct caller-visible outcomes and must not be conflated.
#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("appointment not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// The global checklist template copied onto every new appointment that
/// does not bring its own task list.
pub fn default_tasks() -> Vec<AppointmentTask> {
    [
        "Vacuum all rooms",
        "Mop floors",
        "Clean bathrooms",
        "Dust surfaces",
        "Kitchen deep clean",
        "Empty trash cans",
    ]
    .iter()
    .map(|label| AppointmentTask {
        label: (*label).to_string(),
        done: false,
    })
    .collect()
}

/// Service for managing appointment records.
#[derive(Clone)]
pub struct AppointmentService {
    repository: AppointmentRepository,
}

impl AppointmentService {
    /// Create a new AppointmentService.
    pub fn new(repository: AppointmentRepository) -> Self {
        Self { repository }
    }

    /// Create a new appointment. Status always starts `scheduled` and
    /// tasks default from the global template when omitted.
    pub fn create(&self, command: CreateAppointmentCommand) -> Result<Appointment, AppointmentError> {
        let appointment = Appointment {
            id: next_id("apt"),
            client_id: command.client_id,
            crew_id: command.crew_id,
            date: command.date,
            start_hour: command.start_hour,
            start_minute: command.start_minute,
            duration_minutes: command.duration_minutes,
            status: AppointmentStatus::Scheduled,
            tasks: command.tasks.unwrap_or_else(default_tasks),
            notes: command.notes.unwrap_or_default(),
            created_at: Utc::now().to_rfc3339(),
        };

        self.repository.store_appointment(&appointment)?;
        info!(
            "Created appointment {} on {} at {:02}:{:02} for crew {}",
            appointment.id,
            appointment.date,
            appointment.start_hour,
            appointment.start_minute,
            appointment.crew_id
        );
        Ok(appointment)
    }

    /// Get an appointment by ID.
    pub fn get(&self, id: &str) -> Result<Appointment, AppointmentError> {
        self.repository
            .get_appointment(id)?
            .ok_or_else(|| AppointmentError::NotFound(id.to_string()))
    }

    /// List appointments with conjunctive filters, sorted ascending by
    /// date then start time.
    pub fn list(&self, query: &AppointmentListQuery) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.repository.list_appointments(query)?)
    }

    /// Shallow-merge the provided fields into an existing appointment.
    /// No cross-field validation is performed: changing the duration
    /// without recomputing downstream conflicts is the caller's concern.
    pub fn update(
        &self,
        id: &str,
        patch: UpdateAppointmentCommand,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointment = self.get(id)?;

        if let Some(client_id) = patch.client_id {
            appointment.client_id = client_id;
        }
        if let Some(crew_id) = patch.crew_id {
            appointment.crew_id = crew_id;
        }
        if let Some(date) = patch.date {
            appointment.date = date;
        }
        if let Some(start_hour) = patch.start_hour {
            appointment.start_hour = start_hour;
        }
        if let Some(start_minute) = patch.start_minute {
            appointment.start_minute = start_minute;
        }
        if let Some(duration_minutes) = patch.duration_minutes {
            appointment.duration_minutes = duration_minutes;
        }
        if let Some(status) = patch.status {
            appointment.status = status;
        }
        if let Some(tasks) = patch.tasks {
            appointment.tasks = tasks;
        }
        if let Some(notes) = patch.notes {
            appointment.notes = notes;
        }

        if !self.repository.update_appointment(&appointment)? {
            return Err(AppointmentError::NotFound(id.to_string()));
        }
        Ok(appointment)
    }

    /// Delete an appointment. Rejected outright while `in-progress`;
    /// a delete of a `completed` appointment is downgraded to a cancel
    /// so history is never erased.
    pub fn delete(&self, id: &str) -> Result<DeleteOutcome, AppointmentError> {
        let appointment = self.get(id)?;

        match appointment.status {
            AppointmentStatus::InProgress => {
                warn!("Refusing to delete in-progress appointment {}", id);
                Err(AppointmentError::Rejected(
                    "cannot delete an in-progress appointment".to_string(),
                ))
            }
            AppointmentStatus::Completed => {
                let cancelled = self.update(
                    id,
                    UpdateAppointmentCommand {
                        status: Some(AppointmentStatus::Cancelled),
                        ..UpdateAppointmentCommand::default()
                    },
                )?;
                info!("Downgraded delete of completed appointment {} to cancel", id);
                Ok(DeleteOutcome::DowngradedToCancel(cancelled))
            }
            _ => {
                if !self.repository.delete_appointment(id)? {
                    return Err(AppointmentError::NotFound(id.to_string()));
                }
                info!("Deleted appointment {}", id);
                Ok(DeleteOutcome::Deleted)
            }
        }
    }

    /// Cancel an appointment. Rejected while `in-progress`.
    pub fn cancel(&self, id: &str) -> Result<Appointment, AppointmentError> {
        let appointment = self.get(id)?;
        if appointment.status == AppointmentStatus::InProgress {
            warn!("Refusing to cancel in-progress appointment {}", id);
            return Err(AppointmentError::Rejected(
                "cannot cancel an in-progress appointment".to_string(),
            ));
        }
        self.update(
            id,
            UpdateAppointmentCommand {
                status: Some(AppointmentStatus::Cancelled),
                ..UpdateAppointmentCommand::default()
            },
        )
    }

    /// Set an appointment's status directly. No transition guard beyond
    /// the cancel/delete rules above.
    pub fn set_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        self.update(
            id,
            UpdateAppointmentCommand {
                status: Some(status),
                ..UpdateAppointmentCommand::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryConnection;
    use std::sync::Arc;

    fn setup_service() -> AppointmentService {
        let connection = Arc::new(MemoryConnection::new());
        AppointmentService::new(AppointmentRepository::new(connection))
    }

    fn create_command(date: &str, hour: u32, minute: u32) -> CreateAppointmentCommand {
        CreateAppointmentCommand {
            client_id: "client-1".to_string(),
            crew_id: "crew-1".to_string(),
            date: date.to_string(),
            start_hour: hour,
            start_minute: minute,
            duration_minutes: 90,
            tasks: None,
            notes: None,
        }
    }

    #[test]
    fn test_create_forces_scheduled_and_defaults_tasks() {
        let service = setup_service();
        let apt = service.create(create_command("2026-02-10", 8, 0)).unwrap();

        assert_eq!(apt.status, AppointmentStatus::Scheduled);
        assert_eq!(apt.tasks.len(), 6);
        assert!(apt.tasks.iter().all(|t| !t.done));
        assert!(apt.id.starts_with("apt-"));
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let service = setup_service();
        assert!(matches!(
            service.get("apt-ghost"),
            Err(AppointmentError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_is_shallow_merge() {
        let service = setup_service();
        let apt = service.create(create_command("2026-02-10", 8, 0)).unwrap();

        let updated = service
            .update(
                &apt.id,
                UpdateAppointmentCommand {
                    start_hour: Some(10),
                    notes: Some("gate code 4521".to_string()),
                    ..UpdateAppointmentCommand::default()
                },
            )
            .unwrap();

        assert_eq!(updated.start_hour, 10);
        assert_eq!(updated.start_minute, 0);
        assert_eq!(updated.notes, "gate code 4521");
        // Untouched fields survive the merge.
        assert_eq!(updated.duration_minutes, 90);
        assert_eq!(updated.created_at, apt.created_at);
    }

    #[test]
    fn test_delete_in_progress_is_rejected() {
        let service = setup_service();
        let apt = service.create(create_command("2026-02-10", 8, 0)).unwrap();
        service.set_status(&apt.id, AppointmentStatus::InProgress).unwrap();

        assert!(matches!(
            service.delete(&apt.id),
            Err(AppointmentError::Rejected(_))
        ));
        assert!(service.get(&apt.id).is_ok());
    }

    #[test]
    fn test_delete_completed_downgrades_to_cancel() {
        let service = setup_service();
        let apt = service.create(create_command("2026-02-10", 8, 0)).unwrap();
        service.set_status(&apt.id, AppointmentStatus::Completed).unwrap();

        let outcome = service.delete(&apt.id).unwrap();
        match outcome {
            DeleteOutcome::DowngradedToCancel(cancelled) => {
                assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
            }
            other => panic!("expected downgrade, got {:?}", other),
        }
        // The record still exists.
        assert_eq!(service.get(&apt.id).unwrap().status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_delete_scheduled_removes_record() {
        let service = setup_service();
        let apt = service.create(create_command("2026-02-10", 8, 0)).unwrap();

        assert_eq!(service.delete(&apt.id).unwrap(), DeleteOutcome::Deleted);
        assert!(matches!(
            service.get(&apt.id),
            Err(AppointmentError::NotFound(_))
        ));
    }

    #[test]
    fn test_cancel_in_progress_is_rejected() {
        let service = setup_service();
        let apt = service.create(create_command("2026-02-10", 8, 0)).unwrap();
        service.set_status(&apt.id, AppointmentStatus::InProgress).unwrap();

        assert!(matches!(
            service.cancel(&apt.id),
            Err(AppointmentError::Rejected(_))
        ));
    }

    #[test]
    fn test_cancel_scheduled_sets_cancelled() {
        let service = setup_service();
        let apt = service.create(create_command("2026-02-10", 8, 0)).unwrap();

        let cancelled = service.cancel(&apt.id).unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    }
}
