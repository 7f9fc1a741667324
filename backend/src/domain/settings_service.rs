//! Business settings management.

use anyhow::Result;
use log::info;

use shared::{BusinessSettings, UpdateSettingsRequest};

use crate::storage::memory::SettingsRepository;
use crate::storage::traits::SettingsStorage;

/// Service for the single process-wide settings record.
#[derive(Clone)]
pub struct SettingsService {
    repository: SettingsRepository,
}

impl SettingsService {
    /// Create a new SettingsService.
    pub fn new(repository: SettingsRepository) -> Self {
        Self { repository }
    }

    /// Get the current settings.
    pub fn get(&self) -> Result<BusinessSettings> {
        self.repository.get_settings()
    }

    /// Shallow-merge the provided fields into the current settings and
    /// return the merged record.
    pub fn update(&self, request: UpdateSettingsRequest) -> Result<BusinessSettings> {
        let mut settings = self.repository.get_settings()?;

        if let Some(business_name) = request.business_name {
            settings.business_name = business_name;
        }
        if let Some(phone) = request.phone {
            settings.phone = phone;
        }
        if let Some(email) = request.email {
            settings.email = email;
        }
        if let Some(service_area) = request.service_area {
            settings.service_area = service_area;
        }
        if let Some(buffer_minutes) = request.buffer_minutes {
            settings.buffer_minutes = buffer_minutes;
        }
        if let Some(auto_optimize) = request.auto_optimize {
            settings.auto_optimize = auto_optimize;
        }
        if let Some(work_start_hour) = request.work_start_hour {
            settings.work_start_hour = work_start_hour;
        }
        if let Some(work_end_hour) = request.work_end_hour {
            settings.work_end_hour = work_end_hour;
        }
        if let Some(notify_new_booking) = request.notify_new_booking {
            settings.notify_new_booking = notify_new_booking;
        }
        if let Some(notify_crew_status) = request.notify_crew_status {
            settings.notify_crew_status = notify_crew_status;
        }
        if let Some(notify_conflicts) = request.notify_conflicts {
            settings.notify_conflicts = notify_conflicts;
        }

        self.repository.put_settings(&settings)?;
        info!("Updated business settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryConnection;
    use std::sync::Arc;

    fn setup_service() -> SettingsService {
        SettingsService::new(SettingsRepository::new(Arc::new(MemoryConnection::new())))
    }

    #[test]
    fn test_defaults_are_seeded() {
        let service = setup_service();
        let settings = service.get().unwrap();
        assert_eq!(settings.business_name, "AllClean Masters");
        assert_eq!(settings.buffer_minutes, 30);
        assert_eq!(settings.work_start_hour, 6);
        assert_eq!(settings.work_end_hour, 20);
    }

    #[test]
    fn test_update_is_partial() {
        let service = setup_service();

        let updated = service
            .update(UpdateSettingsRequest {
                buffer_minutes: Some(45),
                ..UpdateSettingsRequest::default()
            })
            .unwrap();

        assert_eq!(updated.buffer_minutes, 45);
        assert_eq!(updated.business_name, "AllClean Masters");
        // Persisted, not just returned.
        assert_eq!(service.get().unwrap().buffer_minutes, 45);
    }
}
