use std::sync::Arc;

use anyhow::Result;
use log::debug;
use shared::Appointment;

use super::connection::MemoryConnection;
use crate::domain::commands::appointments::AppointmentListQuery;
use crate::storage::traits::AppointmentStorage;

/// In-memory appointment repository.
#[derive(Clone)]
pub struct AppointmentRepository {
    connection: Arc<MemoryConnection>,
}

impl AppointmentRepository {
    /// Create a new appointment repository on the shared connection.
    pub fn new(connection: Arc<MemoryConnection>) -> Self {
        Self { connection }
    }
}

impl AppointmentStorage for AppointmentRepository {
    fn store_appointment(&self, appointment: &Appointment) -> Result<()> {
        let mut state = self.connection.state()?;
        state.appointments.push(appointment.clone());
        Ok(())
    }

    fn get_appointment(&self, id: &str) -> Result<Option<Appointment>> {
        let state = self.connection.state()?;
        Ok(state.appointments.iter().find(|a| a.id == id).cloned())
    }

    fn list_appointments(&self, query: &AppointmentListQuery) -> Result<Vec<Appointment>> {
        let state = self.connection.state()?;
        let mut result: Vec<Appointment> = state
            .appointments
            .iter()
            .filter(|a| query.date.as_deref().map_or(true, |d| a.date == d))
            .filter(|a| query.crew_id.as_deref().map_or(true, |c| a.crew_id == c))
            .filter(|a| query.client_id.as_deref().map_or(true, |c| a.client_id == c))
            .filter(|a| query.status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.start_minutes().cmp(&b.start_minutes()))
        });
        debug!("Listed {} appointments for query {:?}", result.len(), query);
        Ok(result)
    }

    fn update_appointment(&self, appointment: &Appointment) -> Result<bool> {
        let mut state = self.connection.state()?;
        match state.appointments.iter_mut().find(|a| a.id == appointment.id) {
            Some(existing) => {
                *existing = appointment.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_appointment(&self, id: &str) -> Result<bool> {
        let mut state = self.connection.state()?;
        let before = state.appointments.len();
        state.appointments.retain(|a| a.id != id);
        Ok(state.appointments.len() < before)
    }

    fn distinct_dates(&self) -> Result<Vec<String>> {
        let state = self.connection.state()?;
        let mut dates: Vec<String> = state.appointments.iter().map(|a| a.date.clone()).collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::AppointmentStatus;

    fn setup_repo() -> AppointmentRepository {
        AppointmentRepository::new(Arc::new(MemoryConnection::new()))
    }

    fn make_appointment(id: &str, date: &str, hour: u32, minute: u32) -> Appointment {
        Appointment {
            id: id.to_string(),
            client_id: "client-1".to_string(),
            crew_id: "crew-1".to_string(),
            date: date.to_string(),
            start_hour: hour,
            start_minute: minute,
            duration_minutes: 60,
            status: AppointmentStatus::Scheduled,
            tasks: vec![],
            notes: String::new(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_list_is_sorted_by_date_then_start() {
        let repo = setup_repo();
        repo.store_appointment(&make_appointment("b", "2026-02-11", 8, 0)).unwrap();
        repo.store_appointment(&make_appointment("c", "2026-02-10", 12, 30)).unwrap();
        repo.store_appointment(&make_appointment("a", "2026-02-10", 9, 15)).unwrap();

        let listed = repo.list_appointments(&AppointmentListQuery::default()).unwrap();
        let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let repo = setup_repo();
        let mut apt = make_appointment("a", "2026-02-10", 9, 0);
        apt.crew_id = "crew-2".to_string();
        repo.store_appointment(&apt).unwrap();
        repo.store_appointment(&make_appointment("b", "2026-02-10", 10, 0)).unwrap();

        let query = AppointmentListQuery {
            date: Some("2026-02-10".to_string()),
            crew_id: Some("crew-2".to_string()),
            ..AppointmentListQuery::default()
        };
        let listed = repo.list_appointments(&query).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "a");
    }

    #[test]
    fn test_update_missing_returns_false() {
        let repo = setup_repo();
        let apt = make_appointment("ghost", "2026-02-10", 9, 0);
        assert!(!repo.update_appointment(&apt).unwrap());
    }

    #[test]
    fn test_distinct_dates_sorted_and_deduped() {
        let repo = setup_repo();
        repo.store_appointment(&make_appointment("a", "2026-02-11", 9, 0)).unwrap();
        repo.store_appointment(&make_appointment("b", "2026-02-10", 9, 0)).unwrap();
        repo.store_appointment(&make_appointment("c", "2026-02-10", 11, 0)).unwrap();

        assert_eq!(
            repo.distinct_dates().unwrap(),
            vec!["2026-02-10".to_string(), "2026-02-11".to_string()]
        );
    }
}
