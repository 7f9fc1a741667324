//! Scheduling backend for a cleaning business: appointment store,
//! schedule realignment engine, CSV import normalizer and the REST API
//! on top of them.

pub mod domain;
pub mod rest;
pub mod seed;
pub mod storage;

#[cfg(test)]
pub(crate) fn test_state() -> rest::AppState {
    use domain::{
        AppointmentService, ClientService, CrewService, ImportService, RealignService,
        SettingsService,
    };
    use std::sync::Arc;
    use storage::memory::{
        AppointmentRepository, ClientRepository, CrewRepository, MemoryConnection,
        SettingsRepository,
    };

    let connection = Arc::new(MemoryConnection::new());
    let appointments = AppointmentService::new(AppointmentRepository::new(connection.clone()));
    let crews = CrewService::new(CrewRepository::new(connection.clone()));
    let clients = ClientService::new(ClientRepository::new(connection.clone()));
    let settings = SettingsService::new(SettingsRepository::new(connection.clone()));
    let realign = RealignService::new(
        AppointmentRepository::new(connection.clone()),
        CrewRepository::new(connection.clone()),
        SettingsRepository::new(connection),
    );
    let import = ImportService::new(appointments.clone(), clients.clone(), crews.clone());
    rest::AppState::new(appointments, crews, clients, settings, realign, import)
}
