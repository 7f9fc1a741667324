//! Domain layer: scheduling services and their command types.
//!
//! Services own the business rules and talk to storage through the
//! repository traits; nothing in here knows about HTTP.

pub mod appointment_service;
pub mod client_service;
pub mod commands;
pub mod crew_service;
pub mod import_service;
pub mod realign_service;
pub mod settings_service;
pub mod time_grid;

pub use appointment_service::{AppointmentError, AppointmentService};
pub use client_service::ClientService;
pub use crew_service::CrewService;
pub use import_service::ImportService;
pub use realign_service::RealignService;
pub use settings_service::SettingsService;

/// Mint a prefixed record id, e.g. `apt-550e8400-e29b-...`.
pub(crate) fn next_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}
