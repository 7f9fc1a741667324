//! In-memory storage backend.
//!
//! The authoritative store for this system: one `MemoryConnection`
//! holding every collection behind a single lock, with per-collection
//! repositories layered on top.

mod appointment_repository;
mod client_repository;
mod connection;
mod crew_repository;
mod settings_repository;

pub use appointment_repository::AppointmentRepository;
pub use client_repository::ClientRepository;
pub use connection::MemoryConnection;
pub use crew_repository::CrewRepository;
pub use settings_repository::SettingsRepository;
