//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work against
//! different backends without modification. The shipping backend is the
//! in-memory store (the authoritative store for this system — see
//! DESIGN.md); the traits keep the door open for a persistent one.

use anyhow::Result;
use shared::{Appointment, BusinessSettings, Client, Crew};

use crate::domain::commands::appointments::AppointmentListQuery;

/// Trait defining the interface for appointment storage operations.
///
/// Repositories hold records only; per-operation business invariants
/// (delete/cancel rules, status forcing) live in the appointment
/// service, not here.
pub trait AppointmentStorage: Send + Sync {
    /// Store a new appointment.
    fn store_appointment(&self, appointment: &Appointment) -> Result<()>;

    /// Retrieve a specific appointment by ID.
    fn get_appointment(&self, id: &str) -> Result<Option<Appointment>>;

    /// List appointments matching the query, sorted ascending by
    /// `(date, start_hour * 60 + start_minute)`.
    fn list_appointments(&self, query: &AppointmentListQuery) -> Result<Vec<Appointment>>;

    /// Replace an existing appointment record.
    /// Returns false when the record no longer exists.
    fn update_appointment(&self, appointment: &Appointment) -> Result<bool>;

    /// Delete an appointment by ID.
    /// Returns true if the appointment was found and deleted.
    fn delete_appointment(&self, id: &str) -> Result<bool>;

    /// Distinct set of dates that currently have appointments, in
    /// ascending order.
    fn distinct_dates(&self) -> Result<Vec<String>>;
}

/// Trait defining the interface for crew storage operations.
pub trait CrewStorage: Send + Sync {
    /// Store a new crew.
    fn store_crew(&self, crew: &Crew) -> Result<()>;

    /// Retrieve a specific crew by ID.
    fn get_crew(&self, id: &str) -> Result<Option<Crew>>;

    /// List all crews in insertion order.
    fn list_crews(&self) -> Result<Vec<Crew>>;

    /// Replace an existing crew record (including its member list).
    /// Returns false when the record no longer exists.
    fn update_crew(&self, crew: &Crew) -> Result<bool>;

    /// Delete a crew by ID. Returns true if it was found and deleted.
    fn delete_crew(&self, id: &str) -> Result<bool>;

    /// Find a crew by exact name.
    fn find_crew_by_name(&self, name: &str) -> Result<Option<Crew>>;
}

/// Trait defining the interface for client storage operations.
pub trait ClientStorage: Send + Sync {
    /// Store a new client.
    fn store_client(&self, client: &Client) -> Result<()>;

    /// Retrieve a specific client by ID.
    fn get_client(&self, id: &str) -> Result<Option<Client>>;

    /// List all clients in insertion order.
    fn list_clients(&self) -> Result<Vec<Client>>;

    /// Replace an existing client record.
    /// Returns false when the record no longer exists.
    fn update_client(&self, client: &Client) -> Result<bool>;

    /// Delete a client by ID. Returns true if it was found and deleted.
    fn delete_client(&self, id: &str) -> Result<bool>;

    /// Find a client by case-insensitive exact name (trimmed).
    fn find_client_by_name(&self, name: &str) -> Result<Option<Client>>;
}

/// Trait defining the interface for settings storage.
pub trait SettingsStorage: Send + Sync {
    /// Get the current business settings.
    fn get_settings(&self) -> Result<BusinessSettings>;

    /// Replace the business settings wholesale.
    fn put_settings(&self, settings: &BusinessSettings) -> Result<()>;
}
