//! Storage layer: abstraction traits plus the in-memory backend.

pub mod memory;
pub mod traits;

pub use traits::{AppointmentStorage, ClientStorage, CrewStorage, SettingsStorage};
