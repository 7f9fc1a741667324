//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are
//! **not** exposed over the public API. The REST layer is responsible
//! for mapping the public DTOs defined in the `shared` crate to these
//! internal types.

pub mod appointments {
    use shared::{Appointment, AppointmentStatus, AppointmentTask};

    /// Input for creating a new appointment. Status is always forced to
    /// `scheduled` by the service regardless of the caller.
    #[derive(Debug, Clone)]
    pub struct CreateAppointmentCommand {
        pub client_id: String,
        pub crew_id: String,
        pub date: String,
        pub start_hour: u32,
        pub start_minute: u32,
        pub duration_minutes: u32,
        /// Defaults to the global checklist template when `None`.
        pub tasks: Option<Vec<AppointmentTask>>,
        pub notes: Option<String>,
    }

    /// Shallow-merge patch for an existing appointment.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateAppointmentCommand {
        pub client_id: Option<String>,
        pub crew_id: Option<String>,
        pub date: Option<String>,
        pub start_hour: Option<u32>,
        pub start_minute: Option<u32>,
        pub duration_minutes: Option<u32>,
        pub status: Option<AppointmentStatus>,
        pub tasks: Option<Vec<AppointmentTask>>,
        pub notes: Option<String>,
    }

    /// Conjunctive (AND) filters for listing appointments.
    #[derive(Debug, Clone, Default)]
    pub struct AppointmentListQuery {
        pub date: Option<String>,
        pub crew_id: Option<String>,
        pub client_id: Option<String>,
        pub status: Option<AppointmentStatus>,
    }

    /// Outcome of a delete request. Completed appointments are never
    /// removed; the delete is downgraded to a cancellation instead.
    #[derive(Debug, Clone, PartialEq)]
    pub enum DeleteOutcome {
        Deleted,
        DowngradedToCancel(Appointment),
    }
}

pub mod realign {
    use shared::RealignChange;

    /// Input for a realignment run.
    #[derive(Debug, Clone, Default)]
    pub struct RealignCommand {
        /// ISO `YYYY-MM-DD`; when `None`, every distinct date present in
        /// the store is processed.
        pub date: Option<String>,
        /// When `Some`, only this crew's schedule is compacted
        /// (single-crew mode). `None` iterates every crew.
        pub crew_id: Option<String>,
    }

    /// Per-appointment audit trail of a realignment run.
    #[derive(Debug, Clone, Default)]
    pub struct RealignReport {
        pub changes: Vec<RealignChange>,
    }
}

pub mod import {
    /// Input for a CSV import run.
    #[derive(Debug, Clone)]
    pub struct ImportCsvCommand {
        /// Raw file text, headers in the first row.
        pub content: String,
    }

    /// Combined result of an import run: best-effort per row, so a
    /// partial success carries both the count and the row errors.
    #[derive(Debug, Clone, Default)]
    pub struct ImportReport {
        pub imported_count: usize,
        pub errors: Vec<String>,
    }
}
