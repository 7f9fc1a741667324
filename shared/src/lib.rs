use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an appointment.
///
/// Serialized in kebab-case (`"in-progress"`) to stay compatible with
/// previously stored appointment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Anchors are jobs the realignment engine must never move: the crew
    /// is either already on site or already done.
    pub fn is_anchor(&self) -> bool {
        matches!(self, AppointmentStatus::InProgress | AppointmentStatus::Completed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::InProgress => "in-progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// One checklist item on an appointment. Copied from the global template
/// at creation time and mutated independently afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentTask {
    pub label: String,
    pub done: bool,
}

/// A scheduled cleaning job.
///
/// `date` is a plain `YYYY-MM-DD` string and the start time is kept as
/// separate hour/minute integers rather than a combined timestamp —
/// filtering and sort order are defined directly over those fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    pub crew_id: String,
    pub date: String,
    pub start_hour: u32,
    pub start_minute: u32,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    pub tasks: Vec<AppointmentTask>,
    pub notes: String,
    /// Creation timestamp (RFC 3339), immutable.
    pub created_at: String,
}

impl Appointment {
    /// Absolute start time in minutes since midnight.
    pub fn start_minutes(&self) -> u32 {
        self.start_hour * 60 + self.start_minute
    }

    /// Absolute end time in minutes since midnight.
    pub fn end_minutes(&self) -> u32 {
        self.start_minutes() + self.duration_minutes
    }
}

/// Role of a crew member. Closed enumeration: at most one `Lider` may
/// exist per crew at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrewRole {
    #[serde(rename = "Lider")]
    Lider,
    #[serde(rename = "Empleado General")]
    EmpleadoGeneral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    pub id: String,
    pub name: String,
    pub role: CrewRole,
    pub phone: String,
    pub avatar: Option<String>,
    pub documents: Vec<String>,
}

/// A named cleaning team with a display color and its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crew {
    pub id: String,
    pub name: String,
    pub members: Vec<CrewMember>,
    pub color: String,
}

/// A billing/service address with contact info and property details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub sqft: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub care_instructions: String,
    pub images: Vec<String>,
    pub created_at: String,
}

/// Process-wide business configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSettings {
    pub business_name: String,
    pub phone: String,
    pub email: String,
    pub service_area: String,
    /// Minimum gap, in minutes, the realignment engine preserves between
    /// consecutive jobs of the same crew.
    pub buffer_minutes: u32,
    pub auto_optimize: bool,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub notify_new_booking: bool,
    pub notify_crew_status: bool,
    pub notify_conflicts: bool,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            business_name: "AllClean Masters".to_string(),
            phone: "(816) 555-CLEAN".to_string(),
            email: "info@allcleanmasters.com".to_string(),
            service_area: "Kansas City Metro (KS & MO)".to_string(),
            buffer_minutes: 30,
            auto_optimize: true,
            work_start_hour: 6,
            work_end_hour: 20,
            notify_new_booking: true,
            notify_crew_status: true,
            notify_conflicts: true,
        }
    }
}

// --- Request / response DTOs -------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub client_id: String,
    pub crew_id: String,
    pub date: String,
    pub start_hour: u32,
    pub start_minute: u32,
    pub duration_minutes: u32,
    /// Defaults to the global checklist template when omitted.
    pub tasks: Option<Vec<AppointmentTask>>,
    pub notes: Option<String>,
}

/// Shallow-merge patch: every provided field overwrites the stored one,
/// absent fields are left untouched. No cross-field validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealignRequest {
    /// ISO `YYYY-MM-DD`. When omitted, every distinct date in the store
    /// is realigned.
    pub date: Option<String>,
    pub crew_id: Option<String>,
    /// Opt-in single-crew mode. By default the engine iterates every
    /// crew for the resolved dates even when `crew_id` is present,
    /// matching the historical behavior of the realign endpoint.
    pub single_crew: Option<bool>,
}

/// One start-time rewrite performed by the realignment engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealignChange {
    pub appointment_id: String,
    pub crew_id: String,
    pub date: String,
    /// `HH:MM` before the move.
    pub previous_start: String,
    /// `HH:MM` after the move.
    pub new_start: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealignResponse {
    pub success: bool,
    pub changes: Vec<RealignChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// Only `"csv"` is accepted.
    pub format: String,
    /// Raw file text.
    pub content: String,
}

/// Combined import outcome: the import never aborts wholesale once the
/// header row is validated, so callers always get the full per-row
/// error list next to the success count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub imported_count: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCrewRequest {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCrewRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCrewMemberRequest {
    pub name: String,
    pub role: CrewRole,
    pub phone: String,
    pub avatar: Option<String>,
    pub documents: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCrewMemberRequest {
    pub name: Option<String>,
    pub role: Option<CrewRole>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub documents: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub sqft: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub care_instructions: String,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub sqft: Option<u32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub care_instructions: Option<String>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub service_area: Option<String>,
    pub buffer_minutes: Option<u32>,
    pub auto_optimize: Option<bool>,
    pub work_start_hour: Option<u32>,
    pub work_end_hour: Option<u32>,
    pub notify_new_booking: Option<bool>,
    pub notify_crew_status: Option<bool>,
    pub notify_conflicts: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<AppointmentStatus>("\"cancelled\"").unwrap(),
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn test_crew_role_wire_format() {
        assert_eq!(serde_json::to_string(&CrewRole::Lider).unwrap(), "\"Lider\"");
        assert_eq!(
            serde_json::to_string(&CrewRole::EmpleadoGeneral).unwrap(),
            "\"Empleado General\""
        );
    }

    #[test]
    fn test_appointment_field_names_are_camel_case() {
        let apt = Appointment {
            id: "apt-1".to_string(),
            client_id: "client-1".to_string(),
            crew_id: "crew-1".to_string(),
            date: "2026-02-10".to_string(),
            start_hour: 8,
            start_minute: 30,
            duration_minutes: 120,
            status: AppointmentStatus::Scheduled,
            tasks: vec![],
            notes: String::new(),
            created_at: "2026-02-01T09:00:00Z".to_string(),
        };
        let json = serde_json::to_value(&apt).unwrap();
        assert!(json.get("clientId").is_some());
        assert!(json.get("startHour").is_some());
        assert!(json.get("durationMinutes").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_start_and_end_minutes() {
        let apt = Appointment {
            id: "apt-1".to_string(),
            client_id: "client-1".to_string(),
            crew_id: "crew-1".to_string(),
            date: "2026-02-10".to_string(),
            start_hour: 10,
            start_minute: 45,
            duration_minutes: 60,
            status: AppointmentStatus::Scheduled,
            tasks: vec![],
            notes: String::new(),
            created_at: "2026-02-01T09:00:00Z".to_string(),
        };
        assert_eq!(apt.start_minutes(), 645);
        assert_eq!(apt.end_minutes(), 705);
    }

    #[test]
    fn test_anchor_statuses() {
        assert!(AppointmentStatus::InProgress.is_anchor());
        assert!(AppointmentStatus::Completed.is_anchor());
        assert!(!AppointmentStatus::Scheduled.is_anchor());
        assert!(!AppointmentStatus::Cancelled.is_anchor());
    }
}
