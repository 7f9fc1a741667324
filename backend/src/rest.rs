//! REST layer: axum handlers mapping the public DTOs onto domain
//! services.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use shared::{
    AddCrewMemberRequest, AppointmentStatus, CreateAppointmentRequest, CreateClientRequest,
    CreateCrewRequest, ImportRequest, ImportResponse, RealignRequest, RealignResponse,
    UpdateAppointmentRequest, UpdateClientRequest, UpdateCrewMemberRequest, UpdateCrewRequest,
    UpdateSettingsRequest,
};

use crate::domain::commands::appointments::{
    AppointmentListQuery, CreateAppointmentCommand, DeleteOutcome, UpdateAppointmentCommand,
};
use crate::domain::commands::import::ImportCsvCommand;
use crate::domain::commands::realign::RealignCommand;
use crate::domain::{
    AppointmentError, AppointmentService, ClientService, CrewService, ImportService,
    RealignService, SettingsService,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub appointments: AppointmentService,
    pub crews: CrewService,
    pub clients: ClientService,
    pub settings: SettingsService,
    pub realign: RealignService,
    pub import: ImportService,
}

impl AppState {
    pub fn new(
        appointments: AppointmentService,
        crews: CrewService,
        clients: ClientService,
        settings: SettingsService,
        realign: RealignService,
        import: ImportService,
    ) -> Self {
        Self {
            appointments,
            crews,
            clients,
            settings,
            realign,
            import,
        }
    }
}

/// All API routes, to be nested under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route(
            "/appointments/:id",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route("/appointments/:id/cancel", post(cancel_appointment))
        .route("/realign", post(realign_schedule))
        .route("/import", post(import_appointments))
        .route("/crews", get(list_crews).post(create_crew))
        .route("/crews/:id", get(get_crew).put(update_crew).delete(delete_crew))
        .route("/crews/:id/members", post(add_crew_member))
        .route("/members/:id", put(update_crew_member).delete(delete_crew_member))
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/settings", get(get_settings).put(update_settings))
}

fn internal_error(err: anyhow::Error) -> Response {
    tracing::error!("Storage error: {:?}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
}

fn appointment_error(err: AppointmentError) -> Response {
    match err {
        AppointmentError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()).into_response(),
        AppointmentError::Rejected(_) => (StatusCode::FORBIDDEN, err.to_string()).into_response(),
        AppointmentError::Storage(inner) => internal_error(inner),
    }
}

/// Query parameters for the appointment list endpoint. Filters are
/// conjunctive.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQuery {
    pub date: Option<String>,
    pub crew_id: Option<String>,
    pub client_id: Option<String>,
    pub status: Option<AppointmentStatus>,
}

/// GET /api/appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentQuery>,
) -> impl IntoResponse {
    info!("GET /api/appointments - query: {:?}", query);

    let query = AppointmentListQuery {
        date: query.date,
        crew_id: query.crew_id,
        client_id: query.client_id,
        status: query.status,
    };
    match state.appointments.list(&query) {
        Ok(appointments) => (StatusCode::OK, Json(appointments)).into_response(),
        Err(e) => appointment_error(e),
    }
}

/// POST /api/appointments
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(request): Json<CreateAppointmentRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/appointments - client {} on {}",
        request.client_id, request.date
    );

    let command = CreateAppointmentCommand {
        client_id: request.client_id,
        crew_id: request.crew_id,
        date: request.date,
        start_hour: request.start_hour,
        start_minute: request.start_minute,
        duration_minutes: request.duration_minutes,
        tasks: request.tasks,
        notes: request.notes,
    };
    match state.appointments.create(command) {
        Ok(appointment) => (StatusCode::CREATED, Json(appointment)).into_response(),
        Err(e) => appointment_error(e),
    }
}

/// GET /api/appointments/:id
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/appointments/{}", id);

    match state.appointments.get(&id) {
        Ok(appointment) => (StatusCode::OK, Json(appointment)).into_response(),
        Err(e) => appointment_error(e),
    }
}

/// PUT /api/appointments/:id
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> impl IntoResponse {
    info!("PUT /api/appointments/{}", id);

    let patch = UpdateAppointmentCommand {
        client_id: request.client_id,
        crew_id: request.crew_id,
        date: request.date,
        start_hour: request.start_hour,
        start_minute: request.start_minute,
        duration_minutes: request.duration_minutes,
        status: request.status,
        tasks: request.tasks,
        notes: request.notes,
    };
    match state.appointments.update(&id, patch) {
        Ok(appointment) => (StatusCode::OK, Json(appointment)).into_response(),
        Err(e) => appointment_error(e),
    }
}

/// DELETE /api/appointments/:id
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/appointments/{}", id);

    match state.appointments.delete(&id) {
        Ok(DeleteOutcome::Deleted) => StatusCode::NO_CONTENT.into_response(),
        // Completed appointments are cancelled instead of removed; the
        // caller gets the surviving record back.
        Ok(DeleteOutcome::DowngradedToCancel(appointment)) => {
            (StatusCode::OK, Json(appointment)).into_response()
        }
        Err(e) => appointment_error(e),
    }
}

/// POST /api/appointments/:id/cancel
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/appointments/{}/cancel", id);

    match state.appointments.cancel(&id) {
        Ok(appointment) => (StatusCode::OK, Json(appointment)).into_response(),
        Err(e) => appointment_error(e),
    }
}

/// POST /api/realign
pub async fn realign_schedule(
    State(state): State<AppState>,
    Json(request): Json<RealignRequest>,
) -> impl IntoResponse {
    info!("POST /api/realign - request: {:?}", request);

    // The crew filter only applies in explicit single-crew mode; by
    // default every crew is compacted for the resolved dates.
    let crew_id = if request.single_crew.unwrap_or(false) {
        request.crew_id
    } else {
        None
    };
    let command = RealignCommand {
        date: request.date,
        crew_id,
    };
    match state.realign.realign(command) {
        Ok(report) => (
            StatusCode::OK,
            Json(RealignResponse {
                success: true,
                changes: report.changes,
            }),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

/// POST /api/import
pub async fn import_appointments(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> impl IntoResponse {
    info!("POST /api/import - format: {}", request.format);

    if request.format != "csv" {
        return (
            StatusCode::BAD_REQUEST,
            format!("unsupported import format: {}", request.format),
        )
            .into_response();
    }
    let command = ImportCsvCommand {
        content: request.content,
    };
    match state.import.import_csv(command) {
        Ok(report) => (
            StatusCode::OK,
            Json(ImportResponse {
                imported_count: report.imported_count,
                errors: report.errors,
            }),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/crews
pub async fn list_crews(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/crews");

    match state.crews.list() {
        Ok(crews) => (StatusCode::OK, Json(crews)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// POST /api/crews
pub async fn create_crew(
    State(state): State<AppState>,
    Json(request): Json<CreateCrewRequest>,
) -> impl IntoResponse {
    info!("POST /api/crews - name: {}", request.name);

    match state.crews.create(request) {
        Ok(crew) => (StatusCode::CREATED, Json(crew)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/crews/:id
pub async fn get_crew(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/crews/{}", id);

    match state.crews.get(&id) {
        Ok(Some(crew)) => (StatusCode::OK, Json(crew)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Crew not found").into_response(),
        Err(e) => internal_error(e),
    }
}

/// PUT /api/crews/:id
pub async fn update_crew(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCrewRequest>,
) -> impl IntoResponse {
    info!("PUT /api/crews/{}", id);

    match state.crews.update(&id, request) {
        Ok(Some(crew)) => (StatusCode::OK, Json(crew)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Crew not found").into_response(),
        Err(e) => internal_error(e),
    }
}

/// DELETE /api/crews/:id
pub async fn delete_crew(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/crews/{}", id);

    match state.crews.delete(&id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Crew not found").into_response(),
        Err(e) => internal_error(e),
    }
}

/// POST /api/crews/:id/members
pub async fn add_crew_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddCrewMemberRequest>,
) -> impl IntoResponse {
    info!("POST /api/crews/{}/members - name: {}", id, request.name);

    match state.crews.add_member(&id, request) {
        Ok(Some(crew)) => (StatusCode::CREATED, Json(crew)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Crew not found").into_response(),
        Err(e) => internal_error(e),
    }
}

/// PUT /api/members/:id
pub async fn update_crew_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCrewMemberRequest>,
) -> impl IntoResponse {
    info!("PUT /api/members/{}", id);

    match state.crews.update_member(&id, request) {
        Ok(Some(member)) => (StatusCode::OK, Json(member)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Member not found").into_response(),
        Err(e) => internal_error(e),
    }
}

/// DELETE /api/members/:id
pub async fn delete_crew_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/members/{}", id);

    match state.crews.delete_member(&id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Member not found").into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/clients
pub async fn list_clients(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/clients");

    match state.clients.list() {
        Ok(clients) => (StatusCode::OK, Json(clients)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// POST /api/clients
pub async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> impl IntoResponse {
    info!("POST /api/clients - name: {}", request.name);

    match state.clients.create(request) {
        Ok(client) => (StatusCode::CREATED, Json(client)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/clients/:id
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/clients/{}", id);

    match state.clients.get(&id) {
        Ok(Some(client)) => (StatusCode::OK, Json(client)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Client not found").into_response(),
        Err(e) => internal_error(e),
    }
}

/// PUT /api/clients/:id
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateClientRequest>,
) -> impl IntoResponse {
    info!("PUT /api/clients/{}", id);

    match state.clients.update(&id, request) {
        Ok(Some(client)) => (StatusCode::OK, Json(client)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Client not found").into_response(),
        Err(e) => internal_error(e),
    }
}

/// DELETE /api/clients/:id
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/clients/{}", id);

    match state.clients.delete(&id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Client not found").into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings");

    match state.settings.get() {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// PUT /api/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings");

    match state.settings.update(request) {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => internal_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_handlers() -> AppState {
        crate::test_state()
    }

    fn create_request() -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            client_id: "client-1".to_string(),
            crew_id: "crew-1".to_string(),
            date: "2026-02-10".to_string(),
            start_hour: 8,
            start_minute: 0,
            duration_minutes: 120,
            tasks: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_appointment_returns_created() {
        let state = setup_test_handlers();

        let response = create_appointment(State(state), Json(create_request()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_get_unknown_appointment_returns_not_found() {
        let state = setup_test_handlers();

        let response = get_appointment(State(state), Path("apt-ghost".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_in_progress_returns_forbidden() {
        let state = setup_test_handlers();
        let apt = state
            .appointments
            .create(CreateAppointmentCommand {
                client_id: "client-1".to_string(),
                crew_id: "crew-1".to_string(),
                date: "2026-02-10".to_string(),
                start_hour: 8,
                start_minute: 0,
                duration_minutes: 60,
                tasks: None,
                notes: None,
            })
            .unwrap();
        state
            .appointments
            .set_status(&apt.id, AppointmentStatus::InProgress)
            .unwrap();

        let response = delete_appointment(State(state), Path(apt.id))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_import_rejects_unknown_format() {
        let state = setup_test_handlers();

        let request = ImportRequest {
            format: "ics".to_string(),
            content: String::new(),
        };
        let response = import_appointments(State(state), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_router_serves_settings() {
        use tower::ServiceExt;

        let app = Router::new()
            .nest("/api", api_router())
            .with_state(setup_test_handlers());
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/settings")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let settings: shared::BusinessSettings = serde_json::from_slice(&body).unwrap();
        assert_eq!(settings.business_name, "AllClean Masters");
        assert_eq!(settings.buffer_minutes, 30);
    }

    #[tokio::test]
    async fn test_realign_returns_success() {
        let state = setup_test_handlers();

        let request = RealignRequest {
            date: Some("2026-02-10".to_string()),
            crew_id: None,
            single_crew: None,
        };
        let response = realign_schedule(State(state), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
