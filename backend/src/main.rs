use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

use cleaning_scheduler_backend::domain::{
    AppointmentService, ClientService, CrewService, ImportService, RealignService, SettingsService,
};
use cleaning_scheduler_backend::rest::{api_router, AppState};
use cleaning_scheduler_backend::seed::seed_demo_data;
use cleaning_scheduler_backend::storage::memory::{
    AppointmentRepository, ClientRepository, CrewRepository, MemoryConnection, SettingsRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Setting up in-memory store");
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

    let state = AppState::new(appointments, crews, clients, settings, realign, import);
    seed_demo_data(&state)?;

    // CORS setup to allow the frontend dev server to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", api_router())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
