//! HTTP layer serving the assessment screens and a JSON state view.

pub mod pages;
pub mod routes;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use crate::{config::Settings, engine::PredictClient, store::Store};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub client: PredictClient,
    pub store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = PredictClient::new(&settings)?;
        Ok(Self {
            settings,
            client,
            store: Arc::new(Mutex::new(Store::new())),
        })
    }
}

/// Build the axum router over `state`.
pub fn router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.settings.static_dir);
    Router::new()
        .route("/", get(routes::index))
        .route("/start", post(routes::start))
        .route("/predict", post(routes::predict))
        .route("/cancel", post(routes::cancel))
        .route("/reset", post(routes::reset))
        .route("/api/state", get(routes::snapshot))
        .nest_service("/static", static_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: Settings, host: String, port: u16) -> Result<()> {
    let engine = settings.api_url.clone();
    if !settings.static_dir.is_dir() {
        warn!(
            dir = %settings.static_dir.display(),
            "static directory not found; pages will be unstyled"
        );
    }
    let state = AppState::new(settings)?;
    let router = router(state);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, %engine, "serving diapredict");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(err) => {
            warn!(%err, "ctrl-c handler unavailable; serving until killed");
            std::future::pending::<()>().await
        }
    }
}
