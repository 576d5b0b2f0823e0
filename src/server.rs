use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::axis::unix_seconds;
use crate::error::DashboardError;
use crate::models::{MetricsSummary, SelectionWindow};
use crate::page;
use crate::state::AppState;
use crate::view::{self, ViewUpdate};

pub type SharedState = Arc<AppState>;

/// Range-control position; either bound defaults to the edge of the domain.
#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match self {
            DashboardError::InvalidSelection(_) => StatusCode::BAD_REQUEST,
            DashboardError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DashboardError::Fetch { .. } | DashboardError::Schema(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/update", get(update_handler))
        .route("/api/summary", get(summary_handler))
        .with_state(state)
}

pub async fn serve(state: SharedState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(state);
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler(State(state): State<SharedState>) -> Html<String> {
    Html(page::render_page(&state))
}

async fn update_handler(
    State(state): State<SharedState>,
    Query(query): Query<UpdateQuery>,
) -> Result<Json<ViewUpdate>, DashboardError> {
    let full = SelectionWindow::full(&state.domain);
    let start = query.start.unwrap_or_else(|| unix_seconds(full.start));
    let end = query.end.unwrap_or_else(|| unix_seconds(full.end));
    let window = SelectionWindow::from_unix(start, end, &state.domain)
        .inspect_err(|err| warn!(start, end, "{err}"))?;
    Ok(Json(view::update(&state, window)))
}

async fn summary_handler(State(state): State<SharedState>) -> Json<MetricsSummary> {
    Json(state.summary.clone())
}
