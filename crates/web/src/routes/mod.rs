use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::{Arc, MutexGuard};
use tracing::error;

use chess960_explorer_core::{Error, Explorer, Highlight, LoadStatus};
use crate::AppState;

pub mod api;

/// Core errors mapped onto HTTP statuses
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::UnknownPosition(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

pub fn lock_explorer(state: &AppState) -> Result<MutexGuard<'_, Explorer>, ApiError> {
    state.explorer.lock().map_err(|_| {
        error!("Explorer lock poisoned");
        ApiError(Error::NotReady("explorer state unavailable".to_string()))
    })
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub status: String,
    pub ready: bool,
    pub total: usize,
    pub total_percentage: String,
    pub mean_score: String,
    pub highlight: String,
    pub cards: Vec<CardRow>,
    pub top_moves: Vec<MoveRow>,
}

pub struct CardRow {
    pub label: String,
    pub color: String,
    pub count: usize,
    pub percentage: String,
}

pub struct MoveRow {
    pub san: String,
    pub count: usize,
    pub percentage: String,
}

fn highlight_label(highlight: &Highlight) -> String {
    match highlight {
        Highlight::None => "none".to_string(),
        Highlight::Category(c) => c.display_name(),
        Highlight::Move(san) => san.clone(),
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let explorer = match lock_explorer(&state) {
        Ok(e) => e,
        Err(e) => return e.into_response(),
    };

    let mut template = IndexTemplate {
        title: "Chess960 Best Moves".to_string(),
        status: String::new(),
        ready: false,
        total: 0,
        total_percentage: String::new(),
        mean_score: String::new(),
        highlight: String::new(),
        cards: Vec::new(),
        top_moves: Vec::new(),
    };

    match explorer.status() {
        LoadStatus::Pending => template.status = "Loading dataset...".to_string(),
        LoadStatus::Failed(message) => template.status = format!("Dataset unavailable: {}", message),
        LoadStatus::Ready => {}
    }

    if let Ok(view) = explorer.view() {
        let stats = &view.statistics;
        template.ready = true;
        template.status = "Ready".to_string();
        template.total = stats.total;
        template.total_percentage = format!("{:.1}", stats.total_percentage);
        template.mean_score = stats.mean_score_label();
        template.highlight = highlight_label(&view.highlight);
        template.cards = stats
            .categories
            .iter()
            .map(|c| CardRow {
                label: c.label.clone(),
                color: c.color.hex(),
                count: c.count,
                percentage: format!("{:.1}", c.percentage),
            })
            .collect();
        template.top_moves = stats
            .top_moves
            .iter()
            .map(|m| MoveRow {
                san: m.san.clone(),
                count: m.count,
                percentage: format!("{:.1}", m.percentage_of_subset),
            })
            .collect();
    }

    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template render failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn health() -> &'static str {
    "OK"
}
