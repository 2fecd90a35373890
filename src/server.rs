//! The dashboard web surface: one embedded page plus the JSON endpoints its
//! controls call.
//!
//! Every aggregate endpoint is a pure re-derivation over the read-only
//! message table in [`AppState`], so no locking is needed; a control change
//! on the page simply refetches the matching endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::config::DashboardConfig;
use crate::emoji::EmojiScanner;
use crate::error::Result;
use crate::ingest::MessageTable;
use crate::lexical;
use crate::ngram::NgramCounter;
use crate::sampler::{self, PhotoLibrary};
use crate::stats;
use crate::volume;

/// Slider bound for the smoothing span control.
const MAX_SMOOTHING_SPAN: u32 = 365;

const DASHBOARD_PAGE: &str = include_str!("../assets/index.html");

/// Everything a request handler needs: the immutable table, the compiled
/// scanners and the dashboard defaults.
pub struct AppState {
    /// The normalized message table, loaded once at startup
    pub table: MessageTable,
    /// Emoji cluster scanner
    pub emoji: EmojiScanner,
    /// N-gram counter
    pub ngrams: NgramCounter,
    /// Photos for the periodic panel
    pub photos: PhotoLibrary,
    /// Control defaults and panel refresh intervals
    pub dashboard: DashboardConfig,
}

impl AppState {
    /// Build the shared state, compiling the emoji and n-gram scanners.
    pub fn new(
        table: MessageTable,
        photos: PhotoLibrary,
        dashboard: DashboardConfig,
    ) -> Result<Self> {
        Ok(Self {
            table,
            emoji: EmojiScanner::new()?,
            ngrams: NgramCounter::new()?,
            photos,
            dashboard,
        })
    }
}

/// Build the dashboard router over the shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/summary", get(summary))
        .route("/api/by-day", get(by_day))
        .route("/api/by-hour", get(by_hour))
        .route("/api/words", get(words))
        .route("/api/word-lengths", get(word_lengths))
        .route("/api/daily-words", get(daily_words))
        .route("/api/emoji", get(emoji_comparison))
        .route("/api/ngrams", get(ngram_comparison))
        .route("/api/random-messages", get(random_messages))
        .route("/api/random-photo", get(random_photo))
        .with_state(state)
}

/// Error payload for the API endpoints.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.to_string(),
        }
    }

    fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ByDayParams {
    span: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct NgramParams {
    n: Option<usize>,
    stop: Option<String>,
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    // The page is static except for the control defaults and timer
    // intervals, which come from configuration.
    let page = DASHBOARD_PAGE
        .replace(
            "__DEFAULT_SPAN__",
            &state.dashboard.default_smoothing_span.to_string(),
        )
        .replace(
            "__DEFAULT_N__",
            &state.dashboard.default_ngram_size.to_string(),
        )
        .replace(
            "__MESSAGE_REFRESH_MS__",
            &(state.dashboard.message_refresh_secs * 1000).to_string(),
        )
        .replace(
            "__PHOTO_REFRESH_MS__",
            &(state.dashboard.photo_refresh_secs * 1000).to_string(),
        );
    Html(page)
}

async fn summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(stats::summary(&state.table))
}

async fn by_day(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByDayParams>,
) -> impl IntoResponse {
    let span = params
        .span
        .unwrap_or(state.dashboard.default_smoothing_span)
        .clamp(1, MAX_SMOOTHING_SPAN);
    Json(volume::by_day(&state.table, span))
}

async fn by_hour(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(volume::by_hour(&state.table))
}

async fn words(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(lexical::word_frequencies(&state.table))
}

async fn word_lengths(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(lexical::message_length_distribution(&state.table))
}

async fn daily_words(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(lexical::daily_words_distribution(&state.table))
}

async fn emoji_comparison(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.emoji.compare(&state.table))
}

async fn ngram_comparison(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NgramParams>,
) -> impl IntoResponse {
    let n = params.n.unwrap_or(state.dashboard.default_ngram_size);
    // An absent parameter falls back to the configured list; an explicit
    // empty string means "no stop words".
    let stop_words = split_stop_words(
        params
            .stop
            .as_deref()
            .unwrap_or(&state.dashboard.default_stop_words),
    );
    Json(state.ngrams.compare(&state.table, n, &stop_words))
}

async fn random_messages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sample = {
        let mut rng = rand::thread_rng();
        sampler::sample_messages(&state.table, state.dashboard.sample_size, &mut rng)
    };
    Json(sample)
}

async fn random_photo(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Response, ApiError> {
    let photo = {
        let mut rng = rand::thread_rng();
        state.photos.random(&mut rng).cloned()
    }
    .ok_or_else(|| ApiError::not_found("no photos available"))?;

    let bytes = tokio::fs::read(&photo.path).await.map_err(|e| {
        error!(path = %photo.path.display(), error = %e, "Failed to read photo");
        ApiError::internal("failed to read photo")
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, photo.content_type),
            (header::CACHE_CONTROL, "no-store"),
        ],
        bytes,
    )
        .into_response())
}

/// Split the free-text stop-word control on whitespace, lower-casing to
/// match the n-gram token stream.
fn split_stop_words(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_lowercase).collect()
}
