use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Html;
use harvest_core::{ScrapeRequest, ScrapeResponse};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

const INDEX_HTML: &str = include_str!("../static/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

#[tracing::instrument(
    name = "scrape",
    skip_all,
    fields(request_id = %Uuid::new_v4(), url = tracing::field::Empty, fields = tracing::field::Empty)
)]
pub async fn scrape(
    State(state): State<AppState>, payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        ApiError::from(rejection)
    })?;

    let span = tracing::Span::current();
    span.record("url", request.url.as_str());
    span.record("fields", request.selectors.len());

    match state.harvester.scrape(&request).await {
        Ok(response) => {
            let nulls = response.data.values().filter(|value| value.is_null()).count();
            tracing::info!(nulls, "scrape finished");
            Ok(Json(response))
        }
        Err(err) => {
            if err.is_fetch_error() {
                tracing::warn!(error = %err, "page fetch failed");
            } else {
                tracing::info!(error = %err, kind = err.kind(), "scrape rejected");
            }
            Err(ApiError::from(err))
        }
    }
}
