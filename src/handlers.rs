use crate::errors::AppError;
use crate::format::format_number;
use crate::loader::on_page_load;
use crate::models::{CounterKey, CounterQuery, CounterSnapshot, Endpoint};
use crate::page::Document;
use crate::site::{content_type, is_html, load_file, resolve_request_path};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;

pub async fn serve_page(State(state): State<AppState>, uri: Uri) -> Result<Response, AppError> {
    let path = resolve_request_path(&state.site_root, uri.path())
        .ok_or_else(|| AppError::bad_request("path escapes the site root"))?;
    let (path, bytes) = load_file(&path).await?;

    if !is_html(&path) {
        return Ok(([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response());
    }

    let mut document = Document::parse(String::from_utf8_lossy(&bytes).into_owned());
    let report = on_page_load(&state.counters, &mut document, Utc::now().date_naive()).await;
    let Some(namespace) = &report.namespace else {
        return Ok(([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response());
    };
    info!(
        page = %uri.path(),
        namespace = %namespace,
        total = ?report.total,
        today = ?report.today,
        "rendered counters"
    );

    Ok(Html(document.render()).into_response())
}

pub async fn get_counter(
    State(state): State<AppState>,
    Path((namespace, key)): Path<(String, String)>,
    Query(query): Query<CounterQuery>,
) -> Result<Json<CounterSnapshot>, AppError> {
    let key = CounterKey::new(key);
    let endpoint = Endpoint::for_increment(query.increment);
    let value = state.counters.fetch(endpoint, &namespace, &key).await?.extract();

    Ok(Json(CounterSnapshot {
        namespace,
        key: key.to_string(),
        value,
        display: format_number(value),
    }))
}
