use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use macrodash_data::dashboard::{FxView, MacroView, QuotesView, UsEconomicsView, YieldCurveView};
use serde::Deserialize;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Token cancelled when the handler future is dropped, e.g. on client disconnect.
fn request_token() -> (CancellationToken, DropGuard) {
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    (token, guard)
}

async fn get_macro(State(state): State<Arc<AppState>>) -> Json<MacroView> {
    let (cancel, _guard) = request_token();
    Json(state.dashboard.load_macro(&cancel).await)
}

async fn get_us_economics(State(state): State<Arc<AppState>>) -> Json<UsEconomicsView> {
    let (cancel, _guard) = request_token();
    Json(state.dashboard.load_us_economics(&cancel).await)
}

async fn get_yield_curves(State(state): State<Arc<AppState>>) -> Json<YieldCurveView> {
    let (cancel, _guard) = request_token();
    Json(state.dashboard.yield_curves(&cancel).await)
}

async fn get_indices(State(state): State<Arc<AppState>>) -> Json<QuotesView> {
    let (cancel, _guard) = request_token();
    Json(state.dashboard.load_indices(&cancel).await)
}

async fn get_assets(State(state): State<Arc<AppState>>) -> Json<QuotesView> {
    let (cancel, _guard) = request_token();
    Json(state.dashboard.load_assets(&cancel).await)
}

async fn get_fx(State(state): State<Arc<AppState>>) -> Json<FxView> {
    let (cancel, _guard) = request_token();
    Json(state.dashboard.load_fx(&cancel).await)
}

#[derive(Deserialize)]
struct QuotesQuery {
    symbols: Option<String>,
}

async fn get_quotes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuotesQuery>,
) -> ApiResult<Json<QuotesView>> {
    let symbols: Vec<String> = query
        .symbols
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        return Err(ApiError::BadRequest(
            "Query parameter 'symbols' is required".to_string(),
        ));
    }
    if symbols.len() > state.max_quote_symbols {
        return Err(ApiError::BadRequest(format!(
            "At most {} symbols per request",
            state.max_quote_symbols
        )));
    }

    let (cancel, _guard) = request_token();
    Ok(Json(state.dashboard.load_quotes(&symbols, &cancel).await))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/macro", get(get_macro))
        .route("/us-economics", get(get_us_economics))
        .route("/yield-curves", get(get_yield_curves))
        .route("/indices", get(get_indices))
        .route("/assets", get(get_assets))
        .route("/fx", get(get_fx))
        .route("/quotes", get(get_quotes))
}
