use crate::error::Result;
use crate::formatter::format_quote;
use crate::models::{ApiResponse, HealthResponse, HistoryPoint, PriceQuote};
use crate::price_board::PriceBoard;
use crate::views::{render_error, render_index};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::SecondsFormat;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub const PRICE_UNAVAILABLE_MESSAGE: &str = "Failed to fetch Bitcoin price data";
pub const NOT_FOUND_MESSAGE: &str = "Page not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub struct AppState {
    pub board: PriceBoard,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/price", get(api_price))
        .route("/api/history", get(api_history))
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves `app` until the server stops.
pub async fn serve(app: Router, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let (quote, history) = tokio::join!(
        state.board.fetch_spot_prices(),
        state.board.fetch_history()
    );

    let quote = match quote {
        Ok(quote) if !quote.is_empty() => quote,
        Ok(_) | Err(_) => {
            warn!("Rendering error page: no price data");
            return Html(render_error(PRICE_UNAVAILABLE_MESSAGE));
        }
    };

    let cards = format_quote(&quote, state.board.currencies());
    let last_updated = state
        .board
        .clock()
        .now()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    Html(render_index(&cards, &history, &last_updated))
}

pub async fn api_price(State(state): State<Arc<AppState>>) -> Response {
    match state.board.fetch_spot_prices().await {
        Ok(quote) if !quote.is_empty() => {
            Json(ApiResponse::success(quote, timestamp(&state))).into_response()
        }
        Ok(_) | Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<PriceQuote>::error(
                "Failed to fetch Bitcoin price".to_string(),
            )),
        )
            .into_response(),
    }
}

pub async fn api_history(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<HistoryPoint>>> {
    let history = state.board.fetch_history().await;
    Json(ApiResponse::success(history, timestamp(&state)))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: timestamp(&state),
    })
}

async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(render_error(NOT_FOUND_MESSAGE)))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render_error(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}

fn timestamp(state: &AppState) -> String {
    state
        .board
        .clock()
        .now()
        .to_rfc3339_opts(SecondsFormat::Micros, true)
}
