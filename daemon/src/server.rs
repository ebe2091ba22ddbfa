//! HTTP surface: the operator page and the message update endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::connect_info::ConnectInfo;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use log::info;
use serde::Deserialize;
use serde_json::json;

use dotnote::message;
use dotnote::store::MessageBoard;

use crate::buzzer::Buzzer;
use crate::message_log::MessageLog;

const INDEX_HTML: &str = include_str!("index.html");

pub struct ServerState {
    pub board: MessageBoard,
    pub buzzer: Buzzer,
    pub message_log: MessageLog,
    pub message_spacing: String,
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/update", get(update_message))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Deserialize)]
struct UpdateParams {
    message: Option<String>,
}

/// Accept a new message: store it with the scroll separator appended, record
/// it in the message log, and trigger the buzzer. The response never waits on
/// the beep or on the render loop.
async fn update_message(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(params): Query<UpdateParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    let raw = params.message.as_deref().unwrap_or_default();
    let Some(trimmed) = message::validate(raw) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No valid message provided" })),
        );
    };

    state
        .board
        .set(message::normalize(raw, &state.message_spacing))
        .await;
    info!("message updated by {}: {trimmed:?}", addr.ip());
    state.message_log.append(addr.ip(), trimmed).await;
    state.buzzer.spawn_beep();

    (StatusCode::OK, Json(json!({ "message": "Message updated" })))
}
