//! Inbound frame routes and the router wiring them together.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, Method},
    response::Html,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::airstack::Identity;
use crate::frames::{self, FrameError, Route, View};
use crate::render::frame_html;
use crate::state::AppState;

/// Click payload posted by Farcaster clients.
///
/// `trustedData` is deliberately not modeled: identity comes from the
/// platform metadata below and button-carried values are never accepted as
/// identities, so there is nothing else to verify here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAction {
    #[serde(default)]
    pub untrusted_data: UntrustedData,
}

/// Platform metadata attached to the click. Clients also send `inputText`,
/// `state` and cast details; serde drops what the flow does not consume.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UntrustedData {
    pub fid: Option<u64>,
    pub button_index: Option<u8>,
}

/// Router for all frame routes. CORS is open enough for frame validator
/// tooling to poke the endpoints from a browser.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(home).post(home))
        .route("/check", post(check))
        .route("/result", post(result))
        .layer(cors)
        .with_state(state)
}

/// Initial frame. Farcaster clients fetch it with GET; clicking a button
/// labeled Back posts to the same route, so both methods land here.
async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    respond(&state, frames::home_view(&state.theme))
}

async fn check(State(state): State<Arc<AppState>>, body: Bytes) -> Html<String> {
    let action = decode_action(&body);
    let view = match resolve_identity(&action) {
        Ok(identity) => frames::check_view(&state.theme, &identity),
        Err(e) => frames::error_view(&state.theme, &e),
    };
    respond(&state, view)
}

async fn result(State(state): State<Arc<AppState>>, body: Bytes) -> Html<String> {
    let action = decode_action(&body);
    let view = match resolve_identity(&action) {
        Ok(identity) => match state.source.fetch_user_info(&identity).await {
            Ok(info) if info.has_profile() => frames::result_view(&state.theme, &info),
            Ok(_) => {
                warn!(identity = %identity, "no social profile found");
                frames::no_profile_view(&state.theme)
            }
            Err(e) => {
                warn!(identity = %identity, "balance lookup failed: {e}");
                frames::error_view(&state.theme, &FrameError::QueryFailed(e))
            }
        },
        Err(e) => frames::error_view(&state.theme, &e),
    };
    respond(&state, view)
}

/// Identity always comes from platform-supplied metadata. A missing fid is
/// reported to the user, never guessed at.
fn resolve_identity(action: &FrameAction) -> Result<Identity, FrameError> {
    action
        .untrusted_data
        .fid
        .map(Identity::Fid)
        .ok_or(FrameError::IdentityUnavailable)
}

/// A frame must always come back, so undecodable payloads degrade to the
/// empty action (and from there to the identity-unavailable frame) instead
/// of a bare 4xx the client cannot render.
fn decode_action(body: &[u8]) -> FrameAction {
    if body.is_empty() {
        return FrameAction::default();
    }

    let action: FrameAction = serde_json::from_slice(body).unwrap_or_else(|e| {
        warn!("undecodable frame payload: {e}");
        FrameAction::default()
    });

    debug!(button = ?action.untrusted_data.button_index, "frame click");
    action
}

fn respond(state: &AppState, view: View) -> Html<String> {
    // Frames must never dead-end: every view keeps a route back into the
    // flow, either straight home or (from home itself) into the checker.
    debug_assert!(
        view.has_button_to(Route::Home) || view.has_button_to(Route::Check),
        "frame view must link back into the flow"
    );

    Html(frame_html(&view, &state.theme, &state.config.public_url))
}
