use axum::{
    extract::State,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use tracing::warn;

use crate::services::matches;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::AppState;

pub async fn matches_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match matches::load_matches(state.store.as_ref(), &auth_user.id).await {
        Ok(cards) => Json(json!({ "status": "ready", "matches": cards })).into_response(),
        Err(e) => {
            warn!("Matches load failed for {}: {}", auth_user.id, e);
            Json(json!({ "status": "loading", "matches": [] })).into_response()
        }
    }
}
