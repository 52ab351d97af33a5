use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::services::error::ServiceError;
use crate::services::interests;
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct InterestsForm {
    pub interests: Vec<String>,
}

pub async fn save_interests_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(form): Json<InterestsForm>,
) -> impl IntoResponse {
    match interests::save_interests(&state.pool, &auth_user.id, form.interests).await {
        Ok(saved) => {
            // The deck has to re-derive against the new interest set, and the
            // population feed picks the change up for everyone else.
            state.discover.invalidate(&auth_user.id).await;
            state.feed.nudge();
            Json(json!({ "interests": saved })).into_response()
        }
        Err(ServiceError::Validation(msg)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": msg }))).into_response()
        }
        Err(e) => {
            warn!("Interests save failed for {}: {}", auth_user.id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "could not save interests" })),
            )
                .into_response()
        }
    }
}
