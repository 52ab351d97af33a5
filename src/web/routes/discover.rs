use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::services::discover::{DiscoverView, SwipeIntent};
use crate::services::error::ServiceError;
use crate::services::swipe::{SwipeDirection, SwipeMachine, SwipeOutcome};
use crate::web::middleware::auth::AuthenticatedUser;
use crate::web::AppState;

pub async fn discover_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.discover.build_view(&auth_user.id).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => {
            // Store trouble shows up as a loading state, never a dead view.
            warn!("Discover view failed for {}: {}", auth_user.id, e);
            Json(DiscoverView::loading()).into_response()
        }
    }
}

/// Either an explicit button press (`action=pass|connect`) or a reported
/// gesture release (`dx`/`dy`, offset relative to the drag origin). Gesture
/// input is replayed through the swipe machine so the commit threshold lives
/// in exactly one place.
#[derive(Debug, Deserialize)]
pub struct SwipeForm {
    pub action: Option<String>,
    pub dx: Option<f64>,
    pub dy: Option<f64>,
}

pub async fn swipe_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Form(form): Form<SwipeForm>,
) -> impl IntoResponse {
    let intent = match resolve_intent(&form) {
        Ok(Some(intent)) => intent,
        // Sub-threshold release: the card snaps back, nothing changes.
        Ok(None) => return Json(json!({ "outcome": "snap_back" })).into_response(),
        Err(msg) => {
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": msg })))
                .into_response()
        }
    };

    match state.discover.record_swipe(&auth_user.id, intent).await {
        Ok(receipt) => Json(receipt).into_response(),
        Err(ServiceError::Validation(msg)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": msg }))).into_response()
        }
        Err(e) => {
            warn!("Swipe failed for {}: {}", auth_user.id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "store unavailable, try again" })),
            )
                .into_response()
        }
    }
}

fn resolve_intent(form: &SwipeForm) -> Result<Option<SwipeIntent>, &'static str> {
    if let Some(action) = form.action.as_deref() {
        return match action {
            "pass" => Ok(Some(SwipeIntent::Pass)),
            "connect" => Ok(Some(SwipeIntent::Connect)),
            _ => Err("action must be pass or connect"),
        };
    }

    let Some(dx) = form.dx else {
        return Err("missing action or gesture offset");
    };
    match SwipeMachine::replay_release(dx, form.dy.unwrap_or(0.0)) {
        SwipeOutcome::Commit(SwipeDirection::Right) => Ok(Some(SwipeIntent::Connect)),
        SwipeOutcome::Commit(SwipeDirection::Left) => Ok(Some(SwipeIntent::Pass)),
        SwipeOutcome::SnapBack => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_and_gestures_resolve_to_the_same_intents() {
        let button = SwipeForm {
            action: Some("connect".into()),
            dx: None,
            dy: None,
        };
        let gesture = SwipeForm {
            action: None,
            dx: Some(150.0),
            dy: Some(10.0),
        };
        assert_eq!(resolve_intent(&button).unwrap(), Some(SwipeIntent::Connect));
        assert_eq!(resolve_intent(&gesture).unwrap(), Some(SwipeIntent::Connect));
    }

    #[test]
    fn sub_threshold_gesture_is_a_snap_back() {
        let gesture = SwipeForm {
            action: None,
            dx: Some(100.0),
            dy: Some(0.0),
        };
        assert_eq!(resolve_intent(&gesture).unwrap(), None);
    }

    #[test]
    fn left_gesture_is_a_pass() {
        let gesture = SwipeForm {
            action: None,
            dx: Some(-150.0),
            dy: Some(0.0),
        };
        assert_eq!(resolve_intent(&gesture).unwrap(), Some(SwipeIntent::Pass));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let form = SwipeForm {
            action: Some("superlike".into()),
            dx: None,
            dy: None,
        };
        assert!(resolve_intent(&form).is_err());
    }
}
