use crate::app::error::ApiError;
use crate::push as push_service;
use crate::state;
use crate::types::matches::MatchId;
use crate::types::push::{Registration, Subscription};

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::Uri;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct PublicKeyResponse {
    #[serde(rename = "publicKey")]
    pub(crate) public_key: String,
}

pub(crate) async fn push_public_key(
    State(state): State<state::AppState>,
) -> Result<Json<PublicKeyResponse>, ApiError> {
    match push_service::load_vapid_config(&state.config) {
        push_service::VapidConfigStatus::Ready(vapid) => Ok(Json(PublicKeyResponse {
            public_key: vapid.public_key,
        })),
        push_service::VapidConfigStatus::Incomplete | push_service::VapidConfigStatus::Missing => {
            Err(ApiError::ServiceUnavailable(
                "Push notifications are not configured.",
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubscriptionQuery {
    match_id: Option<String>,
    device_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SubscribedResponse {
    pub(crate) subscribed: bool,
}

/// Answers `false` rather than an error whenever the lookup cannot be made.
pub(crate) async fn push_subscription_status(
    State(state): State<state::AppState>,
    Query(query): Query<SubscriptionQuery>,
) -> Json<SubscribedResponse> {
    let match_id = query.match_id.as_deref().map(MatchId::new);
    let device_id = query.device_id.as_deref().map(str::trim);
    let (Some(match_id), Some(device_id)) = (match_id, device_id) else {
        return Json(SubscribedResponse { subscribed: false });
    };
    if match_id.is_empty() || device_id.is_empty() {
        return Json(SubscribedResponse { subscribed: false });
    }

    let subscribed = match state.store.find(&match_id, device_id) {
        Ok(found) => found.is_some(),
        Err(err) => {
            tracing::error!(error = %err, "failed to check push subscription");
            false
        }
    };
    Json(SubscribedResponse { subscribed })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubscribeRequest {
    match_id: Option<MatchId>,
    device_id: Option<String>,
    endpoint: Option<String>,
    p256dh: Option<String>,
    auth: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SuccessResponse {
    pub(crate) success: bool,
}

pub(crate) async fn push_subscribe(
    State(state): State<state::AppState>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ApiError> {
    let request: SubscribeRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::BadRequest("Invalid request body"))?;
    let registration = validate_subscription(request)?;

    let (match_id, device_id) = (
        registration.match_id.clone(),
        registration.device_id.clone(),
    );
    state
        .store
        .upsert(registration)
        .map_err(|err| ApiError::store("Failed to save subscription", err))?;
    tracing::info!(match_id = %match_id, device_id = %device_id, "push subscription saved");

    Ok(Json(SuccessResponse { success: true }))
}

fn validate_subscription(request: SubscribeRequest) -> Result<Registration, ApiError> {
    const MISSING: &str = "Missing required fields: matchId, deviceId, endpoint, p256dh, auth";

    let match_id = request
        .match_id
        .filter(|match_id| !match_id.is_empty())
        .ok_or(ApiError::BadRequest(MISSING))?;
    let device_id = required(request.device_id).ok_or(ApiError::BadRequest(MISSING))?;
    let endpoint = required(request.endpoint).ok_or(ApiError::BadRequest(MISSING))?;
    let p256dh = required(request.p256dh).ok_or(ApiError::BadRequest(MISSING))?;
    let auth = required(request.auth).ok_or(ApiError::BadRequest(MISSING))?;

    if !is_push_endpoint(&endpoint) {
        return Err(ApiError::BadRequest("Invalid endpoint URL"));
    }

    Ok(Registration::new(
        match_id,
        device_id,
        Subscription {
            endpoint,
            p256dh,
            auth,
        },
    ))
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_push_endpoint(endpoint: &str) -> bool {
    let Ok(uri) = endpoint.parse::<Uri>() else {
        return false;
    };
    matches!(uri.scheme_str(), Some("https") | Some("http")) && uri.host().is_some()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnsubscribeRequest {
    match_id: Option<MatchId>,
    device_id: Option<String>,
}

pub(crate) async fn push_unsubscribe(
    State(state): State<state::AppState>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, ApiError> {
    let request: UnsubscribeRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::BadRequest("Invalid request body"))?;
    const MISSING: &str = "Missing required fields: matchId, deviceId";
    let match_id = request
        .match_id
        .filter(|match_id| !match_id.is_empty())
        .ok_or(ApiError::BadRequest(MISSING))?;
    let device_id = required(request.device_id).ok_or(ApiError::BadRequest(MISSING))?;

    let removed = state
        .store
        .remove(&match_id, &device_id)
        .map_err(|err| ApiError::store("Failed to delete subscription", err))?;
    tracing::info!(match_id = %match_id, device_id = %device_id, removed, "push subscription removed");

    Ok(Json(SuccessResponse { success: true }))
}
