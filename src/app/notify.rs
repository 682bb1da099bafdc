use crate::app::error::ApiError;
use crate::auth::Caller;
use crate::push as push_service;
use crate::state;
use crate::types::matches::MatchId;

use axum::Extension;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NotifyRequest {
    pub(crate) match_id: Option<MatchId>,
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) home_team: Option<String>,
    pub(crate) away_team: Option<String>,
    pub(crate) home_score: Option<u32>,
    pub(crate) away_score: Option<u32>,
    pub(crate) status: Option<String>,
}

impl NotifyRequest {
    fn into_update(self) -> push_service::MatchUpdate {
        push_service::MatchUpdate {
            title: self.title,
            body: self.body,
            home_team: self.home_team,
            away_team: self.away_team,
            home_score: self.home_score,
            away_score: self.away_score,
            status: self.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct NotifyResponse {
    pub(crate) success: bool,
    pub(crate) sent: usize,
    pub(crate) failed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

pub(crate) async fn notify(
    State(state): State<state::AppState>,
    Extension(caller): Extension<Caller>,
    body: Bytes,
) -> Result<Json<NotifyResponse>, ApiError> {
    let mut request: NotifyRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::BadRequest("Invalid request body"))?;
    let match_id = request
        .match_id
        .take()
        .filter(|match_id| !match_id.is_empty())
        .ok_or(ApiError::BadRequest("matchId is required"))?;

    let registrations = state
        .store
        .list(&match_id)
        .map_err(|err| ApiError::store("Failed to fetch subscriptions", err))?;

    if registrations.is_empty() {
        return Ok(Json(NotifyResponse {
            success: true,
            sent: 0,
            failed: 0,
            message: Some("No subscribers for this match".to_string()),
        }));
    }

    tracing::info!(
        match_id = %match_id,
        caller = %caller.subject,
        subscribers = registrations.len(),
        "dispatching match notification"
    );
    let payload = push_service::build_payload(match_id, &request.into_update());
    let report =
        push_service::dispatch_with_config(&state.config, &payload, registrations).await;

    Ok(Json(settle_report(&state, report)))
}

/// Drops endpoints the push service reported as gone and turns the
/// report into the response body. Pruning failures are only logged.
pub(crate) fn settle_report(
    state: &state::AppState,
    report: push_service::DispatchReport,
) -> NotifyResponse {
    for registration in report.permanent_failures() {
        match state
            .store
            .remove_endpoint(&registration.match_id, &registration.subscription.endpoint)
        {
            Ok(removed) => tracing::info!(
                match_id = %registration.match_id,
                device_id = %registration.device_id,
                removed,
                "removed expired push registration"
            ),
            Err(err) => tracing::warn!(
                match_id = %registration.match_id,
                device_id = %registration.device_id,
                error = %err,
                "failed to remove expired push registration"
            ),
        }
    }

    NotifyResponse {
        success: true,
        sent: report.sent,
        failed: report.failed,
        message: None,
    }
}
