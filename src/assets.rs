use crate::state::AppState;
use crate::templates::ServiceWorkerTemplate;

use askama::Template as _;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

pub(crate) async fn service_worker(State(state): State<AppState>) -> Response {
    let rendered = ServiceWorkerTemplate::new(&state.config.app_name)
        .map_err(|err| err.to_string())
        .and_then(|template| template.render().map_err(|err| err.to_string()));
    match rendered {
        Ok(script) => (
            [
                (CONTENT_TYPE, "application/javascript"),
                (CACHE_CONTROL, "no-cache"),
            ],
            script,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render service worker");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
