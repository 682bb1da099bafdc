use crate::app::error::ApiError;
use crate::state;

use axum::body::Body;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Request;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Lets the request through only for callers whose token carries a role
/// allowed to send notifications. The verified caller is stored as a
/// request extension.
pub(crate) async fn require_notifier(
    State(state): State<state::AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth) = &state.auth else {
        tracing::warn!("notify request rejected: auth is not configured");
        return ApiError::Unauthorized("Unauthorized").into_response();
    };

    let token = bearer_token(req.headers()).or_else(|| auth_cookie(req.headers(), auth.cookie_name()));
    match auth.authorize(token) {
        Ok(caller) => {
            req.extensions_mut().insert(caller);
            next.run(req).await
        }
        Err(err) => {
            tracing::info!(error = %err, "notify request rejected");
            ApiError::from(err).into_response()
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token.trim())
}

fn auth_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    for header in headers.get_all(COOKIE).iter() {
        if let Ok(raw) = header.to_str()
            && let Some(value) = cookie_from_header(raw, name)
        {
            return Some(value);
        }
    }
    None
}

fn cookie_from_header<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for part in header.split(';') {
        let trimmed = part.trim();
        if let Some((cookie_name, cookie_value)) = trimmed.split_once('=')
            && cookie_name == name
        {
            return Some(cookie_value);
        }
    }
    None
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token__should_accept_any_scheme_case() {
        // Given
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc.def"));

        // Then
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn bearer_token__should_ignore_other_schemes() {
        // Given
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));

        // Then
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn auth_cookie__should_pick_named_cookie() {
        // Given
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; livescore_auth=token-value"),
        );

        // Then
        assert_eq!(
            auth_cookie(&headers, "livescore_auth"),
            Some("token-value")
        );
        assert_eq!(auth_cookie(&headers, "missing"), None);
    }
}
