//! Session and acting-user extractors.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use cookie::Cookie;
use famdoc_core::auth::{self, model::Session, SESSION_COOKIE};
use famdoc_core::user::{self, model::User};
use tracing::{error, trace};

use crate::error::ApiError;
use crate::state::AppState;

/// Session token from `Authorization: Bearer` or the session cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());
    if bearer.is_some() {
        trace!("Authorization header provided");
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .find_map(|raw| {
            let cookie = Cookie::parse(raw.trim()).ok()?;
            (cookie.name() == SESSION_COOKIE).then(|| cookie.value().to_string())
        })
}

/// A verified session. Rejects with `UNAUTHORIZED` before any handler
/// logic runs.
#[derive(Debug, Clone)]
pub struct SessionIdentity(pub Session);

impl FromRequestParts<AppState> for SessionIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        match auth::verify_session(&state.db, &token).await? {
            Some(session) => Ok(Self(session)),
            None => Err(ApiError::Unauthorized),
        }
    }
}

/// The user behind the session.
#[derive(Debug, Clone)]
pub struct Actor {
    pub session: Session,
    pub user: User,
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let SessionIdentity(session) = SessionIdentity::from_request_parts(parts, state).await?;
        let user = user::find_user_by_auth_id(&state.db, &session.auth_id)
            .await?
            .ok_or_else(|| {
                error!(auth_id = %session.auth_id, "session has no user");
                ApiError::Internal
            })?;
        Ok(Self { session, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("sAccessToken=xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; sAccessToken=xyz; lang=de"));
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(extract_token(&headers), None);
    }
}
