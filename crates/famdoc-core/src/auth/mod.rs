//! The contract consumed from the identity collaborator: sign-up,
//! password-reset tokens and sessions.

pub mod model;

use chrono::Utc;
use famdoc_db::{records, DbPool};
use model::{Identity, ResetToken, Session, SignUpOutcome};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DocError, DocResult};

const IDENTITY_COLLECTION: &str = "identity";
const SESSION_COLLECTION: &str = "session";
const RESET_TOKEN_COLLECTION: &str = "reset_token";
const EMAIL_INDEX: &str = "identity_email";

/// Role claim that unlocks admin bootstrap.
pub const ADMIN_ROLE_CLAIM: &str = "admin";

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sAccessToken";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Register an identity for `email`.
pub async fn sign_up(pool: &DbPool, email: &str) -> DocResult<SignUpOutcome> {
    let email = normalize_email(email);
    if !email.contains('@') {
        return Err(DocError::validation(format!("invalid email: {:?}", email)));
    }

    let identity = Identity {
        auth_id: Uuid::new_v4().to_string(),
        email: email.clone(),
        created_at: Utc::now(),
    };
    if !pool.claim_unique(EMAIL_INDEX, &email, &identity.auth_id).await? {
        debug!(email = %email, "sign up rejected, email taken");
        return Ok(SignUpOutcome::EmailAlreadyExists);
    }
    records::put_record(pool, IDENTITY_COLLECTION, &identity.auth_id, &identity).await?;
    info!(auth_id = %identity.auth_id, "signed up identity");
    Ok(SignUpOutcome::Created(identity))
}

pub async fn get_identity(pool: &DbPool, auth_id: &str) -> DocResult<Option<Identity>> {
    Ok(records::get_record(pool, IDENTITY_COLLECTION, auth_id).await?)
}

pub async fn find_identity_by_email(pool: &DbPool, email: &str) -> DocResult<Option<Identity>> {
    match pool.lookup_unique(EMAIL_INDEX, &normalize_email(email)).await? {
        Some(auth_id) => get_identity(pool, &auth_id).await,
        None => Ok(None),
    }
}

/// Issue a password-reset token for an existing identity.
pub async fn create_reset_password_token(pool: &DbPool, auth_id: &str) -> DocResult<ResetToken> {
    if get_identity(pool, auth_id).await?.is_none() {
        return Err(DocError::UnknownUser(auth_id.to_string()));
    }
    let token = ResetToken {
        token: Uuid::new_v4().simple().to_string(),
        auth_id: auth_id.to_string(),
        created_at: Utc::now(),
    };
    records::put_record(pool, RESET_TOKEN_COLLECTION, &token.token, &token).await?;
    Ok(token)
}

/// Link sent in invitation emails.
pub fn invite_link(app_url: &str, token: &ResetToken) -> String {
    format!(
        "{}/auth/reset-password?token={}",
        app_url.trim_end_matches('/'),
        token.token
    )
}

/// Open a session for an identity.
pub async fn create_session(pool: &DbPool, auth_id: &str, roles: Vec<String>) -> DocResult<Session> {
    let session = Session {
        token: Uuid::new_v4().simple().to_string(),
        auth_id: auth_id.to_string(),
        roles,
        created_at: Utc::now(),
    };
    records::put_record(pool, SESSION_COLLECTION, &session.token, &session).await?;
    Ok(session)
}

/// Look up the session behind a token.
pub async fn verify_session(pool: &DbPool, token: &str) -> DocResult<Option<Session>> {
    if token.is_empty() {
        return Ok(None);
    }
    Ok(records::get_record(pool, SESSION_COLLECTION, token).await?)
}

pub async fn revoke_session(pool: &DbPool, token: &str) -> DocResult<bool> {
    Ok(records::delete_record(pool, SESSION_COLLECTION, token).await?)
}

/// Revoke every open session of an identity. Returns how many were open.
pub async fn revoke_sessions_for(pool: &DbPool, auth_id: &str) -> DocResult<usize> {
    let sessions: Vec<Session> = records::list_records(pool, SESSION_COLLECTION).await?;
    let mut revoked = 0;
    for session in sessions.iter().filter(|s| s.auth_id == auth_id) {
        if records::delete_record(pool, SESSION_COLLECTION, &session.token).await? {
            revoked += 1;
        }
    }
    Ok(revoked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_is_unique_by_email() {
        let pool = famdoc_db::in_memory();
        let first = sign_up(&pool, "Anna@Example.org").await.unwrap();
        assert!(matches!(first, SignUpOutcome::Created(_)));

        let second = sign_up(&pool, " anna@example.org ").await.unwrap();
        assert_eq!(second, SignUpOutcome::EmailAlreadyExists);

        let found = find_identity_by_email(&pool, "ANNA@example.org").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_reset_token_requires_identity() {
        let pool = famdoc_db::in_memory();
        let err = create_reset_password_token(&pool, "ghost").await.unwrap_err();
        assert!(matches!(err, DocError::UnknownUser(_)));

        let SignUpOutcome::Created(identity) = sign_up(&pool, "b@example.org").await.unwrap() else {
            panic!("expected new identity");
        };
        let token = create_reset_password_token(&pool, &identity.auth_id).await.unwrap();
        assert_eq!(
            invite_link("http://localhost:3000/", &token),
            format!("http://localhost:3000/auth/reset-password?token={}", token.token)
        );
    }

    #[tokio::test]
    async fn test_sessions() {
        let pool = famdoc_db::in_memory();
        let session = create_session(&pool, "auth-1", vec![ADMIN_ROLE_CLAIM.into()]).await.unwrap();
        let found = verify_session(&pool, &session.token).await.unwrap().unwrap();
        assert!(found.has_role("admin"));

        assert!(revoke_session(&pool, &session.token).await.unwrap());
        assert!(verify_session(&pool, &session.token).await.unwrap().is_none());
        assert!(verify_session(&pool, "").await.unwrap().is_none());
    }
}
