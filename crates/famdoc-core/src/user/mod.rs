//! Staff users and organizations.

pub mod model;

use chrono::Utc;
use famdoc_db::{records, DbPool};
use model::{NewUser, Organization, Role, User, UserFilter, UserUpdate};
use tracing::info;
use uuid::Uuid;

use crate::auth::{self, model::Identity};
use crate::error::{DocError, DocResult};

const COLLECTION: &str = "user";
const ORG_COLLECTION: &str = "organization";
const AUTH_ID_INDEX: &str = "user_auth_id";

/// Create the user record for an identity. One user per identity.
pub async fn create_user(
    pool: &DbPool,
    auth_id: &str,
    new: NewUser,
    organization_id: Option<String>,
) -> DocResult<User> {
    let user = User {
        id: Uuid::new_v4().to_string(),
        auth_id: auth_id.to_string(),
        email: new.email,
        name: new.name,
        role: new.role.unwrap_or(Role::User),
        organization_id,
        organization: None,
        created_at: Utc::now(),
    };

    if !pool.claim_unique(AUTH_ID_INDEX, auth_id, &user.id).await? {
        return Err(DocError::validation(format!("identity {} already has a user", auth_id)));
    }
    records::put_record(pool, COLLECTION, &user.id, &user).await?;
    info!(id = %user.id, role = user.role.as_str(), "created user");
    Ok(user)
}

pub async fn get_user(pool: &DbPool, id: &str) -> DocResult<User> {
    let user: User = records::require_record(pool, COLLECTION, id).await?;
    with_organization(pool, user).await
}

/// Resolve the user record behind an identity.
pub async fn find_user_by_auth_id(pool: &DbPool, auth_id: &str) -> DocResult<Option<User>> {
    let Some(user_id) = pool.lookup_unique(AUTH_ID_INDEX, auth_id).await? else {
        return Ok(None);
    };
    Ok(records::get_record(pool, COLLECTION, &user_id).await?)
}

/// Users matching `filter`, each with its organization embedded.
pub async fn list_users(pool: &DbPool, filter: &UserFilter) -> DocResult<Vec<User>> {
    let all: Vec<User> = records::list_records(pool, COLLECTION).await?;
    let mut users = Vec::new();
    for user in all.into_iter().filter(|u| filter.matches(u)) {
        users.push(with_organization(pool, user).await?);
    }
    Ok(users)
}

/// The identity behind `email` when it has no user record, e.g. after
/// its user was deleted.
pub async fn unclaimed_identity(pool: &DbPool, email: &str) -> DocResult<Option<Identity>> {
    let Some(identity) = auth::find_identity_by_email(pool, email).await? else {
        return Ok(None);
    };
    if find_user_by_auth_id(pool, &identity.auth_id).await?.is_some() {
        return Ok(None);
    }
    Ok(Some(identity))
}

/// Apply an update made by `actor`. Only admins hand out the admin role,
/// change an admin, or move users between organizations.
pub async fn update_user(pool: &DbPool, actor: &User, id: &str, update: UserUpdate) -> DocResult<User> {
    let mut user: User = records::require_record(pool, COLLECTION, id).await?;
    ensure_can_manage(actor, &user)?;

    if let Some(role) = update.role {
        ensure_can_assign_role(actor, role)?;
        user.role = role;
    }
    if let Some(org) = update.organization_id {
        if actor.role != Role::Admin {
            return Err(DocError::forbidden("only admins change organizations"));
        }
        user.organization_id = Some(org);
    }
    if let Some(name) = update.name {
        user.name = Some(name);
    }

    user.organization = None;
    records::put_record(pool, COLLECTION, id, &user).await?;
    with_organization(pool, user).await
}

/// Delete a user record. The identity stays and may be given a new user;
/// its open sessions are revoked.
pub async fn delete_user(pool: &DbPool, actor: &User, id: &str) -> DocResult<User> {
    let user: User = records::require_record(pool, COLLECTION, id).await?;
    ensure_can_manage(actor, &user)?;

    records::delete_record(pool, COLLECTION, id).await?;
    pool.release_unique(AUTH_ID_INDEX, &user.auth_id).await?;
    let revoked = auth::revoke_sessions_for(pool, &user.auth_id).await?;
    info!(id, revoked, "deleted user");
    Ok(user)
}

/// Admins are only changed by admins.
pub fn ensure_can_manage(actor: &User, target: &User) -> DocResult<()> {
    if target.role == Role::Admin && actor.role != Role::Admin {
        return Err(DocError::forbidden(format!(
            "{} may not change admin {}",
            actor.role.as_str(),
            target.id
        )));
    }
    Ok(())
}

/// Whether `actor` may give someone `role`.
pub fn ensure_can_assign_role(actor: &User, role: Role) -> DocResult<()> {
    let allowed = match actor.role {
        Role::Admin => true,
        Role::OrgController => role != Role::Admin,
        Role::User => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(DocError::forbidden(format!(
            "{} may not assign {}",
            actor.role.as_str(),
            role.as_str()
        )))
    }
}

pub async fn create_organization(pool: &DbPool, name: &str) -> DocResult<Organization> {
    let org = Organization {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
    };
    records::put_record(pool, ORG_COLLECTION, &org.id, &org).await?;
    info!(id = %org.id, name, "created organization");
    Ok(org)
}

pub async fn list_organizations(pool: &DbPool) -> DocResult<Vec<Organization>> {
    Ok(records::list_records(pool, ORG_COLLECTION).await?)
}

async fn with_organization(pool: &DbPool, mut user: User) -> DocResult<User> {
    user.organization = match &user.organization_id {
        Some(org_id) => records::get_record(pool, ORG_COLLECTION, org_id).await?,
        None => None,
    };
    Ok(user)
}
