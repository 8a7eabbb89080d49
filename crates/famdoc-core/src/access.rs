//! Role-based access to records.
//!
//! Every endpoint funnels its authorization through [`can_access`]:
//! USER actors reach only what they own, ORGCONTROLLER actors reach
//! everything inside their organization, ADMIN actors reach everything.

use crate::error::{DocError, DocResult};
use crate::user::model::{Role, User};

/// A record with an owner and an optional organization.
pub trait Scoped {
    /// Id of the owning user.
    fn owner_id(&self) -> Option<&str>;

    fn organization_id(&self) -> Option<&str>;
}

/// Whether `actor` may read or change `resource`.
pub fn can_access<R: Scoped + ?Sized>(actor: &User, resource: &R) -> bool {
    let owns = resource.owner_id() == Some(actor.id.as_str());
    match actor.role {
        Role::Admin => true,
        Role::OrgController => match (actor.organization_id.as_deref(), resource.organization_id()) {
            (Some(mine), Some(theirs)) => mine == theirs || owns,
            // An org controller without an organization behaves like a user
            _ => owns,
        },
        Role::User => owns,
    }
}

/// [`can_access`] as a result, for `?` in services.
pub fn ensure_access<R: Scoped + ?Sized>(actor: &User, resource: &R) -> DocResult<()> {
    if can_access(actor, resource) {
        Ok(())
    } else {
        Err(DocError::forbidden(format!("user {} ({})", actor.id, actor.role.as_str())))
    }
}

pub fn require_role(actor: &User, role: Role) -> DocResult<()> {
    if actor.role == role {
        Ok(())
    } else {
        Err(DocError::forbidden(format!(
            "requires {}, user {} is {}",
            role.as_str(),
            actor.id,
            actor.role.as_str()
        )))
    }
}

/// Keep only the records `actor` may see.
pub fn visible_to<R: Scoped>(actor: &User, records: Vec<R>) -> Vec<R> {
    records.into_iter().filter(|r| can_access(actor, r)).collect()
}

/// The organization an actor's new records belong to. Org controllers and
/// users are pinned to their own; admins may choose.
pub fn effective_organization(actor: &User, requested: Option<String>) -> Option<String> {
    match actor.role {
        Role::Admin => requested.or_else(|| actor.organization_id.clone()),
        Role::OrgController | Role::User => actor.organization_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    struct Record {
        owner: &'static str,
        org: Option<&'static str>,
    }

    impl Scoped for Record {
        fn owner_id(&self) -> Option<&str> {
            Some(self.owner)
        }

        fn organization_id(&self) -> Option<&str> {
            self.org
        }
    }

    fn actor(id: &str, role: Role, org: Option<&str>) -> User {
        User {
            id: id.to_string(),
            auth_id: format!("auth-{}", id),
            email: format!("{}@example.org", id),
            name: None,
            role,
            organization_id: org.map(str::to_string),
            organization: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_only_own_records() {
        let me = actor("u1", Role::User, Some("org1"));
        assert!(can_access(&me, &Record { owner: "u1", org: Some("org1") }));
        assert!(!can_access(&me, &Record { owner: "u2", org: Some("org1") }));
    }

    #[test]
    fn test_org_controller_scoped_to_organization() {
        let ctl = actor("c1", Role::OrgController, Some("org1"));
        assert!(can_access(&ctl, &Record { owner: "u2", org: Some("org1") }));
        assert!(!can_access(&ctl, &Record { owner: "u3", org: Some("org2") }));
        assert!(!can_access(&ctl, &Record { owner: "u3", org: None }));
    }

    #[test]
    fn test_org_controller_without_org_sees_own() {
        let ctl = actor("c1", Role::OrgController, None);
        assert!(can_access(&ctl, &Record { owner: "c1", org: Some("org1") }));
        assert!(!can_access(&ctl, &Record { owner: "u2", org: Some("org1") }));
    }

    #[test]
    fn test_admin_unrestricted() {
        let admin = actor("a1", Role::Admin, None);
        assert!(can_access(&admin, &Record { owner: "anyone", org: Some("org9") }));
        assert!(ensure_access(&admin, &Record { owner: "x", org: None }).is_ok());
    }

    #[test]
    fn test_effective_organization_is_pinned() {
        let ctl = actor("c1", Role::OrgController, Some("org1"));
        assert_eq!(effective_organization(&ctl, Some("org2".into())).as_deref(), Some("org1"));

        let admin = actor("a1", Role::Admin, None);
        assert_eq!(effective_organization(&admin, Some("org2".into())).as_deref(), Some("org2"));
    }
}
