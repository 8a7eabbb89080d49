//! Family records.

pub mod model;
pub mod search;

use chrono::Utc;
use famdoc_db::{records, DbPool};
use model::{Family, FamilyUpdate, NewFamily};
use search::NumberRange;
use tracing::info;
use uuid::Uuid;

use crate::access::visible_to;
use crate::error::DocResult;
use crate::user::model::User;

const COLLECTION: &str = "family";
const NUMBER_SEQUENCE: &str = "family_number";

/// Create a family owned by `owner`, numbered from the family sequence.
pub async fn create_family(pool: &DbPool, owner: &User, new: NewFamily) -> DocResult<Family> {
    let number = pool.next_sequence(NUMBER_SEQUENCE).await?;
    let now = Utc::now();
    let family = Family {
        id: Uuid::new_v4().to_string(),
        number,
        user_id: owner.id.clone(),
        organization_id: owner.organization_id.clone(),
        children_in_household: new.children_in_household,
        caregivers: new.caregivers,
        children: new.children,
        comments: new.comments,
        created_at: now,
        updated_at: now,
    };
    records::put_record(pool, COLLECTION, &family.id, &family).await?;
    info!(id = %family.id, number, "created family");
    Ok(family)
}

pub async fn get_family(pool: &DbPool, id: &str) -> DocResult<Family> {
    Ok(records::require_record(pool, COLLECTION, id).await?)
}

/// Families visible to `actor`, optionally limited to a number range,
/// ordered by number.
pub async fn list_families(
    pool: &DbPool,
    actor: &User,
    range: Option<NumberRange>,
) -> DocResult<Vec<Family>> {
    let all: Vec<Family> = records::list_records(pool, COLLECTION).await?;
    let mut families: Vec<Family> = visible_to(actor, all)
        .into_iter()
        .filter(|f| range.map_or(true, |r| r.contains(f.number)))
        .collect();
    families.sort_by_key(|f| f.number);
    Ok(families)
}

pub async fn update_family(pool: &DbPool, id: &str, update: FamilyUpdate) -> DocResult<Family> {
    let mut family = get_family(pool, id).await?;
    family.apply(update);
    records::put_record(pool, COLLECTION, id, &family).await?;
    Ok(family)
}

/// Delete a family, returning the removed record.
pub async fn delete_family(pool: &DbPool, id: &str) -> DocResult<Family> {
    let family = get_family(pool, id).await?;
    records::delete_record(pool, COLLECTION, id).await?;
    info!(id, number = family.number, "deleted family");
    Ok(family)
}
