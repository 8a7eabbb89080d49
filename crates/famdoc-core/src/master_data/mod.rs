//! Master data types and their numbered records.

pub mod model;

use chrono::Utc;
use famdoc_db::{records, DbPool};
use model::{record_key, MasterData, MasterDataType, MasterDataUpdate, NewMasterDataType};
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use crate::access::visible_to;
use crate::answer::model::Answer;
use crate::answer::{apply_edit, find_answer, upsert_answer, AnswerEdit};
use crate::data_field;
use crate::error::{DocError, DocResult};
use crate::family::search::leading_int;
use crate::user::model::User;

const TYPE_COLLECTION: &str = "master_data_type";
const COLLECTION: &str = "master_data";

fn sequence_name(master_data_type_id: &str) -> String {
    format!("master_data:{}", master_data_type_id)
}

pub async fn create_master_data_type(pool: &DbPool, new: NewMasterDataType) -> DocResult<MasterDataType> {
    if new.name.trim().is_empty() {
        return Err(DocError::validation("master data type name is empty"));
    }
    let mdt = MasterDataType {
        id: Uuid::new_v4().to_string(),
        name: new.name,
        data_field_ids: new.data_field_ids,
        created_at: Utc::now(),
    };
    records::put_record(pool, TYPE_COLLECTION, &mdt.id, &mdt).await?;
    info!(id = %mdt.id, name = %mdt.name, "created master data type");
    Ok(mdt)
}

pub async fn get_master_data_type(pool: &DbPool, id: &str) -> DocResult<MasterDataType> {
    Ok(records::require_record(pool, TYPE_COLLECTION, id).await?)
}

pub async fn list_master_data_types(pool: &DbPool) -> DocResult<Vec<MasterDataType>> {
    Ok(records::list_records(pool, TYPE_COLLECTION).await?)
}

/// Create the next record of a type, owned by `actor`.
pub async fn create_master_data(pool: &DbPool, actor: &User, master_data_type_id: &str) -> DocResult<MasterData> {
    let mdt = get_master_data_type(pool, master_data_type_id).await?;
    let number = pool.next_sequence(&sequence_name(&mdt.id)).await?;
    let now = Utc::now();
    let md = MasterData {
        master_data_type_id: mdt.id,
        number,
        created_by: actor.id.clone(),
        organization_id: actor.organization_id.clone(),
        answers: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    records::put_record(pool, COLLECTION, &md.key(), &md).await?;
    info!(key = %md.key(), "created master data");
    Ok(md)
}

pub async fn get_master_data(pool: &DbPool, master_data_type_id: &str, number: i64) -> DocResult<MasterData> {
    Ok(records::require_record(pool, COLLECTION, &record_key(master_data_type_id, number)).await?)
}

/// Records of a type visible to `actor`, ordered by number. A filter
/// that does not start with a number is ignored.
pub async fn list_master_data(
    pool: &DbPool,
    actor: &User,
    master_data_type_id: &str,
    filter: Option<&str>,
) -> DocResult<Vec<MasterData>> {
    let wanted = filter.and_then(leading_int);
    let all: Vec<MasterData> = records::list_records(pool, COLLECTION).await?;
    let mut found: Vec<MasterData> = visible_to(actor, all)
        .into_iter()
        .filter(|md| md.master_data_type_id == master_data_type_id)
        .filter(|md| wanted.map_or(true, |n| md.number == n))
        .collect();
    found.sort_by_key(|md| md.number);
    Ok(found)
}

pub async fn update_master_data(pool: &DbPool, mut md: MasterData, update: MasterDataUpdate) -> DocResult<MasterData> {
    if let Some(answers) = update.answers {
        let mdt = get_master_data_type(pool, &md.master_data_type_id).await?;
        check_answers(&mdt, &answers)?;
        md.answers = answers;
    }
    md.updated_at = Utc::now();
    records::put_record(pool, COLLECTION, &md.key(), &md).await?;
    Ok(md)
}

pub async fn delete_master_data(pool: &DbPool, md: MasterData) -> DocResult<MasterData> {
    records::delete_record(pool, COLLECTION, &md.key()).await?;
    info!(key = %md.key(), "deleted master data");
    Ok(md)
}

/// Apply one edit event to the answer for `data_field_id`.
pub async fn edit_master_data_answer(
    pool: &DbPool,
    mut md: MasterData,
    data_field_id: &str,
    edit: &AnswerEdit,
) -> DocResult<MasterData> {
    let mdt = get_master_data_type(pool, &md.master_data_type_id).await?;
    if !mdt.data_field_ids.iter().any(|id| id == data_field_id) {
        return Err(DocError::validation(format!(
            "field {} is not part of master data type {}",
            data_field_id, mdt.id
        )));
    }
    let field = data_field::get_data_field(pool, data_field_id).await?;
    let next = apply_edit(find_answer(&md.answers, data_field_id), &field, edit)?;
    upsert_answer(&mut md.answers, next);
    md.updated_at = Utc::now();
    records::put_record(pool, COLLECTION, &md.key(), &md).await?;
    Ok(md)
}

fn check_answers(mdt: &MasterDataType, answers: &[Answer]) -> DocResult<()> {
    if let Some(stray) = answers.iter().find(|a| !mdt.data_field_ids.contains(&a.data_field_id)) {
        return Err(DocError::validation(format!(
            "field {} is not part of master data type {}",
            stray.data_field_id, mdt.id
        )));
    }
    let mut seen = HashSet::new();
    match answers.iter().find(|a| !seen.insert(a.data_field_id.as_str())) {
        Some(twice) => Err(DocError::validation(format!(
            "field {} is answered twice",
            twice.data_field_id
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::model::Role;

    fn staff(id: &str) -> User {
        User {
            id: id.into(),
            auth_id: id.into(),
            email: format!("{}@example.org", id),
            name: None,
            role: Role::User,
            organization_id: None,
            organization: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_numbers_per_type_and_filter() {
        let pool = famdoc_db::in_memory();
        let me = staff("u1");
        let akte = create_master_data_type(&pool, NewMasterDataType { name: "Akte".into(), data_field_ids: vec![] })
            .await
            .unwrap();
        let kurs = create_master_data_type(&pool, NewMasterDataType { name: "Kurs".into(), data_field_ids: vec![] })
            .await
            .unwrap();

        create_master_data(&pool, &me, &akte.id).await.unwrap();
        let second = create_master_data(&pool, &me, &akte.id).await.unwrap();
        let other = create_master_data(&pool, &me, &kurs.id).await.unwrap();
        assert_eq!(second.number, 2);
        assert_eq!(other.number, 1);

        assert_eq!(list_master_data(&pool, &me, &akte.id, None).await.unwrap().len(), 2);
        let filtered = list_master_data(&pool, &me, &akte.id, Some("2")).await.unwrap();
        assert_eq!(filtered, vec![second]);
        let ignored = list_master_data(&pool, &me, &akte.id, Some("abc")).await.unwrap();
        assert_eq!(ignored.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_type() {
        let pool = famdoc_db::in_memory();
        let result = create_master_data(&pool, &staff("u1"), "nope").await;
        assert!(matches!(result, Err(DocError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_replacing_answers_checks_fields() {
        let pool = famdoc_db::in_memory();
        let me = staff("u1");
        let akte = create_master_data_type(
            &pool,
            NewMasterDataType { name: "Akte".into(), data_field_ids: vec!["f1".into()] },
        )
        .await
        .unwrap();
        let md = create_master_data(&pool, &me, &akte.id).await.unwrap();

        let answer = |id: &str| Answer { data_field_id: id.into(), answer_text: Some("x".into()), ..Default::default() };
        let twice = MasterDataUpdate { answers: Some(vec![answer("f1"), answer("f1")]) };
        let result = update_master_data(&pool, md.clone(), twice).await;
        assert!(matches!(result, Err(DocError::ValidationError(_))));

        let stray = MasterDataUpdate { answers: Some(vec![answer("f2")]) };
        let result = update_master_data(&pool, md.clone(), stray).await;
        assert!(matches!(result, Err(DocError::ValidationError(_))));

        let once = MasterDataUpdate { answers: Some(vec![answer("f1")]) };
        let updated = update_master_data(&pool, md, once).await.unwrap();
        assert_eq!(updated.answers.len(), 1);
    }
}
