//! Surveys and their responses.

pub mod model;
pub mod tabulate;

use chrono::Utc;
use famdoc_db::{records, DbPool};
use model::{NewResponse, NewSurvey, Response, ResponseUpdate, Survey, SurveyUpdate};
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

use crate::access::{ensure_access, visible_to};
use crate::answer::model::Answer;
use crate::answer::{apply_edit, find_answer, upsert_answer, AnswerEdit};
use crate::data_field::{self, model::DataField};
use crate::error::{DocError, DocResult};
use crate::family::{self, model::FamilyRef};
use crate::user::model::User;

const SURVEY_COLLECTION: &str = "survey";
const RESPONSE_COLLECTION: &str = "response";

pub async fn create_survey(pool: &DbPool, new: NewSurvey) -> DocResult<Survey> {
    if new.name.trim().is_empty() {
        return Err(DocError::validation("survey name is empty"));
    }
    let survey = Survey {
        id: Uuid::new_v4().to_string(),
        name: new.name,
        description: new.description,
        data_field_ids: new.data_field_ids,
        created_at: Utc::now(),
    };
    records::put_record(pool, SURVEY_COLLECTION, &survey.id, &survey).await?;
    info!(id = %survey.id, "created survey");
    Ok(survey)
}

pub async fn get_survey(pool: &DbPool, id: &str) -> DocResult<Survey> {
    Ok(records::require_record(pool, SURVEY_COLLECTION, id).await?)
}

pub async fn list_surveys(pool: &DbPool) -> DocResult<Vec<Survey>> {
    Ok(records::list_records(pool, SURVEY_COLLECTION).await?)
}

pub async fn update_survey(pool: &DbPool, id: &str, update: SurveyUpdate) -> DocResult<Survey> {
    let mut survey = get_survey(pool, id).await?;
    if let Some(name) = update.name {
        survey.name = name;
    }
    if let Some(description) = update.description {
        survey.description = Some(description);
    }
    if let Some(ids) = update.data_field_ids {
        survey.data_field_ids = ids;
    }
    records::put_record(pool, SURVEY_COLLECTION, id, &survey).await?;
    Ok(survey)
}

pub async fn delete_survey(pool: &DbPool, id: &str) -> DocResult<Survey> {
    let survey = get_survey(pool, id).await?;
    records::delete_record(pool, SURVEY_COLLECTION, id).await?;
    Ok(survey)
}

/// The survey's data fields in display order.
pub async fn survey_fields(pool: &DbPool, survey: &Survey) -> DocResult<Vec<DataField>> {
    data_field::resolve_data_fields(pool, &survey.data_field_ids).await
}

/// Create a response owned by `actor`.
pub async fn create_response(pool: &DbPool, actor: &User, new: NewResponse) -> DocResult<Response> {
    let survey = get_survey(pool, &new.survey_id)
        .await
        .map_err(|e| referenced("survey", e))?;
    check_answers(&survey, &new.answers)?;

    let family = match &new.family_id {
        Some(id) => Some(resolve_family(pool, actor, id).await?),
        None => None,
    };

    let now = Utc::now();
    let response = Response {
        id: Uuid::new_v4().to_string(),
        survey_id: survey.id,
        user_id: actor.id.clone(),
        organization_id: actor.organization_id.clone(),
        family,
        child_id: new.child_id,
        answers: new.answers,
        created_at: now,
        updated_at: now,
    };
    records::put_record(pool, RESPONSE_COLLECTION, &response.id, &response).await?;
    info!(id = %response.id, survey_id = %response.survey_id, "created response");
    Ok(response)
}

pub async fn get_response(pool: &DbPool, id: &str) -> DocResult<Response> {
    Ok(records::require_record(pool, RESPONSE_COLLECTION, id).await?)
}

/// Responses to a survey that `actor` may see, oldest first.
pub async fn list_responses(pool: &DbPool, actor: &User, survey_id: &str) -> DocResult<Vec<Response>> {
    let all: Vec<Response> = records::list_records(pool, RESPONSE_COLLECTION).await?;
    let mut responses: Vec<Response> = visible_to(actor, all)
        .into_iter()
        .filter(|r| r.survey_id == survey_id)
        .collect();
    responses.sort_by_key(|r| r.created_at);
    Ok(responses)
}

pub async fn update_response(
    pool: &DbPool,
    actor: &User,
    id: &str,
    update: ResponseUpdate,
) -> DocResult<Response> {
    let mut response = get_response(pool, id).await?;
    if let Some(family_id) = update.family_id {
        response.family = Some(resolve_family(pool, actor, &family_id).await?);
    }
    if let Some(child_id) = update.child_id {
        response.child_id = Some(child_id);
    }
    if let Some(answers) = update.answers {
        let survey = get_survey(pool, &response.survey_id).await?;
        check_answers(&survey, &answers)?;
        response.answers = answers;
    }
    response.updated_at = Utc::now();
    records::put_record(pool, RESPONSE_COLLECTION, id, &response).await?;
    Ok(response)
}

pub async fn delete_response(pool: &DbPool, id: &str) -> DocResult<Response> {
    let response = get_response(pool, id).await?;
    records::delete_record(pool, RESPONSE_COLLECTION, id).await?;
    Ok(response)
}

/// Apply one edit event to the answer for `data_field_id`.
pub async fn edit_response_answer(
    pool: &DbPool,
    mut response: Response,
    data_field_id: &str,
    edit: &AnswerEdit,
) -> DocResult<Response> {
    let survey = get_survey(pool, &response.survey_id).await?;
    if !survey.data_field_ids.iter().any(|id| id == data_field_id) {
        return Err(DocError::validation(format!(
            "field {} is not part of survey {}",
            data_field_id, survey.id
        )));
    }
    let field = data_field::get_data_field(pool, data_field_id).await?;

    let next = apply_edit(find_answer(&response.answers, data_field_id), &field, edit)?;
    debug!(response_id = %response.id, data_field_id, "applied answer edit");
    upsert_answer(&mut response.answers, next);
    response.updated_at = Utc::now();
    records::put_record(pool, RESPONSE_COLLECTION, &response.id, &response).await?;
    Ok(response)
}

fn check_answers(survey: &Survey, answers: &[Answer]) -> DocResult<()> {
    let mut seen = HashSet::new();
    for answer in answers {
        if !survey.data_field_ids.contains(&answer.data_field_id) {
            return Err(DocError::validation(format!(
                "field {} is not part of survey {}",
                answer.data_field_id, survey.id
            )));
        }
        if !seen.insert(answer.data_field_id.as_str()) {
            return Err(DocError::validation(format!(
                "field {} is answered twice",
                answer.data_field_id
            )));
        }
    }
    Ok(())
}

async fn resolve_family(pool: &DbPool, actor: &User, family_id: &str) -> DocResult<FamilyRef> {
    let family = family::get_family(pool, family_id)
        .await
        .map_err(|e| referenced("family", e))?;
    ensure_access(actor, &family)?;
    Ok(FamilyRef::from(&family))
}

/// A missing record named in a request body is bad input, not a missing target.
fn referenced(what: &str, err: DocError) -> DocError {
    match err {
        DocError::NotFound(id) => DocError::validation(format!("unknown {}: {}", what, id)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_field::model::{CollectionType, NewDataField};
    use crate::family::model::NewFamily;
    use crate::user::model::Role;

    fn staff(id: &str, role: Role, org: &str) -> User {
        User {
            id: id.into(),
            auth_id: id.into(),
            email: format!("{}@example.org", id),
            name: None,
            role,
            organization_id: Some(org.into()),
            organization: None,
            created_at: Utc::now(),
        }
    }

    async fn bool_survey(pool: &DbPool) -> (Survey, DataField) {
        let field = data_field::create_data_field(
            pool,
            NewDataField {
                name: "Kita".into(),
                description: None,
                collection_type: CollectionType::Bool,
                select_options: vec![],
                default_options: vec![],
            },
        )
        .await
        .unwrap();
        let survey = create_survey(
            pool,
            NewSurvey {
                name: "Intake".into(),
                description: None,
                data_field_ids: vec![field.id.clone()],
            },
        )
        .await
        .unwrap();
        (survey, field)
    }

    #[tokio::test]
    async fn test_edit_answer_through_response() {
        let pool = famdoc_db::in_memory();
        let (survey, field) = bool_survey(&pool).await;
        let me = staff("u1", Role::User, "org1");

        let response = create_response(
            &pool,
            &me,
            NewResponse { survey_id: survey.id.clone(), family_id: None, child_id: None, answers: vec![] },
        )
        .await
        .unwrap();

        let edit = AnswerEdit::Bool { value: true };
        let response = edit_response_answer(&pool, response, &field.id, &edit).await.unwrap();
        assert_eq!(response.answers[0].answer_bool, Some(true));

        let response = edit_response_answer(&pool, response, &field.id, &edit).await.unwrap();
        assert_eq!(response.answers.len(), 1);
        assert_eq!(response.answers[0].answer_bool, None);

        let stored = get_response(&pool, &response.id).await.unwrap();
        assert_eq!(stored.answers, response.answers);
    }

    #[tokio::test]
    async fn test_response_for_foreign_family_is_forbidden() {
        let pool = famdoc_db::in_memory();
        let (survey, _) = bool_survey(&pool).await;
        let owner = staff("u1", Role::User, "org1");
        let stranger = staff("u2", Role::User, "org1");
        let family = family::create_family(&pool, &owner, NewFamily::default()).await.unwrap();

        let result = create_response(
            &pool,
            &stranger,
            NewResponse { survey_id: survey.id, family_id: Some(family.id), child_id: None, answers: vec![] },
        )
        .await;
        assert!(matches!(result, Err(DocError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_unknown_survey_is_bad_input() {
        let pool = famdoc_db::in_memory();
        let me = staff("u1", Role::User, "org1");
        let result = create_response(
            &pool,
            &me,
            NewResponse { survey_id: "nope".into(), family_id: None, child_id: None, answers: vec![] },
        )
        .await;
        assert!(matches!(result, Err(DocError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_field_answered_twice_is_rejected() {
        let pool = famdoc_db::in_memory();
        let (survey, field) = bool_survey(&pool).await;
        let me = staff("u1", Role::User, "org1");
        let response = create_response(
            &pool,
            &me,
            NewResponse { survey_id: survey.id, family_id: None, child_id: None, answers: vec![] },
        )
        .await
        .unwrap();

        let answer = |value| Answer { data_field_id: field.id.clone(), answer_bool: Some(value), ..Default::default() };
        let update = ResponseUpdate { answers: Some(vec![answer(true), answer(false)]), ..Default::default() };
        let result = update_response(&pool, &me, &response.id, update).await;
        assert!(matches!(result, Err(DocError::ValidationError(_))));
        assert!(get_response(&pool, &response.id).await.unwrap().answers.is_empty());
    }
}
