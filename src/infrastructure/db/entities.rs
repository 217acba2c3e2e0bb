// Row-mapped entities. Timestamps are stored as sqlite text in UTC and
// surfaced to the domain as chrono types.

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::FromRow;

use crate::domain::question::QuestionRecord;
use crate::domain::questionnaire::{Questionnaire, QuestionnaireInstance, ShareLink};
use crate::domain::suggestion::{Suggestion, SuggestionStatus};

fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

#[derive(Debug, FromRow)]
pub struct QuestionnaireEntity {
    pub id: i64,
    pub title: String,
    pub owner_id: String,
    pub question_count: i64,
    pub created_at: NaiveDateTime,
}

impl From<QuestionnaireEntity> for Questionnaire {
    fn from(entity: QuestionnaireEntity) -> Self {
        Questionnaire {
            id: entity.id,
            title: entity.title,
            owner_id: entity.owner_id,
            question_count: entity.question_count,
            created_at: to_utc(entity.created_at),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct InstanceEntity {
    pub id: i64,
    pub master_id: i64,
    pub name: String,
    pub owner_id: String,
    pub created_at: NaiveDateTime,
}

impl From<InstanceEntity> for QuestionnaireInstance {
    fn from(entity: InstanceEntity) -> Self {
        QuestionnaireInstance {
            id: entity.id,
            master_id: entity.master_id,
            name: entity.name,
            owner_id: entity.owner_id,
            created_at: to_utc(entity.created_at),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct QuestionEntity {
    pub id: i64,
    pub master_id: Option<i64>,
    pub instance_id: Option<i64>,
    pub position: i64,
    pub question_key: String,
    pub section: String,
    pub page: String,
    pub item_type: String,
    pub question: String,
    pub answer_options: Option<String>,
    pub characteristic: Option<String>,
    pub required: bool,
    pub enable_when: Option<String>,
    pub has_helper: bool,
    pub helper_type: Option<String>,
    pub helper_name: Option<String>,
    pub helper_value: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<QuestionEntity> for QuestionRecord {
    fn from(entity: QuestionEntity) -> Self {
        QuestionRecord {
            id: entity.id,
            questionnaire_id: entity.master_id.or(entity.instance_id).unwrap_or_default(),
            position: entity.position,
            question_key: entity.question_key,
            section: entity.section,
            page: entity.page,
            item_type: entity.item_type,
            question: entity.question,
            answer_options: entity.answer_options,
            characteristic: entity.characteristic,
            required: entity.required,
            enable_when: entity.enable_when,
            has_helper: entity.has_helper,
            helper_type: entity.helper_type,
            helper_name: entity.helper_name,
            helper_value: entity.helper_value,
            created_at: to_utc(entity.created_at),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct ShareLinkEntity {
    pub id: i64,
    pub instance_id: i64,
    pub token_hash: String,
    pub revoked: bool,
    pub created_at: NaiveDateTime,
}

impl From<ShareLinkEntity> for ShareLink {
    fn from(entity: ShareLinkEntity) -> Self {
        ShareLink {
            id: entity.id,
            instance_id: entity.instance_id,
            token_hash: entity.token_hash,
            revoked: entity.revoked,
            created_at: to_utc(entity.created_at),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct SuggestionEntity {
    pub id: i64,
    pub instance_id: i64,
    pub question_id: i64,
    pub proposed_text: String,
    pub reason: String,
    pub status: String,
    pub admin_response: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SuggestionEntity> for Suggestion {
    fn from(entity: SuggestionEntity) -> Self {
        Suggestion {
            id: entity.id,
            instance_id: entity.instance_id,
            question_id: entity.question_id,
            proposed_text: entity.proposed_text,
            reason: entity.reason,
            // Stored statuses come from SuggestionStatus::as_str; an
            // unrecognized value means a hand-edited row, treat as pending.
            status: entity
                .status
                .parse::<SuggestionStatus>()
                .unwrap_or(SuggestionStatus::Pending),
            admin_response: entity.admin_response,
            created_at: to_utc(entity.created_at),
            updated_at: to_utc(entity.updated_at),
        }
    }
}
