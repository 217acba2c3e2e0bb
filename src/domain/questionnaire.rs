use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin-authored master questionnaire, uploaded once from CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Questionnaire {
    pub id: i64,
    pub title: String,
    pub owner_id: String,
    pub question_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A clone of a master sent to one respondent group, with its own
/// feedback thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionnaireInstance {
    pub id: i64,
    pub master_id: i64,
    pub name: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// Shareable access to one instance. Only the sha256 digest of the
/// token is stored; the token itself is returned once at mint time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    pub id: i64,
    pub instance_id: i64,
    pub token_hash: String,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}
