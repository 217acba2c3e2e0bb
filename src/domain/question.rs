// ============================================================
// QUESTION TYPES
// ============================================================
// Grouped, normalized questions as produced by the CSV pipeline
// and as persisted per questionnaire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::enable_when::EnableWhen;

/// The fixed set of renderable question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Radio,
    Checkbox,
    Dropdown,
    Text,
    #[serde(rename = "textarea")]
    TextArea,
    Number,
    Date,
    Info,
}

impl ItemType {
    /// Kinds that must carry at least two answer options.
    pub fn requires_options(self) -> bool {
        matches!(self, ItemType::Radio | ItemType::Checkbox)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Radio => "radio",
            ItemType::Checkbox => "checkbox",
            ItemType::Dropdown => "dropdown",
            ItemType::Text => "text",
            ItemType::TextArea => "textarea",
            ItemType::Number => "number",
            ItemType::Date => "date",
            ItemType::Info => "info",
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "radio" => Ok(ItemType::Radio),
            "checkbox" => Ok(ItemType::Checkbox),
            "dropdown" => Ok(ItemType::Dropdown),
            "text" => Ok(ItemType::Text),
            "textarea" => Ok(ItemType::TextArea),
            "number" => Ok(ItemType::Number),
            "date" => Ok(ItemType::Date),
            "info" => Ok(ItemType::Info),
            other => Err(format!("Unknown item type: {}", other)),
        }
    }
}

/// One answer option of a question, in upload order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: String,
    pub characteristic: Option<String>,
}

/// A question built from one CSV row-group. Item type is kept as the
/// raw lower-cased tag here; enumeration membership is enforced by the
/// upload use case before anything is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedQuestion {
    pub id: String,
    pub section: String,
    pub page: String,
    pub item_type: String,
    pub question: String,
    pub options: Vec<QuestionOption>,
    /// Characteristic attached to the question itself rather than to an
    /// option. Only set for option-less questions.
    pub characteristic: Option<String>,
    pub required: bool,
    pub enable_when: Option<EnableWhen>,
    /// Raw visibility expression as uploaded, kept for persistence.
    pub enable_when_raw: Option<String>,
    pub has_helper: bool,
    pub helper_type: Option<String>,
    pub helper_name: Option<String>,
    pub helper_value: Option<String>,
}

impl ParsedQuestion {
    /// Pipe-joined option display texts, as persisted.
    pub fn answer_options_field(&self) -> Option<String> {
        if self.options.is_empty() {
            return None;
        }
        Some(
            self.options
                .iter()
                .map(|o| o.value.as_str())
                .collect::<Vec<_>>()
                .join("|"),
        )
    }

    /// Pipe-joined characteristic tokens, aligned positionally with
    /// `answer_options_field`. For option-less questions this is the
    /// single question-level token.
    pub fn characteristic_field(&self) -> Option<String> {
        if self.options.is_empty() {
            return self.characteristic.clone();
        }
        let tokens: Vec<&str> = self
            .options
            .iter()
            .map(|o| o.characteristic.as_deref().unwrap_or(""))
            .collect();
        if tokens.iter().all(|t| t.is_empty()) {
            return None;
        }
        Some(tokens.join("|"))
    }
}

/// A persisted question row, scoped to a master or an instance.
/// Option lists and characteristic tokens are stored pipe-joined, in
/// the order the upload produced them; the characteristic map builder
/// relies on that alignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: i64,
    pub questionnaire_id: i64,
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
    pub created_at: DateTime<Utc>,
}
