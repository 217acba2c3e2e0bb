// ============================================================
// UPLOAD CSV ROW
// ============================================================
// Raw shape of one row in an uploaded questionnaire CSV.
// One row per answer option; rows sharing an Id form one question.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreOpCsvRow {
    /// Question identifier. Rows with equal ids belong to one question.
    #[serde(rename = "Id", default)]
    pub id: String,

    #[serde(rename = "Section", default)]
    pub section: String,

    #[serde(rename = "Page", default)]
    pub page: String,

    #[serde(rename = "ItemType", default)]
    pub item_type: String,

    #[serde(rename = "Question", default)]
    pub question: String,

    /// Display text of the answer option carried by this row, if any.
    #[serde(rename = "Option", default)]
    pub option: String,

    /// Opaque token naming this row's option (or the whole question)
    /// in conditional-visibility expressions.
    #[serde(rename = "Characteristic", default)]
    pub characteristic: String,

    #[serde(rename = "Required", default)]
    pub required: String,

    #[serde(rename = "EnableWhen", default)]
    pub enable_when: String,

    #[serde(rename = "HasHelper", default)]
    pub has_helper: String,

    #[serde(rename = "HelperType", default)]
    pub helper_type: String,

    #[serde(rename = "HelperName", default)]
    pub helper_name: String,

    #[serde(rename = "HelperValue", default)]
    pub helper_value: String,
}

impl PreOpCsvRow {
    /// Whether the row carries a usable question identifier.
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}
