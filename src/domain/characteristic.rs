// ============================================================
// CHARACTERISTIC RESOLUTION TYPES
// ============================================================
// Display-only structures mapping opaque characteristic tokens back to
// the question/option that defines them, and the readable translations
// derived from them. Built per rendering context, never persisted.

use serde::{Deserialize, Serialize};

use super::enable_when::LogicOp;

/// Where a characteristic token comes from: the defining question, and
/// the specific option when the token is option-scoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicSource {
    pub question_id: i64,
    pub question_text: String,
    pub option_text: Option<String>,
}

/// One condition rendered as prose. `raw` marks tokens that could not
/// be resolved against the current context's map, so the UI can show
/// unexplained logic differently from explained logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedCondition {
    pub readable: String,
    pub raw: bool,
    /// Connective rendered after this condition; absent on the last one.
    pub logic: Option<LogicOp>,
}

/// A whole expression rendered for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedEnableWhen {
    pub conditions: Vec<TranslatedCondition>,
    pub summary: String,
}
