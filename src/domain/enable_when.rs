// ============================================================
// CONDITIONAL VISIBILITY EXPRESSIONS
// ============================================================
// A flat boolean expression over characteristic tokens: a list of
// conditions joined by one connective. No nesting, no mixed logic.

use serde::{Deserialize, Serialize};

/// Connective applied uniformly across all conditions of one expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicOp {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl LogicOp {
    /// Lower-case connective used when joining readable fragments.
    pub fn joiner(self) -> &'static str {
        match self {
            LogicOp::And => " and ",
            LogicOp::Or => " or ",
        }
    }
}

/// One comparison against a characteristic. The operator is carried as
/// the raw token (`=`, `!=`, `<`, `>`, `<=`, `>=`, `exists`) so that
/// anything unexpected can still be rendered verbatim downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnableWhenCondition {
    pub characteristic: String,
    pub operator: String,
    pub value: Option<String>,
}

/// Parsed visibility expression: at least one condition, one logic value
/// shared by the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnableWhen {
    pub conditions: Vec<EnableWhenCondition>,
    pub logic: LogicOp,
}
