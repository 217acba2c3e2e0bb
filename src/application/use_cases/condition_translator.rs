// ============================================================
// CONDITION TRANSLATOR
// ============================================================
// Turn parsed visibility conditions into the prose shown to admins and
// respondents, resolving characteristic tokens through the context's
// map. Tokens that fail to resolve fall back to the raw token text and
// are flagged so the UI can render unexplained logic distinctly.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::characteristic::{TranslatedCondition, TranslatedEnableWhen};
use crate::domain::enable_when::{EnableWhen, EnableWhenCondition};
use crate::domain::question::QuestionRecord;

use super::characteristic_map::{build_characteristic_map, CharacteristicMap};
use super::enable_when_parser::parse_enable_when;

/// Fixed operator vocabulary. Anything outside it passes through
/// verbatim so stored expressions can never render as an error.
fn operator_phrase(operator: &str, value: Option<&str>) -> String {
    match (operator, value) {
        ("=", Some("true")) => "is answered".to_string(),
        ("=", Some("false")) => "is not answered".to_string(),
        ("=", v) => format!("equals \"{}\"", v.unwrap_or("")),
        ("!=", v) => format!("does not equal \"{}\"", v.unwrap_or("")),
        ("<", v) => format!("is less than {}", v.unwrap_or("")),
        (">", v) => format!("is greater than {}", v.unwrap_or("")),
        ("<=", v) => format!("is at most {}", v.unwrap_or("")),
        (">=", v) => format!("is at least {}", v.unwrap_or("")),
        ("exists", None) => "has no value".to_string(),
        ("exists", Some(_)) => "has a value".to_string(),
        (op, v) => format!("{} {}", op, v.unwrap_or("")).trim_end().to_string(),
    }
}

/// Render one condition against the context map. `logic_after` is the
/// connective rendered between this condition and the next, absent on
/// the last condition of its list.
pub fn translate_condition(
    condition: &EnableWhenCondition,
    map: &CharacteristicMap,
    logic_after: Option<crate::domain::enable_when::LogicOp>,
) -> TranslatedCondition {
    let value = condition.value.as_deref();

    let (readable, raw) = match map.get(&condition.characteristic) {
        Some(source) => match source.option_text.as_deref() {
            Some(option) => {
                let readable = match (condition.operator.as_str(), value) {
                    ("=", Some("true")) => {
                        format!("{} is answered \"{}\"", source.question_text, option)
                    }
                    ("=", Some("false")) => {
                        format!("{} is not \"{}\"", source.question_text, option)
                    }
                    (op, v) => format!(
                        "{} → {} {}",
                        source.question_text,
                        option,
                        operator_phrase(op, v)
                    ),
                };
                (readable, false)
            }
            None => (
                format!(
                    "{} {}",
                    source.question_text,
                    operator_phrase(&condition.operator, value)
                ),
                false,
            ),
        },
        None => {
            warn!(
                characteristic = condition.characteristic.as_str(),
                "Characteristic not defined by any question in this context"
            );
            (
                format!(
                    "{} {}",
                    condition.characteristic,
                    operator_phrase(&condition.operator, value)
                ),
                true,
            )
        }
    };

    TranslatedCondition {
        readable,
        raw,
        logic: logic_after,
    }
}

/// Render a whole expression: every condition plus the joined summary.
pub fn translate_enable_when(
    enable_when: &EnableWhen,
    map: &CharacteristicMap,
) -> TranslatedEnableWhen {
    let last = enable_when.conditions.len().saturating_sub(1);
    let conditions: Vec<TranslatedCondition> = enable_when
        .conditions
        .iter()
        .enumerate()
        .map(|(index, condition)| {
            let logic_after = if index < last {
                Some(enable_when.logic)
            } else {
                None
            };
            translate_condition(condition, map, logic_after)
        })
        .collect();

    let readables: Vec<&str> = conditions.iter().map(|c| c.readable.as_str()).collect();
    let summary = format!("Shown when: {}", readables.join(enable_when.logic.joiner()));

    TranslatedEnableWhen {
        conditions,
        summary,
    }
}

/// Translate every conditional question in one rendering context. The
/// map is built once from the full question set; questions with no
/// expression (always visible) are absent from the result.
pub fn translate_context(questions: &[QuestionRecord]) -> HashMap<i64, TranslatedEnableWhen> {
    let map = build_characteristic_map(questions);

    questions
        .iter()
        .filter_map(|question| {
            let raw = question.enable_when.as_deref()?;
            let parsed = parse_enable_when(raw)?;
            Some((question.id, translate_enable_when(&parsed, &map)))
        })
        .collect()
}
