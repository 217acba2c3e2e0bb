// ============================================================
// ENABLE-WHEN PARSER
// ============================================================
// Parse the compact conditional-visibility strings uploaded with each
// question, e.g. "(smoker=true) AND(age>17)". The grammar is flat: one
// connective governs the whole expression, conditions never nest.
//
// Uploaded expressions are externally authored and loosely validated,
// so this parser never fails. Fragments it cannot read degrade to
// bare "exists" conditions instead of blocking the upload.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::enable_when::{EnableWhen, EnableWhenCondition, LogicOp};

static OR_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bOR\b").unwrap());

// Connectives appear space-separated or directly between a closing and
// an opening parenthesis, e.g. ") AND(" or ")OR(".
static CONNECTIVE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\b(?:AND|OR)\b\s*").unwrap());

static COMPARISON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<c>[^=<>!]+)(?P<op><=|>=|!=|=|<|>)(?P<v>.*)$").unwrap());

static EXISTS_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<c>.+?)\s+exists\s*$").unwrap());

/// Parse a raw expression string. Blank input means "always visible"
/// and yields `None`.
///
/// OR detection runs before splitting and wins over AND when both
/// tokens appear; an expression mixing the two at top level is
/// unsupported input and keeps that historical behavior.
pub fn parse_enable_when(raw: &str) -> Option<EnableWhen> {
    if raw.trim().is_empty() {
        return None;
    }

    let logic = if OR_TOKEN.is_match(raw) {
        LogicOp::Or
    } else {
        LogicOp::And
    };

    let mut conditions = Vec::new();
    for fragment in CONNECTIVE_SPLIT.split(raw) {
        let mut fragment = fragment.trim();
        fragment = fragment.strip_prefix('(').unwrap_or(fragment);
        fragment = fragment.strip_suffix(')').unwrap_or(fragment);
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }

        conditions.push(parse_fragment(fragment));
    }

    if conditions.is_empty() {
        return None;
    }

    Some(EnableWhen { conditions, logic })
}

fn parse_fragment(fragment: &str) -> EnableWhenCondition {
    if let Some(caps) = COMPARISON.captures(fragment) {
        let value = caps["v"].trim();
        return EnableWhenCondition {
            characteristic: caps["c"].trim().to_string(),
            operator: caps["op"].to_string(),
            value: if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            },
        };
    }

    if let Some(caps) = EXISTS_SUFFIX.captures(fragment) {
        return EnableWhenCondition {
            characteristic: caps["c"].trim().to_string(),
            operator: "exists".to_string(),
            value: None,
        };
    }

    // Bare-token shorthand for "has been answered".
    EnableWhenCondition {
        characteristic: fragment.to_string(),
        operator: "exists".to_string(),
        value: None,
    }
}
