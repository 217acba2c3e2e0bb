// ============================================================
// QUESTION BUILDER
// ============================================================
// Convert one row-group into a structured question. Scalar fields are
// trusted from the first row of the group; options accumulate from
// every row carrying an Option value.

use tracing::warn;

use crate::domain::csv_row::PreOpCsvRow;
use crate::domain::error::{AppError, Result};
use crate::domain::question::{ParsedQuestion, QuestionOption};

/// The literal token TRUE (any case, trimmed) is true; everything else,
/// including empty, is false.
pub fn parse_bool(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("TRUE")
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Build one question from a non-empty row-group. Calling this with an
/// empty group is a caller-contract violation, not a data-quality issue.
pub fn build_question(id: &str, rows: &[PreOpCsvRow]) -> Result<ParsedQuestion> {
    let first = rows.first().ok_or_else(|| {
        AppError::Internal(format!("Question builder called with empty row-group: {}", id))
    })?;

    warn_on_scalar_mismatch(id, first, rows);

    let mut options = Vec::new();
    for row in rows {
        let Some(value) = non_blank(&row.option) else {
            continue;
        };
        options.push(QuestionOption {
            value,
            characteristic: non_blank(&row.characteristic),
        });
    }

    // Option-less questions may carry a single characteristic at the
    // question level instead.
    let characteristic = if options.is_empty() {
        non_blank(&first.characteristic)
    } else {
        None
    };

    let has_helper = parse_bool(&first.has_helper);
    let helper = |raw: &str| if has_helper { non_blank(raw) } else { None };

    Ok(ParsedQuestion {
        id: id.to_string(),
        section: first.section.trim().to_string(),
        page: first.page.trim().to_string(),
        item_type: first.item_type.trim().to_lowercase(),
        question: first.question.trim().to_string(),
        options,
        characteristic,
        required: parse_bool(&first.required),
        enable_when: None,
        enable_when_raw: non_blank(&first.enable_when),
        has_helper,
        helper_type: helper(&first.helper_type),
        helper_name: helper(&first.helper_name),
        helper_value: helper(&first.helper_value),
    })
}

/// First row wins for scalar fields; later rows are expected to agree.
/// Disagreement gets flagged but never rejects the question.
fn warn_on_scalar_mismatch(id: &str, first: &PreOpCsvRow, rows: &[PreOpCsvRow]) {
    for (offset, row) in rows.iter().enumerate().skip(1) {
        let mismatched: Vec<&str> = [
            ("Section", row.section.trim() != first.section.trim()),
            ("Page", row.page.trim() != first.page.trim()),
            (
                "ItemType",
                !row.item_type.trim().eq_ignore_ascii_case(first.item_type.trim()),
            ),
            ("Question", row.question.trim() != first.question.trim()),
            ("Required", row.required.trim() != first.required.trim()),
        ]
        .iter()
        .filter(|(_, differs)| *differs)
        .map(|(name, _)| *name)
        .collect();

        if !mismatched.is_empty() {
            warn!(
                question_id = id,
                row_offset = offset,
                fields = mismatched.join(", "),
                "Row disagrees with first row of its group; first row wins"
            );
        }
    }
}
