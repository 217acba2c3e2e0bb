// ============================================================
// CHARACTERISTIC MAP BUILDER
// ============================================================
// Build the token -> defining-question lookup for one rendering
// context (a master or an instance). The pipe-joined characteristic
// and option columns are positionally aligned by the upload step; that
// alignment is trusted here, not re-validated.

use std::collections::HashMap;

use crate::domain::characteristic::CharacteristicSource;
use crate::domain::question::QuestionRecord;

pub type CharacteristicMap = HashMap<String, CharacteristicSource>;

fn split_pipe_list(raw: &str) -> Vec<String> {
    raw.split('|').map(|piece| piece.trim().to_string()).collect()
}

/// Build the lookup from every question visible in the context.
/// Duplicate tokens across questions are not expected but not rejected;
/// later questions overwrite earlier entries.
pub fn build_characteristic_map(questions: &[QuestionRecord]) -> CharacteristicMap {
    let mut map = CharacteristicMap::new();

    for question in questions {
        let Some(raw_tokens) = question.characteristic.as_deref() else {
            continue;
        };
        if raw_tokens.trim().is_empty() {
            continue;
        }

        let tokens = split_pipe_list(raw_tokens);
        let options: Vec<String> = question
            .answer_options
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(split_pipe_list)
            .unwrap_or_default();

        // A single token with no parsed options is scoped to the whole
        // question rather than to any option.
        if tokens.len() == 1 && options.is_empty() {
            map.insert(
                tokens[0].clone(),
                CharacteristicSource {
                    question_id: question.id,
                    question_text: question.question.clone(),
                    option_text: None,
                },
            );
            continue;
        }

        for (index, token) in tokens.iter().enumerate() {
            if token.is_empty() {
                continue;
            }
            map.insert(
                token.clone(),
                CharacteristicSource {
                    question_id: question.id,
                    question_text: question.question.clone(),
                    option_text: options.get(index).cloned(),
                },
            );
        }
    }

    map
}
