// ============================================================
// QUESTIONNAIRE UPLOAD
// ============================================================
// Turn an uploaded CSV into validated questions. Parsing is lenient
// (the file is externally authored); the batch checks here are strict:
// any structural violation fails the whole upload with a row-indexed
// message and nothing is persisted.

use std::str::FromStr;

use crate::domain::error::{AppError, Result};
use crate::domain::question::{ItemType, ParsedQuestion};
use crate::infrastructure::csv::{build_question, group_rows, CsvParser};

use super::enable_when_parser::parse_enable_when;

pub struct QuestionnaireUploader {
    max_questions: usize,
}

impl QuestionnaireUploader {
    pub fn new(max_questions: usize) -> Self {
        Self { max_questions }
    }

    /// Parse, group, build, and batch-validate an uploaded CSV.
    pub fn parse(&self, bytes: &[u8]) -> Result<Vec<ParsedQuestion>> {
        let rows = CsvParser::new().parse_bytes(bytes)?;
        let groups = group_rows(&rows);

        let mut questions = Vec::with_capacity(groups.len());
        for (id, group) in &groups {
            let mut question = build_question(id, group)?;
            question.enable_when = question
                .enable_when_raw
                .as_deref()
                .and_then(parse_enable_when);
            questions.push(question);
        }

        self.validate(&questions)?;
        Ok(questions)
    }

    fn validate(&self, questions: &[ParsedQuestion]) -> Result<()> {
        if questions.is_empty() {
            return Err(AppError::ValidationError(
                "Upload contains no questions".to_string(),
            ));
        }
        if questions.len() > self.max_questions {
            return Err(AppError::ValidationError(format!(
                "Upload contains {} questions, maximum allowed is {}",
                questions.len(),
                self.max_questions
            )));
        }

        for (index, question) in questions.iter().enumerate() {
            let number = index + 1;

            let item_type = ItemType::from_str(&question.item_type).map_err(|_| {
                AppError::ValidationError(format!(
                    "Question {} ({}): item type \"{}\" is not supported",
                    number, question.id, question.item_type
                ))
            })?;

            if item_type.requires_options() && question.options.len() < 2 {
                return Err(AppError::ValidationError(format!(
                    "Question {} ({}): {} questions need at least 2 options, found {}",
                    number,
                    question.id,
                    item_type.as_str(),
                    question.options.len()
                )));
            }

            if !item_type.requires_options()
                && question.options.iter().any(|o| o.characteristic.is_some())
            {
                return Err(AppError::ValidationError(format!(
                    "Question {} ({}): {} questions cannot carry option-level characteristics",
                    number,
                    question.id,
                    item_type.as_str()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enable_when::LogicOp;

    const VALID_CSV: &str = "\
Id,Section,Page,ItemType,Question,Option,Characteristic,Required,EnableWhen,HasHelper,HelperType,HelperName,HelperValue
q1,General,1,radio,Do you smoke?,Yes,smoker,TRUE,,FALSE,,,
q1,General,1,radio,Do you smoke?,No,non-smoker,TRUE,,FALSE,,,
q2,General,1,text,What do you smoke?,,,FALSE,(smoker=true),FALSE,,,
q3,Alcohol,2,number,Units per week?,,alcohol-units,FALSE,,FALSE,,,";

    fn uploader() -> QuestionnaireUploader {
        QuestionnaireUploader::new(500)
    }

    #[test]
    fn test_valid_upload_parses_and_links_conditions() {
        let questions = uploader().parse(VALID_CSV.as_bytes()).unwrap();

        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].options.len(), 2);

        let conditional = &questions[1];
        let enable_when = conditional.enable_when.as_ref().unwrap();
        assert_eq!(enable_when.logic, LogicOp::And);
        assert_eq!(enable_when.conditions[0].characteristic, "smoker");

        assert_eq!(questions[2].characteristic.as_deref(), Some("alcohol-units"));
    }

    #[test]
    fn test_unknown_item_type_fails_whole_batch() {
        let csv = "\
Id,Section,Page,ItemType,Question,Option,Characteristic,Required
q1,General,1,slider,Pain level?,,,FALSE";

        let err = uploader().parse(csv.as_bytes()).unwrap_err();
        let AppError::ValidationError(message) = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("Question 1 (q1)"));
        assert!(message.contains("slider"));
    }

    #[test]
    fn test_radio_needs_two_options() {
        let csv = "\
Id,Section,Page,ItemType,Question,Option,Characteristic,Required
q1,General,1,radio,Do you smoke?,Yes,smoker,TRUE";

        let err = uploader().parse(csv.as_bytes()).unwrap_err();
        let AppError::ValidationError(message) = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("at least 2 options"));
    }

    #[test]
    fn test_option_characteristics_rejected_on_non_option_types() {
        let csv = "\
Id,Section,Page,ItemType,Question,Option,Characteristic,Required
q1,General,1,dropdown,Pick one,A,token-a,FALSE
q1,General,1,dropdown,Pick one,B,token-b,FALSE";

        let err = uploader().parse(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_question_cap_enforced() {
        let mut csv = String::from("Id,Section,Page,ItemType,Question,Option,Characteristic,Required\n");
        for n in 0..3 {
            csv.push_str(&format!("q{},General,1,text,Question {}?,,,FALSE\n", n, n));
        }

        let err = QuestionnaireUploader::new(2)
            .parse(csv.as_bytes())
            .unwrap_err();
        let AppError::ValidationError(message) = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("maximum allowed is 2"));
    }

    #[test]
    fn test_empty_upload_rejected() {
        let csv = "Id,Section,Page,ItemType,Question,Option,Characteristic,Required\n";
        let err = uploader().parse(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_filler_rows_do_not_block_valid_upload() {
        let csv = "\
Id,Section,Page,ItemType,Question,Option,Characteristic,Required
,,,,,,,
q1,General,1,text,Your name?,,,FALSE";

        let questions = uploader().parse(csv.as_bytes()).unwrap();
        assert_eq!(questions.len(), 1);
    }
}
