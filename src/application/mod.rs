pub mod use_cases;

pub use use_cases::questionnaire_upload::QuestionnaireUploader;
pub use use_cases::share_link_service::ShareLinkService;
pub use use_cases::suggestion_service::SuggestionService;
