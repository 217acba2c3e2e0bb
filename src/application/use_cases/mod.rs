pub mod characteristic_map;
pub mod condition_translator;
pub mod enable_when_parser;
pub mod questionnaire_upload;
pub mod share_link_service;
pub mod suggestion_service;
