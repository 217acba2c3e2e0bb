// ============================================================
// DOMAIN LAYER
// ============================================================
// Core types for questionnaire upload and conditional visibility.
// No I/O, no async.

pub mod characteristic;
pub mod csv_row;
pub mod enable_when;
pub mod error;
pub mod question;
pub mod questionnaire;
pub mod suggestion;
