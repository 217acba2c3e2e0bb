// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Upload decoding, row parsing, grouping, and question building

mod csv_parser;
mod question_builder;
mod row_grouper;

pub use csv_parser::CsvParser;
pub use question_builder::{build_question, parse_bool};
pub use row_grouper::group_rows;
