// ============================================================
// CSV PARSER
// ============================================================
// Decode uploaded bytes and parse them into typed questionnaire rows.

use csv::{ReaderBuilder, Trim};
use encoding_rs::WINDOWS_1252;

use crate::domain::csv_row::PreOpCsvRow;
use crate::domain::error::{AppError, Result};

/// Parser for the flat questionnaire CSV format.
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Decode uploaded bytes and parse. UTF-8 first; legacy exports fall
    /// back to Windows-1252.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<PreOpCsvRow>> {
        let content = Self::decode(bytes);
        self.parse_content(&content)
    }

    /// Parse CSV content from string.
    pub fn parse_content(&self, content: &str) -> Result<Vec<PreOpCsvRow>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for (index, result) in reader.deserialize::<PreOpCsvRow>().enumerate() {
            let row = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(row);
        }

        Ok(rows)
    }

    /// Decode raw upload bytes to text.
    pub fn decode(bytes: &[u8]) -> String {
        if let Ok(content) = std::str::from_utf8(bytes) {
            return content.to_string();
        }
        let (content, _, _) = WINDOWS_1252.decode(bytes);
        content.into_owned()
    }
}
