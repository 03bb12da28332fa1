use crate::error::GenerationError;
use barista_types::MisspellResult;

/// Parses generated text as a [`MisspellResult`].
///
/// The text is untrusted. It must be a bare JSON object with exactly the four
/// expected string fields; fenced, wrapped, or partial output is rejected
/// rather than repaired.
pub fn parse_misspelling(text: &str) -> Result<MisspellResult, GenerationError> {
    serde_json::from_str(text.trim()).map_err(|e| GenerationError::InvalidShape(e.to_string()))
}
