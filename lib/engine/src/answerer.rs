use sheetqa_core::{AnswerExtractor, Error, Result, SpanAnswer};

/// Concatenate retrieved row-strings into one context, preserving retrieval
/// rank order
#[must_use]
pub fn build_context(retrieved: &[String]) -> String {
    retrieved.join(" ")
}

/// Run extractive QA over the retrieved rows
pub fn answer(
    extractor: &dyn AnswerExtractor,
    query: &str,
    retrieved: &[String],
) -> Result<SpanAnswer> {
    let context = build_context(retrieved);
    extractor
        .extract(query, &context)
        .map_err(|e| Error::Answer(format!("answer extraction failed: {e}")))
}
