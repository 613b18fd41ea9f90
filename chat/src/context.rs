//! Renders retrieved records into the grounding block appended to the query.
//!
//! The block always exists, even with no matches, because the system prompt
//! tells the model to read it. Records appear in retrieval rank order.

use rmp_retrieval::RetrievedRecord;

/// First line of the context block.
pub const CONTEXT_HEADER: &str = "Returned results from vector db (done automatically):";

/// Body of the context block when the index returned nothing.
pub const NO_MATCHES: &str = "No matching professors were found.";

/// Metadata attribute holding the course subject.
pub const SUBJECT_FIELD: &str = "subject";

/// Metadata attribute holding the star rating.
pub const STARS_FIELD: &str = "stars";

/// Alternate name for the star rating used by some ingested records.
pub const RATING_FIELD: &str = "rating";

/// Metadata attribute holding the review text.
pub const REVIEW_FIELD: &str = "review";

const MISSING_REVIEW: &str = "No review available";
const MISSING_VALUE: &str = "Unknown";

/// Format `records` as a deterministic text block.
pub fn format_context(records: &[RetrievedRecord]) -> String {
    let body = if records.is_empty() {
        NO_MATCHES.to_string()
    } else {
        records
            .iter()
            .map(format_record)
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    format!("\n\n{CONTEXT_HEADER}\n\n{body}\n")
}

fn format_record(record: &RetrievedRecord) -> String {
    let review = record
        .field_text(REVIEW_FIELD)
        .unwrap_or_else(|| MISSING_REVIEW.to_string());
    let subject = record
        .field_text(SUBJECT_FIELD)
        .unwrap_or_else(|| MISSING_VALUE.to_string());
    let stars = record
        .field_text(STARS_FIELD)
        .or_else(|| record.field_text(RATING_FIELD))
        .unwrap_or_else(|| MISSING_VALUE.to_string());

    let mut block = format!(
        "Professor: {}\nReview: {review}\nSubject: {subject}\nStars: {stars}",
        record.id
    );

    // Remaining attributes follow in key order.
    let mut extra: Vec<&String> = record
        .metadata
        .keys()
        .filter(|key| {
            ![REVIEW_FIELD, SUBJECT_FIELD, STARS_FIELD, RATING_FIELD].contains(&key.as_str())
        })
        .collect();
    extra.sort();
    for key in extra {
        if let Some(text) = record.field_text(key) {
            block.push_str(&format!("\n{key}: {text}"));
        }
    }

    block
}
