use thiserror::Error;

/// Errors surfaced by rule validation and snapshot loading.
///
/// Routing itself never returns these: a rule whose pattern fails to compile
/// is turned into a [`crate::Diagnostic`] and skipped.
#[derive(Error, Debug)]
pub enum Error {
    /// Pattern is empty after trimming.
    #[error("rule {rule_id} has an empty pattern")]
    EmptyPattern { rule_id: String },

    /// Regex (or wildcard-derived regex) failed to compile.
    #[error("rule {rule_id} has a malformed pattern `{pattern}`: {source}")]
    MalformedPattern {
        rule_id: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
