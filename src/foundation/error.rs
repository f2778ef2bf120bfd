/// Convenience result type used across tgspack.
pub type TgsResult<T> = Result<T, TgsError>;

/// Reasons an input could not be turned into an [`crate::AnimationDocument`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input is not well-formed JSON (or a corrupt gzip stream, or not a JSON object).
    #[error("malformed syntax: {0}")]
    MalformedSyntax(String),

    /// A required top-level field is absent.
    #[error("missing required field `{0}`")]
    MissingRequiredField(String),

    /// A field is present but has the wrong type or breaks a document invariant.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        /// JSON path of the offending field, e.g. `layers[2].ks`.
        field: String,
        /// Human-readable reason.
        reason: String,
    },
}

impl ParseError {
    /// Build a [`ParseError::MalformedSyntax`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSyntax(msg.into())
    }

    /// Build a [`ParseError::MissingRequiredField`] value.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequiredField(field.into())
    }

    /// Build a [`ParseError::InvalidField`] value.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A transformation produced a document that breaks a model invariant.
///
/// This is a programming error, not an input error: valid input must never trigger it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("`{stage}` broke an invariant at {path}: {message}")]
pub struct InvariantViolation {
    /// Strategy or transformation that produced the document.
    pub stage: String,
    /// JSON path of the offending node.
    pub path: String,
    /// What went wrong.
    pub message: String,
}

/// Top-level error taxonomy used by tgspack APIs.
///
/// Missing the byte budget is not an error; it is reported through
/// [`crate::CompressionReport::met_budget`].
#[derive(thiserror::Error, Debug)]
pub enum TgsError {
    /// The input could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A transformation broke a document invariant.
    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    /// Invalid options or strategy table.
    #[error("config error: {0}")]
    Config(String),

    /// Errors from the compression stream or file access.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TgsError {
    /// Build a [`TgsError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`TgsError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Return the parse error when this is an input problem.
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
