//! Errors reported while building or decoding a problem.
//!
//! The search itself cannot fail: once a [`Problem`](crate::Problem) exists,
//! solving it produces zero or more solutions. Every error in this crate is
//! therefore an input validation error. Column and row identifiers are
//! rendered with their [`Debug`] representation.

use thiserror::Error;

/// Errors raised when the columns, targets, rows or amounts of a problem
/// violate the input contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// A column identifier occurs more than once in the universe.
    #[error("column {0} appears more than once in the universe")]
    DuplicateColumn(String),

    /// A target or a row refers to a column outside the universe.
    #[error("column {0} is not in the universe")]
    UnknownColumn(String),

    /// A row identifier was added twice.
    #[error("row {0} is already in the problem")]
    DuplicateRow(String),

    /// A row covers no columns.
    #[error("row {0} must cover at least one column")]
    EmptyRow(String),

    /// A column was given a target of zero.
    #[error("column {0} must have a positive target")]
    ZeroTarget(String),

    /// A row contributes nothing to one of its columns.
    #[error("row {row} must contribute a positive amount to column {column}")]
    ZeroAmount {
        /// The offending row.
        row: String,
        /// The column it covers.
        column: String,
    },

    /// The amounts a row contributes to a column do not fit in a `u32`.
    #[error("amount of row {row} in column {column} overflows")]
    AmountOverflow {
        /// The offending row.
        row: String,
        /// The column it covers.
        column: String,
    },
}

/// Errors raised when decoding a shared problem.
#[cfg(feature = "codec")]
#[derive(Debug, Error)]
pub enum CodecError {
    /// The payload is not URL-safe base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload does not describe a problem.
    #[error("invalid problem encoding: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload describes a problem that fails validation.
    #[error(transparent)]
    Problem(#[from] ProblemError),
}

/// Formats an identifier for an error message.
pub(crate) fn describe<T: std::fmt::Debug>(id: &T) -> String {
    format!("{id:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_identifiers() {
        let err = ProblemError::UnknownColumn(describe(&'z'));
        assert_eq!(err.to_string(), "column 'z' is not in the universe");

        let err = ProblemError::ZeroAmount {
            row: describe(&"E"),
            column: describe(&3),
        };
        assert_eq!(
            err.to_string(),
            "row \"E\" must contribute a positive amount to column 3"
        );
    }

    #[cfg(feature = "codec")]
    #[test]
    fn codec_errors_wrap_validation_errors_transparently() {
        let err = CodecError::from(ProblemError::ZeroTarget(describe(&1)));
        assert_eq!(err.to_string(), "column 1 must have a positive target");
    }
}
