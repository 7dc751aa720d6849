//! Engine error types
//!
//! Every fallible engine call returns [`ShuffleResult`]. Fixed-position
//! problems in the order engine are not fatal: they travel as warnings
//! inside the outcome, using the same enum so callers can report them
//! uniformly.

use thiserror::Error;

/// Result type alias for engine operations
pub type ShuffleResult<T> = Result<T, ShuffleError>;

/// Errors and warnings produced by the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShuffleError {
    /// The roster has no members
    #[error("roster is empty")]
    EmptyRoster,

    /// Role assignment was requested without any roles
    #[error("no roles were given")]
    EmptyRoles,

    /// A fixed order line was malformed or its position is out of range
    #[error("invalid fixed position line: {line}")]
    InvalidFixedPosition { line: String },

    /// A fixed order line names someone who is not (or no longer) available
    #[error("fixed name not in roster: {position}: {name}")]
    UnknownFixedName { position: usize, name: String },

    /// A persisted snapshot could not be decoded
    #[error("snapshot parse error: {message}")]
    ParseError { message: String },
}

impl ShuffleError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create an invalid fixed position error
    pub fn invalid_fixed_position(line: impl Into<String>) -> Self {
        Self::InvalidFixedPosition { line: line.into() }
    }

    /// Create an unknown fixed name error
    pub fn unknown_fixed_name(position: usize, name: impl Into<String>) -> Self {
        Self::UnknownFixedName {
            position,
            name: name.into(),
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyRoster => "EMPTY_ROSTER",
            Self::EmptyRoles => "EMPTY_ROLES",
            Self::InvalidFixedPosition { .. } => "INVALID_FIXED_POSITION",
            Self::UnknownFixedName { .. } => "UNKNOWN_FIXED_NAME",
            Self::ParseError { .. } => "PARSE_ERROR",
        }
    }

    /// Whether the engine reports this as a warning and carries on
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::InvalidFixedPosition { .. } | Self::UnknownFixedName { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ShuffleError::EmptyRoster.code(), "EMPTY_ROSTER");
        assert_eq!(ShuffleError::EmptyRoles.code(), "EMPTY_ROLES");
        assert_eq!(
            ShuffleError::invalid_fixed_position("x").code(),
            "INVALID_FIXED_POSITION"
        );
        assert_eq!(
            ShuffleError::unknown_fixed_name(2, "Zed").code(),
            "UNKNOWN_FIXED_NAME"
        );
        assert_eq!(ShuffleError::parse("bad").code(), "PARSE_ERROR");
    }

    #[test]
    fn test_warning_classification() {
        assert!(ShuffleError::invalid_fixed_position("9: A").is_warning());
        assert!(ShuffleError::unknown_fixed_name(1, "Q").is_warning());
        assert!(!ShuffleError::EmptyRoster.is_warning());
        assert!(!ShuffleError::EmptyRoles.is_warning());
        assert!(!ShuffleError::parse("x").is_warning());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ShuffleError::unknown_fixed_name(2, "Zed").to_string(),
            "fixed name not in roster: 2: Zed"
        );
        assert_eq!(
            ShuffleError::parse("eof").to_string(),
            "snapshot parse error: eof"
        );
    }
}
