//! Error types for chatlog.

use chrono::NaiveDate;
use thiserror::Error;

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    Reversed {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// A date could not be parsed.
    #[error("Invalid date '{0}' (expected YYYY-MM-DD or DD/MM/YYYY)")]
    Malformed(String),
}

/// Error for channel names that cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Empty channel name.
    #[error("Channel name is empty")]
    Empty,

    /// Channel name contains a character outside `[a-z0-9_]`.
    #[error("Invalid character {ch:?} in channel name '{name}'")]
    InvalidCharacter {
        /// The offending name.
        name: String,
        /// The first invalid character.
        ch: char,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DateRangeError::Malformed("x".to_string());
        assert_eq!(err.to_string(), "Invalid date 'x' (expected YYYY-MM-DD or DD/MM/YYYY)");

        let err = ChannelError::InvalidCharacter {
            name: "a-b".to_string(),
            ch: '-',
        };
        assert_eq!(err.to_string(), "Invalid character '-' in channel name 'a-b'");
    }
}
