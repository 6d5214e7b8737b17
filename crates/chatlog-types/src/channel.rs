//! Channel names.

use serde::{Deserialize, Serialize};

use crate::ChannelError;

/// A channel name as used by the log service.
///
/// Names are trimmed and lower-cased on construction and may only contain
/// ASCII alphanumerics and underscores, since they end up in both a URL path
/// segment and a local filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Channel(String);

impl Channel {
    /// Creates a channel from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains characters other
    /// than ASCII alphanumerics and `_`.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ChannelError> {
        let name = name.as_ref().trim().to_lowercase();
        if name.is_empty() {
            return Err(ChannelError::Empty);
        }
        if let Some(ch) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(ChannelError::InvalidCharacter { name, ch });
        }
        Ok(Self(name))
    }

    /// Returns the channel name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Channel {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Channel {
    type Error = ChannelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        channel.0
    }
}

impl AsRef<str> for Channel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_normalizes_case_and_whitespace() {
        let channel = Channel::new("  Forsen ").unwrap();
        assert_eq!(channel.as_str(), "forsen");
        assert_eq!(channel.to_string(), "forsen");
    }

    #[test]
    fn test_channel_allows_underscores_and_digits() {
        assert!(Channel::new("x_qc_123").is_ok());
    }

    #[test]
    fn test_channel_empty() {
        assert_eq!(Channel::new("   "), Err(ChannelError::Empty));
    }

    #[test]
    fn test_channel_rejects_path_characters() {
        let err = Channel::new("../etc").unwrap_err();
        assert!(matches!(err, ChannelError::InvalidCharacter { ch: '.', .. }));
        assert!(Channel::new("foo bar").is_err());
        assert!(Channel::new("foo/bar").is_err());
    }

    #[test]
    fn test_channel_serde_validates() {
        let channel: Channel = serde_json::from_str("\"Foo\"").unwrap();
        assert_eq!(channel.as_str(), "foo");
        assert!(serde_json::from_str::<Channel>("\"a-b\"").is_err());
    }
}
