//! Log service URL construction.

use chatlog_types::Channel;

/// Base URL of the public log service.
pub const DEFAULT_BASE_URL: &str = "https://logs.ivr.fi";

/// Builds the URL for a channel's logs.
///
/// URL format: `{base}/channel/{channel}`. The day window is passed separately
/// as `from`/`to` query parameters.
///
/// # Example
///
/// ```
/// use chatlog_fetch::url::channel_url;
/// use chatlog_types::Channel;
///
/// let channel = Channel::new("Forsen").unwrap();
/// assert_eq!(
///     channel_url("https://logs.ivr.fi/", &channel),
///     "https://logs.ivr.fi/channel/forsen"
/// );
/// ```
#[must_use]
pub fn channel_url(base: &str, channel: &Channel) -> String {
    format!("{}/channel/{}", base.trim_end_matches('/'), channel)
}
