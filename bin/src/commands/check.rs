//! Check command implementation.

use anyhow::{Context, Result, bail};
use chatlog_lib::ChannelStatus;
use chatlog_lib::prelude::*;

/// Probe the log service for a channel and report what it says.
pub(crate) async fn check(channel: &str, base_url: String) -> Result<()> {
    let channel = Channel::new(channel).context("Invalid channel name")?;
    let client = LogClient::new(ClientConfig::default().with_base_url(base_url))
        .context("Failed to build HTTP client")?;

    match ChannelValidator::new(client).probe(&channel).await {
        ChannelStatus::Available => {
            println!("{channel}: logs available");
            Ok(())
        }
        status => bail!("{channel}: {status}"),
    }
}
