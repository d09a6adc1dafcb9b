use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::DiscordError;

const API_BASE: &str = "https://discord.com/api/v10";

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    /// Absent on channel kinds that have no name (e.g. DMs).
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
}

impl CurrentUser {
    /// Human-readable bot tag. Accounts migrated off discriminators report
    /// "0" and are shown by username alone.
    pub fn tag(&self) -> String {
        if self.discriminator.is_empty() || self.discriminator == "0" {
            self.username.clone()
        } else {
            format!("{}#{}", self.username, self.discriminator)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Seam between the clock loop and Discord, so ticks can be exercised
/// against a fake in tests.
#[async_trait]
pub trait ChannelApi: Send + Sync {
    async fn fetch_channel(&self, id: &str) -> Result<Channel, DiscordError>;
    async fn rename_channel(&self, id: &str, name: &str, reason: &str)
        -> Result<(), DiscordError>;
}

pub struct DiscordClient {
    http: reqwest::Client,
    token: String,
}

impl DiscordClient {
    pub fn new(token: &str) -> Result<Self, DiscordError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("channel-clock/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            token: format!("Bot {token}"),
        })
    }

    /// Validates the token against the gateway identity endpoint and returns
    /// the bot's own user.
    pub async fn connect(&self) -> Result<CurrentUser, DiscordError> {
        let resp = self
            .http
            .get(format!("{API_BASE}/users/@me"))
            .header("Authorization", &self.token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }

        Ok(resp.json().await?)
    }
}

async fn api_error(resp: reqwest::Response) -> DiscordError {
    let status = resp.status();
    let body: ApiErrorBody = resp.json().await.unwrap_or_default();

    if status == StatusCode::NOT_FOUND {
        return DiscordError::NotFound;
    }

    DiscordError::Api {
        status,
        message: body.message,
    }
}

#[async_trait]
impl ChannelApi for DiscordClient {
    async fn fetch_channel(&self, id: &str) -> Result<Channel, DiscordError> {
        let resp = self
            .http
            .get(format!("{API_BASE}/channels/{id}"))
            .header("Authorization", &self.token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }

        Ok(resp.json().await?)
    }

    async fn rename_channel(
        &self,
        id: &str,
        name: &str,
        reason: &str,
    ) -> Result<(), DiscordError> {
        let resp = self
            .http
            .patch(format!("{API_BASE}/channels/{id}"))
            .header("Authorization", &self.token)
            .header("X-Audit-Log-Reason", reason)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_includes_discriminator_when_present() {
        let user = CurrentUser {
            id: "1".into(),
            username: "clock".into(),
            discriminator: "1234".into(),
        };
        assert_eq!(user.tag(), "clock#1234");
    }

    #[test]
    fn tag_drops_migrated_discriminator() {
        let user = CurrentUser {
            id: "1".into(),
            username: "clock".into(),
            discriminator: "0".into(),
        };
        assert_eq!(user.tag(), "clock");
    }

    #[test]
    fn channel_name_may_be_absent() {
        let channel: Channel = serde_json::from_str(r#"{"id":"42"}"#).unwrap();
        assert_eq!(channel.name, None);
    }
}
