use std::sync::Arc;

use anyhow::Context as _;

use crate::config::Config;
use crate::discord::DiscordClient;

pub struct Global {
    pub config: Config,
    pub discord: DiscordClient,
}

impl Global {
    pub async fn init(config: Config) -> anyhow::Result<Arc<Self>> {
        let discord = DiscordClient::new(&config.token).context("building discord client")?;

        let user = discord
            .connect()
            .await
            .context("validating discord token")?;

        tracing::info!(
            tag = %user.tag(),
            timezone = config.timezone.name(),
            interval_minutes = config.interval_minutes,
            "logged in"
        );

        Ok(Arc::new(Self { config, discord }))
    }
}
