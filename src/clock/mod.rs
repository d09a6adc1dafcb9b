use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::Config;
use crate::discord::ChannelApi;
use crate::error::DiscordError;
use crate::global::Global;
use crate::util::{initial_aligned_delay, sleep_until_aligned};

pub mod format;

/// Audit-log reason attached to every rename request.
const RENAME_REASON: &str = "Clock update";

/// Drives the channel clock forever: waits for the next interval boundary
/// (:00, :05, :10, ... for a 5 minute interval), performs one update there,
/// then one per interval.
///
/// Ticks are serialized: a slow remote call delays the next tick rather than
/// overlapping it. Alignment is re-derived from the wall clock after every
/// tick, so the cadence never drifts off the grid.
#[tracing::instrument(name = "Clock", skip_all)]
pub async fn run(global: Arc<Global>) -> anyhow::Result<()> {
    let interval = global.config.interval_minutes;

    let delay = initial_aligned_delay(Utc::now(), interval);
    tracing::info!(
        wait_secs = delay.as_secs(),
        "waiting for next aligned update"
    );
    tokio::time::sleep(delay).await;

    loop {
        update(&global.discord, &global.config).await;
        sleep_until_aligned(interval).await;
    }
}

/// One tick: fetch the channel, compute the candidate name, rename only on
/// change. Every remote failure is logged and swallowed here so the loop
/// and all future ticks stay unaffected.
pub async fn update(api: &impl ChannelApi, config: &Config) {
    update_at(api, config, Utc::now().with_timezone(&config.timezone)).await
}

async fn update_at(api: &impl ChannelApi, config: &Config, now: DateTime<Tz>) {
    let name = format::display_name(now, config);

    let channel = match api.fetch_channel(&config.channel_id).await {
        Ok(channel) => channel,
        Err(DiscordError::NotFound) => {
            tracing::warn!(channel_id = %config.channel_id, "channel not found");
            return;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch channel");
            return;
        }
    };

    if channel.name.as_deref() == Some(name.as_str()) {
        tracing::info!(name = %name, "no change, skipped rename");
        return;
    }

    match api
        .rename_channel(&config.channel_id, &name, RENAME_REASON)
        .await
    {
        Ok(()) => tracing::info!(name = %name, "renamed channel"),
        Err(e) => tracing::error!(error = %e, "failed to rename channel"),
    }
}
