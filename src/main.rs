use global::Global;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod clock;
mod config;
mod discord;
mod error;
mod global;
mod util;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    tracing::info!("starting channel clock");

    let global = Global::init(config).await?;

    tokio::select! {
        r = clock::run(global.clone()) => {
            if let Err(e) = r {
                tracing::error!("clock error: {:#}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }

    Ok(())
}
