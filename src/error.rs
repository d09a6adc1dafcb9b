/// Errors surfaced by the Discord client. During a scheduled tick every
/// variant is logged and swallowed; the loop itself never sees them.
#[derive(Debug, thiserror::Error)]
pub enum DiscordError {
    #[error("channel not found")]
    NotFound,
    #[error("discord api error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}
