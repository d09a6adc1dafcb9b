use chrono_tz::Tz;
use config::Environment;
use serde::Deserialize;

/// Discord rate limits channel renames hard, so the interval is never
/// allowed under this floor.
pub const MIN_INTERVAL_MINUTES: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0} in environment")]
    MissingVar(&'static str),
    #[error("invalid TIMEZONE {0:?}: not an IANA timezone name")]
    InvalidTimezone(String),
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStyle {
    Twelve,
    TwentyFour,
}

/// Environment snapshot before validation. Numeric-ish values stay strings
/// here because environment variables are strings and bad input falls back
/// to a default instead of failing.
#[derive(Debug, Deserialize)]
struct RawConfig {
    discord_token: Option<String>,
    channel_id: Option<String>,
    #[serde(default = "default_timezone")]
    timezone: String,
    #[serde(default = "default_prefix")]
    name_prefix: String,
    #[serde(default)]
    name_suffix: String,
    #[serde(default)]
    label: String,
    #[serde(default = "default_interval")]
    interval_minutes: String,
    #[serde(default = "default_clock_style")]
    clock_style: String,
}

fn default_timezone() -> String {
    "UTC".into()
}

fn default_prefix() -> String {
    "🕒".into()
}

fn default_interval() -> String {
    "5".into()
}

fn default_clock_style() -> String {
    "24".into()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub channel_id: String,
    pub timezone: Tz,
    pub name_prefix: String,
    pub name_suffix: String,
    pub label: String,
    pub interval_minutes: u32,
    pub clock_style: ClockStyle,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let raw: RawConfig = config::Config::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()?;

        raw.validate()
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        let token = self
            .discord_token
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?;

        let channel_id = self
            .channel_id
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::MissingVar("CHANNEL_ID"))?;

        // Malformed timezones fail here, at startup, so formatting stays
        // infallible per tick.
        let timezone: Tz = self
            .timezone
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))?;

        let clock_style = if self.clock_style.trim() == "12" {
            ClockStyle::Twelve
        } else {
            ClockStyle::TwentyFour
        };

        Ok(Config {
            token,
            channel_id,
            timezone,
            name_prefix: self.name_prefix,
            name_suffix: self.name_suffix,
            label: self.label,
            interval_minutes: effective_interval(&self.interval_minutes),
            clock_style,
        })
    }
}

/// Parses the configured interval, keeping it at or above
/// [`MIN_INTERVAL_MINUTES`]. Unparseable input falls back to the minimum.
pub fn effective_interval(raw: &str) -> u32 {
    raw.trim()
        .parse::<u32>()
        .map_or(MIN_INTERVAL_MINUTES, |n| n.max(MIN_INTERVAL_MINUTES))
}
