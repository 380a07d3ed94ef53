use crate::scraping::constants;
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// How the slot fan-out reacts to a failing date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOutPolicy {
    /// Every date is queried no matter what its siblings return
    #[default]
    Exhaustive,
    /// The first non-success status raises an advisory flag. Tasks that have
    /// not started yet skip their request, tasks already in flight finish.
    StopOnHttpError,
}

impl FromStr for FanOutPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exhaustive" => Ok(FanOutPolicy::Exhaustive),
            "stop-on-http-error" => Ok(FanOutPolicy::StopOnHttpError),
            other => bail!("unknown fan-out policy {:?}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingProfile {
    pub vaccine_data: String,
    pub group_size: u32,
    pub dose_number: u32,
    pub booking_url: String,
    pub time_zone: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub locations_url: Url,
    pub api_base: Url,
    pub profile: BookingProfile,
    pub user_agent: String,
    pub window_months: u32,
    pub output_dir: PathBuf,
    pub request_timeout: Option<Duration>,
    pub fan_out: FanOutPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            locations_url: Url::parse(constants::LOCATIONS_URL)
                .expect("default locations url is valid"),
            api_base: Url::parse(constants::API_BASE).expect("default api base is valid"),
            profile: BookingProfile {
                vaccine_data: constants::VACCINE_DATA.to_string(),
                group_size: constants::GROUP_SIZE,
                dose_number: constants::DOSE_NUMBER,
                booking_url: constants::BOOKING_URL.to_string(),
                time_zone: constants::TIME_ZONE.to_string(),
            },
            user_agent: constants::USER_AGENT.to_string(),
            window_months: constants::WINDOW_MONTHS,
            output_dir: PathBuf::from(constants::OUTPUT_DIR),
            request_timeout: Some(Duration::from_secs(constants::REQUEST_TIMEOUT_SECS)),
            fan_out: FanOutPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(raw) = lookup("VAX_LOCATIONS_URL") {
            config.locations_url =
                Url::parse(&raw).with_context(|| format!("VAX_LOCATIONS_URL={raw}"))?;
        }
        if let Some(raw) = lookup("VAX_API_BASE") {
            config.api_base = Url::parse(&raw).with_context(|| format!("VAX_API_BASE={raw}"))?;
            if config.api_base.cannot_be_a_base() {
                bail!("VAX_API_BASE={raw} cannot carry a path");
            }
        }
        if let Some(raw) = lookup("VAX_VACCINE_DATA") {
            config.profile.vaccine_data = raw;
        }
        if let Some(raw) = lookup("VAX_BOOKING_URL") {
            config.profile.booking_url = raw;
        }
        if let Some(raw) = lookup("VAX_TIME_ZONE") {
            config.profile.time_zone = raw;
        }
        if let Some(raw) = lookup("VAX_USER_AGENT") {
            config.user_agent = raw;
        }
        if let Some(raw) = lookup("VAX_WINDOW_MONTHS") {
            config.window_months = raw
                .trim()
                .parse()
                .with_context(|| format!("VAX_WINDOW_MONTHS={raw}"))?;
        }
        if let Some(raw) = lookup("VAX_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("VAX_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("VAX_REQUEST_TIMEOUT_SECS={raw}"))?;
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(raw) = lookup("VAX_FAN_OUT") {
            config.fan_out = raw.parse()?;
        }

        Ok(config)
    }
}
