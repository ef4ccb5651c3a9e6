use crate::utils::error::{MonitorError, Result};

pub const ENV_MJ_APIKEY_PUBLIC: &str = "MJ_APIKEY_PUBLIC";
pub const ENV_MJ_APIKEY_PRIVATE: &str = "MJ_APIKEY_PRIVATE";
pub const ENV_FROM_EMAIL: &str = "FROM_EMAIL";
pub const ENV_RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";
// Names the original deployment used; still honored as fallbacks.
pub const ENV_SENDER_EMAIL_ALIAS: &str = "MJ_SENDER_EMAIL";
pub const ENV_RECEIVER_EMAIL_ALIAS: &str = "MJ_RECEIVER_EMAIL";
pub const ENV_CONSULATE_URLS: &str = "CONSULATE_URLS";
pub const ENV_STATE_FILE: &str = "STATE_FILE";
pub const ENV_CHECK_INTERVAL_MINUTES: &str = "CHECK_INTERVAL_MINUTES";
pub const ENV_REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";

pub const DEFAULT_CONSULATE_URL: &str = "https://ais.usvisa-info.com/en-in/niv/appointments";
pub const DEFAULT_STATE_FILE: &str = "last_status.json";
pub const DEFAULT_INTERVAL_MINUTES: u64 = 30;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

/// Raw configuration read from the process environment. Every field is
/// optional here; defaults and precedence are applied when the layers are
/// merged into a `MonitorConfig`.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub mj_apikey_public: Option<String>,
    pub mj_apikey_private: Option<String>,
    pub from_email: Option<String>,
    pub recipient_email: Option<String>,
    pub consulate_urls: Option<Vec<String>>,
    pub state_file: Option<String>,
    pub interval_minutes: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary lookup so tests do not have to mutate the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let parse_u64 = |name: &str| -> Result<Option<u64>> {
            match get(name) {
                Some(raw) => match raw.trim().parse::<u64>() {
                    Ok(value) => Ok(Some(value)),
                    Err(_) => Err(MonitorError::InvalidConfigValueError {
                        field: name.to_string(),
                        value: raw,
                        reason: "Expected a whole number".to_string(),
                    }),
                },
                None => Ok(None),
            }
        };

        let consulate_urls = get(ENV_CONSULATE_URLS)
            .map(|raw| {
                raw.split(',')
                    .map(|url| url.trim().to_string())
                    .filter(|url| !url.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|urls| !urls.is_empty());

        Ok(Self {
            mj_apikey_public: get(ENV_MJ_APIKEY_PUBLIC),
            mj_apikey_private: get(ENV_MJ_APIKEY_PRIVATE),
            from_email: get(ENV_FROM_EMAIL).or_else(|| get(ENV_SENDER_EMAIL_ALIAS)),
            recipient_email: get(ENV_RECIPIENT_EMAIL).or_else(|| get(ENV_RECEIVER_EMAIL_ALIAS)),
            consulate_urls,
            state_file: get(ENV_STATE_FILE),
            interval_minutes: parse_u64(ENV_CHECK_INTERVAL_MINUTES)?,
            timeout_seconds: parse_u64(ENV_REQUEST_TIMEOUT)?,
        })
    }
}
