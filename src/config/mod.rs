pub mod env;
pub mod toml_config;

use crate::adapters::fetch::DEFAULT_USER_AGENT;
use crate::adapters::mailjet::DEFAULT_SENDER_NAME;
use crate::config::env::{
    EnvConfig, DEFAULT_CONSULATE_URL, DEFAULT_INTERVAL_MINUTES, DEFAULT_STATE_FILE,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::config::toml_config::FileConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_email, validate_path, validate_positive_number, validate_url, Validate,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "slotwatch")]
#[command(about = "Read-only consulate appointment-slot monitor with Mailjet alerts")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file")]
    pub config: Option<String>,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated pages to check (overrides CONSULATE_URLS)"
    )]
    pub urls: Vec<String>,

    #[arg(long, help = "JSON state file path")]
    pub state_file: Option<String>,

    #[arg(long, help = "Watch-mode sweep interval in minutes")]
    pub interval_minutes: Option<u64>,

    #[arg(long, help = "Per-request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Keep running, sweeping on an interval with jitter")]
    pub watch: bool,

    #[arg(long, help = "Send a single test email and exit")]
    pub test: bool,

    #[arg(long, help = "One JSON log record per line, for hosted log collectors")]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Mailjet credentials and addresses; present only when complete.
#[derive(Debug, Clone, PartialEq)]
pub struct MailjetConfig {
    pub public_key: String,
    pub private_key: String,
    pub from_email: String,
    pub recipient_email: String,
}

/// Fully resolved settings for a run. Precedence, highest first:
/// CLI flags, environment variables, config file, built-in defaults.
/// API keys are env-only.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub urls: Vec<String>,
    pub state_file: String,
    pub interval_minutes: u64,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub sender_name: String,
    pub mailjet: Option<MailjetConfig>,
    pub extra_negative_markers: Vec<String>,
}

impl MonitorConfig {
    pub fn resolve(cli: &CliConfig, env: EnvConfig, file: FileConfig) -> Self {
        let monitor = file.monitor.unwrap_or_default();
        let request = file.request.unwrap_or_default();
        let mail = file.mail.unwrap_or_default();
        let classify = file.classify.unwrap_or_default();

        let urls = if !cli.urls.is_empty() {
            cli.urls.clone()
        } else {
            env.consulate_urls
                .or(monitor.urls)
                .unwrap_or_else(|| vec![DEFAULT_CONSULATE_URL.to_string()])
        };

        let from_email = env.from_email.or(mail.from_email);
        let recipient_email = env.recipient_email.or(mail.recipient_email);
        let mailjet = match (
            env.mj_apikey_public,
            env.mj_apikey_private,
            from_email,
            recipient_email,
        ) {
            (Some(public_key), Some(private_key), Some(from_email), Some(recipient_email)) => {
                Some(MailjetConfig {
                    public_key,
                    private_key,
                    from_email,
                    recipient_email,
                })
            }
            _ => None,
        };

        Self {
            urls,
            state_file: cli
                .state_file
                .clone()
                .or(env.state_file)
                .or(monitor.state_file)
                .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string()),
            interval_minutes: cli
                .interval_minutes
                .or(env.interval_minutes)
                .or(monitor.interval_minutes)
                .unwrap_or(DEFAULT_INTERVAL_MINUTES),
            timeout_seconds: cli
                .timeout_seconds
                .or(env.timeout_seconds)
                .or(request.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            user_agent: request
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            sender_name: mail
                .sender_name
                .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string()),
            mailjet,
            extra_negative_markers: classify.extra_negative_markers.unwrap_or_default(),
        }
    }
}

impl ConfigProvider for MonitorConfig {
    fn urls(&self) -> &[String] {
        &self.urls
    }

    fn extra_negative_markers(&self) -> &[String] {
        &self.extra_negative_markers
    }
}

impl Validate for MonitorConfig {
    fn validate(&self) -> Result<()> {
        if self.urls.iter().all(|url| url.trim().is_empty()) {
            return Err(crate::utils::error::MonitorError::MissingConfigError {
                field: "consulate_urls".to_string(),
            });
        }
        for url in self.urls.iter().filter(|url| !url.trim().is_empty()) {
            validate_url("consulate_urls", url.trim())?;
        }

        validate_path("state_file", &self.state_file)?;
        validate_positive_number("interval_minutes", self.interval_minutes, 1)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;

        if let Some(mailjet) = &self.mailjet {
            validate_email("from_email", &mailjet.from_email)?;
            validate_email("recipient_email", &mailjet.recipient_email)?;
        }

        Ok(())
    }
}
