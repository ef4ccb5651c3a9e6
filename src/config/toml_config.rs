use crate::utils::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional TOML config file. Everything in it can also come from the
/// environment or CLI; the file exists for deployments that prefer keeping
/// URLs and tuning out of environment variables. API keys stay env-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub monitor: Option<MonitorSection>,
    pub request: Option<RequestSection>,
    pub mail: Option<MailSection>,
    pub classify: Option<ClassifySection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorSection {
    pub urls: Option<Vec<String>>,
    pub interval_minutes: Option<u64>,
    pub state_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestSection {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailSection {
    pub from_email: Option<String>,
    pub recipient_email: Option<String>,
    pub sender_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifySection {
    pub extra_negative_markers: Option<Vec<String>>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MonitorError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| MonitorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` placeholders with environment values.
    /// Unresolvable placeholders are left verbatim.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}
