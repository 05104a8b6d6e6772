use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::credential::ProjectBinding;
use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_BASE_URL: &str = "FLOWCRAFT_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "FLOWCRAFT_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "FLOWCRAFT_PAGE_SIZE";
pub const ENV_DEBOUNCE_MS: &str = "FLOWCRAFT_DEBOUNCE_MS";
pub const ENV_PROJECT_ID: &str = "FLOWCRAFT_PROJECT_ID";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Settings for talking to the workflow backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub page_size: u32,
    pub debounce: Duration,
    /// Identity attached verbatim to credential submissions.
    pub project: ProjectBinding,
}

pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                base_url: base_url.into(),
                timeout: DEFAULT_TIMEOUT,
                page_size: DEFAULT_PAGE_SIZE,
                debounce: DEFAULT_DEBOUNCE,
                project: ProjectBinding::default(),
            },
        }
    }
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size.max(1);
        self
    }
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.config.debounce = debounce;
        self
    }
    pub fn with_project(mut self, project: ProjectBinding) -> Self {
        self.config.project = project;
        self
    }
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl ClientConfig {
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// Reads the configuration from `FLOWCRAFT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_BASE_URL))?;

        let mut builder = Self::builder(base_url);
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_TIMEOUT_SECS)? {
            builder = builder.with_timeout(Duration::from_secs(secs));
        }
        if let Some(size) = parse_var::<u32>(&lookup, ENV_PAGE_SIZE)? {
            builder = builder.with_page_size(size);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_DEBOUNCE_MS)? {
            builder = builder.with_debounce(Duration::from_millis(ms));
        }
        if let Some(project_id) = lookup(ENV_PROJECT_ID) {
            builder = builder.with_project(ProjectBinding {
                project_id: Some(project_id),
                ..ProjectBinding::default()
            });
        }
        Ok(builder.build())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { var, value }),
    }
}
