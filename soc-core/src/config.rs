use std::time::Duration;

pub const API_BASE_URL_VAR: &str = "SOC_API_BASE_URL";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub toast_ttl: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            poll_interval: POLL_INTERVAL,
            toast_ttl: TOAST_TTL,
        }
    }
}

impl DashboardConfig {
    /// Browser builds have no process environment, so the base URL is
    /// captured when the bundle is compiled.
    pub fn from_build_env() -> Self {
        Self::with_base_url(option_env!("SOC_API_BASE_URL"))
    }

    pub fn from_env() -> Self {
        Self::with_base_url(std::env::var(API_BASE_URL_VAR).ok().as_deref())
    }

    pub fn with_base_url(value: Option<&str>) -> Self {
        let api_base_url = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string();
        Self {
            api_base_url,
            ..Self::default()
        }
    }
}
