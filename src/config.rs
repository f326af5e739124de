//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Default local user id used by the demo thread.
pub const DEFAULT_LOCAL_USER_ID: &str = "680f50e4f10f3cd28382ecf9";

/// Delays used to simulate network latency in the onboarding flow.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Pause between a successful login and the redirect home.
    pub login_redirect_delay: Duration,
    /// Time taken to "generate" a bio suggestion.
    pub suggestion_delay: Duration,
    /// Pause between saving the bio and showing the login form.
    pub bio_finish_delay: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            login_redirect_delay: Duration::from_millis(500),
            suggestion_delay: Duration::from_millis(1200),
            bio_finish_delay: Duration::from_millis(1200),
        }
    }
}

impl FlowConfig {
    /// Load delays from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            login_redirect_delay: delay_from_env(
                "CHAT_LOGIN_REDIRECT_MS",
                defaults.login_redirect_delay,
            ),
            suggestion_delay: delay_from_env("CHAT_SUGGESTION_DELAY_MS", defaults.suggestion_delay),
            bio_finish_delay: delay_from_env("CHAT_BIO_FINISH_DELAY_MS", defaults.bio_finish_delay),
        }
    }

    /// Zero-length delays; timers still go through the delay collaborator.
    pub fn immediate() -> Self {
        Self {
            login_redirect_delay: Duration::ZERO,
            suggestion_delay: Duration::ZERO,
            bio_finish_delay: Duration::ZERO,
        }
    }
}

/// Settings for the message thread view.
#[derive(Debug, Clone)]
pub struct ThreadConfig {
    /// Id of the signed-in user; their messages render on the right.
    pub local_user_id: String,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            local_user_id: DEFAULT_LOCAL_USER_ID.to_string(),
        }
    }
}

impl ThreadConfig {
    pub fn from_env() -> Self {
        let local_user_id = std::env::var("CHAT_LOCAL_USER_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCAL_USER_ID.to_string());
        Self { local_user_id }
    }
}

fn delay_from_env(key: &str, default: Duration) -> Duration {
    match std::env::var(key) {
        Ok(raw) => parse_millis(key, &raw).unwrap_or_else(|e| {
            tracing::warn!(
                key,
                error = %e,
                default_ms = default.as_millis() as u64,
                "Invalid delay, using default"
            );
            default
        }),
        Err(_) => default,
    }
}

/// Parse a millisecond count such as `"1200"`.
pub fn parse_millis(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?} is not a millisecond count ({e})"),
        })
}
