use std::env;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub access_token: String,
    pub client_id: String,
    pub refresh_token: String,
    pub server_host: String,
    pub server_port: u16,
    pub token_refresh_url: String,
    pub twitch_api_url: String,
    pub cache_ttl_secs: u64,
    pub stale_retention_secs: u64,
    pub upstream_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // 可选项解析失败时使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Config {
            access_token: required("ACCESS_TOKEN")?,
            client_id: required("CLIENT_ID")?,
            refresh_token: required("REFRESH_TOKEN")?,
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("PORT", "3000").parse().unwrap_or(3000),
            token_refresh_url: optional(
                "TOKEN_REFRESH_URL",
                "https://twitchtokengenerator.com/api/refresh",
            )
            .trim_end_matches('/')
            .to_string(),
            twitch_api_url: optional("TWITCH_API_URL", "https://api.twitch.tv/helix")
                .trim_end_matches('/')
                .to_string(),
            cache_ttl_secs: optional("CACHE_TTL_SECS", "60").parse().unwrap_or(60),
            stale_retention_secs: optional("STALE_RETENTION_SECS", "600")
                .parse()
                .unwrap_or(600),
            upstream_timeout_secs: optional("UPSTREAM_TIMEOUT_SECS", "10")
                .parse()
                .unwrap_or(10),
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// 过期数据作为降级数据保留的时长
    pub fn stale_retention(&self) -> Duration {
        Duration::from_secs(self.stale_retention_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
