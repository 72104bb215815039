use std::sync::Arc;

use serde_json::Value;
use tokio::time::Instant;

use crate::cache::{CachedStream, StreamCache};
use crate::config::Config;
use crate::error::StreamError;
use crate::twitch::{TokenManager, TwitchApi, fetch_stream};
use crate::utils::is_live;

pub const STALE_WARNING: &str = "Using cached data due to error";

/// 单次直播状态查询结果
#[derive(Debug, Clone)]
pub struct StreamStatus {
    pub cached: bool,
    pub is_live: bool,
    pub data: Arc<Value>,
    pub warning: Option<&'static str>,
}

impl StreamStatus {
    fn from_entry(entry: CachedStream, cached: bool, warning: Option<&'static str>) -> Self {
        Self {
            cached,
            is_live: is_live(&entry.payload),
            data: entry.payload,
            warning,
        }
    }
}

/// 持有令牌管理器与缓存，每个进程一个实例
pub struct StreamStatusService {
    api: Arc<dyn TwitchApi>,
    tokens: TokenManager,
    cache: StreamCache,
}

impl StreamStatusService {
    pub fn new(api: Arc<dyn TwitchApi>, config: &Config) -> Self {
        let tokens = TokenManager::new(
            api.clone(),
            config.access_token.clone(),
            config.refresh_token.clone(),
            config.client_id.clone(),
        );
        Self {
            api,
            tokens,
            cache: StreamCache::new(config.cache_ttl(), config.stale_retention()),
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn cache(&self) -> &StreamCache {
        &self.cache
    }

    /// 查询直播状态：新鲜缓存 -> Twitch -> 出错时降级使用过期缓存
    pub async fn status(&self, user: Option<&str>) -> Result<StreamStatus, StreamError> {
        let user = user
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(StreamError::MissingUser)?;
        let key = user.to_lowercase();

        // 清理超过保留窗口的缓存
        self.cache.sweep_expired(Instant::now()).await;

        if let Some(entry) = self.cache.get(&key).await {
            tracing::debug!("Cache hit for {}", key);
            return Ok(StreamStatus::from_entry(entry, true, None));
        }

        match fetch_stream(self.api.as_ref(), &self.tokens, &key).await {
            Ok(payload) => {
                let entry = self.cache.put(&key, payload).await;
                Ok(StreamStatus::from_entry(entry, false, None))
            }
            Err(err) => {
                tracing::error!("Failed to fetch Twitch data for {}: {}", key, err);
                match self.cache.get_stale(&key).await {
                    Some(entry) => {
                        tracing::warn!(
                            "Using cached data for {} aged {:?}",
                            key,
                            entry.age(Instant::now())
                        );
                        Ok(StreamStatus::from_entry(entry, true, Some(STALE_WARNING)))
                    }
                    None => Err(err.into()),
                }
            }
        }
    }
}
