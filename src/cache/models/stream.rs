use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

/// 直播状态缓存条目
// payload 只读共享，更新时整体替换
#[derive(Debug, Clone)]
pub struct CachedStream {
    pub key: String,
    pub payload: Arc<Value>,
    pub fetched_at: Instant,
}

impl CachedStream {
    pub fn new(key: impl Into<String>, payload: Value, fetched_at: Instant) -> Self {
        Self {
            key: key.into(),
            payload: Arc::new(payload),
            fetched_at,
        }
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.fetched_at)
    }

    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}
