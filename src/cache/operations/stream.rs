use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::models::CachedStream;

/// 直播状态缓存
///
/// `ttl` 决定新鲜读取，`retention` 决定过期数据作为降级数据保留多久
#[derive(Debug)]
pub struct StreamCache {
    ttl: Duration,
    retention: Duration,
    entries: RwLock<HashMap<String, CachedStream>>,
}

impl StreamCache {
    pub fn new(ttl: Duration, retention: Duration) -> Self {
        Self {
            ttl,
            // 保留窗口不短于 ttl
            retention: retention.max(ttl),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// 获取未过期的缓存
    pub async fn get(&self, key: &str) -> Option<CachedStream> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .cloned()
    }

    /// 获取缓存，不检查 ttl（出错时降级使用）
    pub async fn get_stale(&self, key: &str) -> Option<CachedStream> {
        self.entries.read().await.get(key).cloned()
    }

    /// 写入缓存，整体替换旧条目
    pub async fn put(&self, key: &str, payload: Value) -> CachedStream {
        let entry = CachedStream::new(key, payload, Instant::now());
        self.entries
            .write()
            .await
            .insert(key.to_string(), entry.clone());
        entry
    }

    /// 清理超过保留窗口的条目，返回清理数量
    pub async fn sweep_expired(&self, now: Instant) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.age(now) <= self.retention);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!("Swept {} expired stream cache entries", removed);
        }
        removed
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
