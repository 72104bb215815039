use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

use super::client::TwitchApi;
use crate::error::RefreshError;
use crate::utils::mask_token;

#[derive(Debug)]
struct TokenState {
    access_token: String,
    refresh_token: String,
    client_id: String,
    // 每次刷新（无论成败）加一
    epoch: u64,
    last_error: Option<RefreshError>,
}

#[derive(Debug, Clone)]
pub struct TokenSnapshot {
    pub access_token: String,
    pub client_id: String,
    pub epoch: u64,
}

/// 刷新接口返回的令牌
#[derive(Debug, PartialEq, Eq)]
pub struct RefreshedTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct RefreshBody {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 解析刷新响应，兼容 token / access_token 字段
pub fn parse_refresh_body(body: &str) -> Result<RefreshedTokens, RefreshError> {
    let parsed: RefreshBody =
        serde_json::from_str(body).map_err(|e| RefreshError::Malformed(e.to_string()))?;

    let access_token = non_empty(parsed.token)
        .or_else(|| non_empty(parsed.access_token))
        .ok_or(RefreshError::MissingToken)?;
    let refresh_token = non_empty(parsed.refresh).or_else(|| non_empty(parsed.refresh_token));

    Ok(RefreshedTokens {
        access_token,
        refresh_token,
    })
}

/// 令牌管理
///
/// 刷新串行执行；遇到 401 时若 epoch 已变化，直接复用已完成的刷新结果
pub struct TokenManager {
    api: Arc<dyn TwitchApi>,
    state: RwLock<TokenState>,
    flight: Mutex<()>,
}

impl TokenManager {
    pub fn new(
        api: Arc<dyn TwitchApi>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            state: RwLock::new(TokenState {
                access_token: access_token.into(),
                refresh_token: refresh_token.into(),
                client_id: client_id.into(),
                epoch: 0,
                last_error: None,
            }),
            flight: Mutex::new(()),
        }
    }

    pub async fn current(&self) -> TokenSnapshot {
        let state = self.state.read().await;
        TokenSnapshot {
            access_token: state.access_token.clone(),
            client_id: state.client_id.clone(),
            epoch: state.epoch,
        }
    }

    pub async fn refresh_token(&self) -> String {
        self.state.read().await.refresh_token.clone()
    }

    pub async fn refresh(&self) -> Result<String, RefreshError> {
        let _flight = self.flight.lock().await;
        self.refresh_locked().await
    }

    /// 刷新 `seen_epoch` 时的令牌，其他任务已刷新则复用其结果
    pub async fn refresh_after(&self, seen_epoch: u64) -> Result<String, RefreshError> {
        let _flight = self.flight.lock().await;
        {
            let state = self.state.read().await;
            if state.epoch != seen_epoch {
                tracing::debug!(
                    "Token already refreshed (epoch {} -> {}), reusing result",
                    seen_epoch,
                    state.epoch
                );
                return match &state.last_error {
                    Some(err) => Err(err.clone()),
                    None => Ok(state.access_token.clone()),
                };
            }
        }
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<String, RefreshError> {
        let refresh_token = self.refresh_token().await;
        tracing::info!("Refreshing Twitch token ({})", mask_token(&refresh_token));

        let outcome = self.exchange(&refresh_token).await;

        let mut state = self.state.write().await;
        state.epoch += 1;
        match outcome {
            Ok(tokens) => {
                state.access_token = tokens.access_token;
                if let Some(rotated) = tokens.refresh_token {
                    tracing::info!("Updating refresh token ({})", mask_token(&rotated));
                    state.refresh_token = rotated;
                }
                state.last_error = None;
                tracing::info!("Token refreshed successfully");
                Ok(state.access_token.clone())
            }
            Err(err) => {
                tracing::error!("Failed to refresh token: {}", err);
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    async fn exchange(&self, refresh_token: &str) -> Result<RefreshedTokens, RefreshError> {
        let response = self.api.refresh_token(refresh_token).await?;
        if !response.status.is_success() {
            return Err(RefreshError::Status(response.status.as_u16()));
        }
        parse_refresh_body(&response.body)
    }
}
