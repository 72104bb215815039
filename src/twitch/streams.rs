use reqwest::StatusCode;
use serde_json::Value;

use super::client::TwitchApi;
use super::token::TokenManager;
use crate::error::UpstreamError;

// 每次查询最多刷新一次令牌
const MAX_REFRESH_RETRIES: usize = 1;

/// 查询直播数据，401 时刷新令牌并重试一次
pub async fn fetch_stream(
    api: &dyn TwitchApi,
    tokens: &TokenManager,
    user_login: &str,
) -> Result<Value, UpstreamError> {
    let mut retries = 0;
    loop {
        let token = tokens.current().await;
        let response = api
            .get_streams(user_login, &token.client_id, &token.access_token)
            .await?;

        if response.status == StatusCode::UNAUTHORIZED {
            if retries >= MAX_REFRESH_RETRIES {
                tracing::warn!("Refreshed token rejected for {}", user_login);
                return Err(UpstreamError::Unauthorized);
            }
            tracing::info!("Token expired, refreshing...");
            tokens.refresh_after(token.epoch).await?;
            retries += 1;
            continue;
        }

        if !response.status.is_success() {
            return Err(UpstreamError::Status {
                status: response.status.as_u16(),
                body: response.body,
            });
        }

        return serde_json::from_str(&response.body)
            .map_err(|e| UpstreamError::InvalidBody(e.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RefreshError;
    use crate::twitch::testing::ScriptedApi;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (Arc<ScriptedApi>, TokenManager) {
        let api = Arc::new(ScriptedApi::new());
        let tokens = TokenManager::new(api.clone(), "stale", "refresh-1", "client");
        (api, tokens)
    }

    #[tokio::test]
    async fn success_returns_payload_without_refresh() {
        let (api, tokens) = setup();
        api.push_stream_json(200, json!({ "data": [{ "id": "1" }] }));

        let payload = fetch_stream(api.as_ref(), &tokens, "shroud").await.unwrap();

        assert_eq!(payload, json!({ "data": [{ "id": "1" }] }));
        assert_eq!(api.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn unauthorized_refreshes_once_and_retries_with_new_token() {
        let (api, tokens) = setup();
        api.push_stream(401, "");
        api.push_stream_json(200, json!({ "data": [] }));
        api.push_refresh(200, r#"{"token":"fresh"}"#);

        let payload = fetch_stream(api.as_ref(), &tokens, "shroud").await.unwrap();

        assert_eq!(payload, json!({ "data": [] }));
        assert_eq!(api.refresh_calls(), 1);
        assert_eq!(api.stream_calls(), 2);
        assert_eq!(*api.seen_tokens.lock().unwrap(), vec!["stale", "fresh"]);
    }

    #[tokio::test]
    async fn persistent_unauthorized_is_not_retried_forever() {
        let (api, tokens) = setup();
        api.push_stream(401, "");
        api.push_stream(401, "");
        api.push_refresh(200, r#"{"token":"fresh"}"#);

        let err = fetch_stream(api.as_ref(), &tokens, "shroud")
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Unauthorized));
        assert_eq!(api.refresh_calls(), 1);
        assert_eq!(api.stream_calls(), 2);
    }

    #[tokio::test]
    async fn refresh_failure_surfaces_as_upstream_error() {
        let (api, tokens) = setup();
        api.push_stream(401, "");
        api.push_refresh(200, "not json");

        let err = fetch_stream(api.as_ref(), &tokens, "shroud")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UpstreamError::Refresh(RefreshError::Malformed(_))
        ));
        assert_eq!(api.stream_calls(), 1);
    }

    #[tokio::test]
    async fn other_status_carries_status_and_body() {
        let (api, tokens) = setup();
        api.push_stream(503, "service unavailable");

        let err = fetch_stream(api.as_ref(), &tokens, "shroud")
            .await
            .unwrap_err();

        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "service unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(api.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let (api, tokens) = setup();
        api.push_stream_failure("connection reset");

        let err = fetch_stream(api.as_ref(), &tokens, "shroud")
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Request(_)));
    }
}
