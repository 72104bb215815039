use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::Config;
use crate::error::TransportError;

/// 外部请求的原始状态码与响应体
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Twitch 外部接口
#[async_trait]
pub trait TwitchApi: Send + Sync {
    async fn get_streams(
        &self,
        user_login: &str,
        client_id: &str,
        access_token: &str,
    ) -> Result<RawResponse, TransportError>;

    // 用 refresh token 换取新的 access token
    async fn refresh_token(&self, refresh_token: &str) -> Result<RawResponse, TransportError>;
}

pub struct HelixClient {
    http: Client,
    api_url: String,
    refresh_url: String,
}

impl HelixClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.upstream_timeout())
            .build()?;

        Ok(Self {
            http,
            api_url: config.twitch_api_url.clone(),
            refresh_url: config.token_refresh_url.clone(),
        })
    }

    async fn into_raw(response: reqwest::Response) -> Result<RawResponse, TransportError> {
        let status = response.status();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl TwitchApi for HelixClient {
    async fn get_streams(
        &self,
        user_login: &str,
        client_id: &str,
        access_token: &str,
    ) -> Result<RawResponse, TransportError> {
        let response = self
            .http
            .get(format!("{}/streams", self.api_url))
            .query(&[("user_login", user_login)])
            .header("Client-ID", client_id)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::into_raw(response).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RawResponse, TransportError> {
        let response = self
            .http
            .get(format!("{}/{}", self.refresh_url, refresh_token))
            .send()
            .await?;

        Self::into_raw(response).await
    }
}
