use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub const MISSING_USER_MESSAGE: &str = "Missing ?user=<twitch_name>";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch Twitch data";

/// 网络层错误
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// 刷新令牌失败
#[derive(Debug, Clone, Error)]
pub enum RefreshError {
    #[error("token refresh request failed: {0}")]
    Request(#[from] TransportError),
    #[error("token refresh endpoint returned status {0}")]
    Status(u16),
    #[error("token refresh response was not valid JSON: {0}")]
    Malformed(String),
    #[error("token refresh response did not contain a token")]
    MissingToken,
}

/// 请求 Helix 接口失败
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("twitch request failed: {0}")]
    Request(#[from] TransportError),
    #[error("twitch returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("twitch still rejected the access token after a refresh")]
    Unauthorized,
    #[error("twitch response was not valid JSON: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("missing user query parameter")]
    MissingUser,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[derive(Serialize)]
struct BadRequestBody {
    error: &'static str,
}

#[derive(Serialize)]
struct ServerErrorBody {
    is_live: bool,
    error: &'static str,
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        match self {
            StreamError::MissingUser => (
                StatusCode::BAD_REQUEST,
                Json(BadRequestBody {
                    error: MISSING_USER_MESSAGE,
                }),
            )
                .into_response(),
            StreamError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerErrorBody {
                    is_live: false,
                    error: UPSTREAM_FAILURE_MESSAGE,
                }),
            )
                .into_response(),
        }
    }
}
