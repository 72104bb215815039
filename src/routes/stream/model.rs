use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::service::StreamStatus;

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StreamStatusResponse {
    pub cached: bool,
    pub is_live: bool,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

impl From<StreamStatus> for StreamStatusResponse {
    fn from(status: StreamStatus) -> Self {
        Self {
            cached: status.cached,
            is_live: status.is_live,
            data: status.data.as_ref().clone(),
            warning: status.warning,
        }
    }
}
