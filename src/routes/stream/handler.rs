use axum::{
    extract::{Json, Query, State, rejection::QueryRejection},
    response::IntoResponse,
};

use crate::{AppState, error::StreamError};

use super::model::{StreamQuery, StreamStatusResponse};

#[axum::debug_handler]
pub async fn get_stream_status(
    State(state): State<AppState>,
    query: Result<Query<StreamQuery>, QueryRejection>,
) -> Result<impl IntoResponse, StreamError> {
    // 查询串无法解析（如重复的 user）时按缺少 user 处理
    let user = match query {
        Ok(Query(query)) => query.user,
        Err(rejection) => {
            tracing::debug!("Rejected query string: {}", rejection);
            None
        }
    };
    let status = state.service.status(user.as_deref()).await?;
    Ok(Json(StreamStatusResponse::from(status)))
}
