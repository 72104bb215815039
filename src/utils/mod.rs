use serde_json::Value;

// data 数组非空即为直播中，缺失或非数组视为未开播
pub fn is_live(payload: &Value) -> bool {
    payload
        .get("data")
        .and_then(Value::as_array)
        .is_some_and(|streams| !streams.is_empty())
}

/// 日志中隐藏令牌，只保留末四位
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("****{}", tail)
}
