// Twitch 模块
// Helix 客户端、令牌管理与直播查询

pub mod client;
pub mod streams;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{HelixClient, RawResponse, TwitchApi};
pub use streams::fetch_stream;
pub use token::{TokenManager, TokenSnapshot};
