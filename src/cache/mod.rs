// 缓存模块
// 以小写用户名为键的内存缓存，按 ttl 过期

pub mod models;
pub mod operations;

pub use models::CachedStream;
pub use operations::StreamCache;
