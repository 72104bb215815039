/// 缓存数据模型
pub mod stream;

pub use stream::*;
