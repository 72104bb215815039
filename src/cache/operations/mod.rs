/// Cache operations
pub mod stream;

pub use stream::*;
