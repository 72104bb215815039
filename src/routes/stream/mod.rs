mod handler;
mod model;

pub use handler::get_stream_status;
pub use model::{StreamQuery, StreamStatusResponse};
