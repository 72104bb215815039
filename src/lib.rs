use std::sync::Arc;

use config::Config;
use service::StreamStatusService;

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod service;
pub mod twitch;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub service: Arc<StreamStatusService>,
}
