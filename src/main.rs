use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use stream_status::{
    AppState, config::Config, router::create_router, service::StreamStatusService,
    twitch::HelixClient,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// 监听地址，host 非法时退回双栈地址
fn listen_addr(config: &Config) -> SocketAddr {
    let ip = config.server_host.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid SERVER_HOST {:?}, listening on [::]", config.server_host);
        IpAddr::V6(Ipv6Addr::UNSPECIFIED)
    });
    SocketAddr::new(ip, config.server_port)
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = Config::from_env().expect("Failed to load configuration");

    // 共用一个带超时的 HTTP 客户端
    let client = HelixClient::new(&config).expect("Failed to build HTTP client");
    let service = StreamStatusService::new(Arc::new(client), &config);

    let addr = listen_addr(&config);
    let app = create_router(AppState {
        service: Arc::new(service),
        config,
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Server running at http://{}", addr);
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
