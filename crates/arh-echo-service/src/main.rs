// ----- standard library imports
use std::str::FromStr;
// ----- extra library imports
use tokio::signal;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, prelude::*};
// ----- end imports

#[derive(Debug, serde::Deserialize)]
struct MainConfig {
    bind_address: std::net::SocketAddr,
    log_level: String,
}

#[tokio::main]
async fn main() {
    let settings = config::Config::builder()
        .set_default("bind_address", "127.0.0.1:3338")
        .expect("bind_address default")
        .set_default("log_level", "info")
        .expect("log_level default")
        .add_source(config::File::with_name("echo.toml").required(false))
        .add_source(config::Environment::with_prefix("ECHO"))
        .build()
        .expect("Failed to build echo config");

    let maincfg: MainConfig = settings
        .try_deserialize()
        .expect("Failed to parse echo config");

    tracing_log::LogTracer::init().expect("LogTracer init");
    let level_filter = LevelFilter::from_str(&maincfg.log_level).expect("log level");
    let stdout_log = tracing_subscriber::fmt::layer().with_filter(level_filter);
    let subscriber = tracing_subscriber::registry().with(stdout_log);
    tracing::subscriber::set_global_default(subscriber)
        .expect("tracing::subscriber::set_global_default");

    let router = arh_echo_service::routes();

    let listener = tokio::net::TcpListener::bind(&maincfg.bind_address)
        .await
        .expect("Failed to bind to address");

    info!(
        "Echo Service running at http://{} with config: {:?}",
        &maincfg.bind_address, &maincfg
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
