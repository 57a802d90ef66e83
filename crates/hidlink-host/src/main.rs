//! hidlink-host binary entry point.
//!
//! Wires configuration, the serial link, the relay use case, and the gRPC
//! server together, then serves until Ctrl-C.  On shutdown the relay sends
//! a best-effort release for every key so an interrupted session cannot
//! leave the device holding keys.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hidlink_host::application::RelayService;
use hidlink_host::infrastructure::config::HostConfig;
use hidlink_host::infrastructure::grpc::KeyInputService;
use hidlink_host::infrastructure::link::SerialLink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("hidlink-host.toml"));
    let config = HostConfig::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    // RUST_LOG, when set, wins over the config file's log level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    info!(
        serial = %config.serial.path,
        baud = config.serial.baud,
        listen = %config.grpc.listen,
        mode = ?config.relay.coordinate_mode,
        "hidlink-host starting"
    );

    let link = SerialLink::open(&config.serial.path, config.serial.baud)
        .with_context(|| format!("opening serial device {}", config.serial.path))?;
    let relay = Arc::new(RelayService::new(
        Arc::new(link),
        config.relay.to_relay_config(),
    ));

    let addr = config
        .grpc
        .listen
        .parse()
        .with_context(|| format!("invalid listen address {}", config.grpc.listen))?;
    let service = KeyInputService::new(Arc::clone(&relay)).into_server();

    tonic::transport::Server::builder()
        .add_service(service)
        .serve_with_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("gRPC server failed")?;

    // Leave the device with no keys held.
    relay.reset().await;
    info!("hidlink-host stopped");
    Ok(())
}
