//! hidlink device daemon entry point.
//!
//! Wires together configuration, the serial link, the HID gadget backend,
//! and the dispatch loop:
//!
//! ```text
//! main()
//!  └─ DeviceConfig::load()       -- TOML config with defaults
//!  └─ serial::open()             -- tokio-serial byte stream
//!  └─ GadgetActuator::open()     -- /dev/hidg* report writers
//!  └─ Dispatcher::run()          -- read/decode/execute until EOF or ctrl-c
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hidlink_device::application::dispatch::{Dispatcher, DispatcherConfig};
use hidlink_device::infrastructure::config::DeviceConfig;
use hidlink_device::infrastructure::hid::gadget::GadgetActuator;
use hidlink_device::infrastructure::serial;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hidlink-device.toml".to_string());
    let config = DeviceConfig::load(Path::new(&config_path))?;

    // Initialise structured logging; RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    info!("hidlink device dispatcher starting");

    let stream = serial::open(&config.serial.path, config.serial.baud)
        .with_context(|| format!("opening serial link {}", config.serial.path))?;
    let actuator = GadgetActuator::open(&config.hid.keyboard_dev, &config.hid.mouse_dev)
        .context("opening HID gadget devices")?;

    let dispatcher = Dispatcher::new(
        stream,
        DispatcherConfig {
            arg_timeout: Duration::from_millis(config.dispatch.arg_timeout_ms),
        },
    );

    tokio::select! {
        result = dispatcher.run(&actuator) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    info!("hidlink device dispatcher stopped");
    Ok(())
}
