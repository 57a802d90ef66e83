//! Use cases for the host relay.

pub mod relay;

pub use relay::{CommandSink, RelayConfig, RelayError, RelayService};
