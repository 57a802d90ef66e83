//! Infrastructure layer: the serial link, the gRPC surface, and the host
//! configuration file.

pub mod config;
pub mod grpc;
pub mod link;
