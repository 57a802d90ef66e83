//! gRPC request surface.
//!
//! Thin adapter between the generated `input.KeyInput` service and the
//! [`RelayService`] use case: decode the request, call the use case, map the
//! error onto a gRPC status.  No relay logic lives here.

use std::sync::Arc;

use hidlink_core::{CoordinateMode, Key, MouseAction};
use tonic::{Request, Response, Status};
use tracing::debug;

use crate::application::{CommandSink, RelayError, RelayService};

/// Generated protobuf and service types for the `input` package.
pub mod proto {
    tonic::include_proto!("input");
}

use proto::key_input_server::KeyInput;

/// gRPC-facing wrapper around the relay use case.
pub struct KeyInputService<S: CommandSink> {
    relay: Arc<RelayService<S>>,
}

impl<S: CommandSink> KeyInputService<S> {
    pub fn new(relay: Arc<RelayService<S>>) -> Self {
        Self { relay }
    }

    /// Wraps the service for mounting on a tonic server.
    pub fn into_server(self) -> proto::key_input_server::KeyInputServer<Self> {
        proto::key_input_server::KeyInputServer::new(self)
    }
}

#[tonic::async_trait]
impl<S: CommandSink> KeyInput for KeyInputService<S> {
    async fn init(
        &self,
        request: Request<proto::KeyInitRequest>,
    ) -> Result<Response<proto::KeyInitResponse>, Status> {
        let req = request.into_inner();
        let mode = self.relay.init(&req.seed).await.map_err(status_for)?;
        Ok(Response::new(proto::KeyInitResponse {
            mouse_coordinate: proto_coordinate(mode) as i32,
            protocol_version: u32::from(hidlink_core::PROTOCOL_VERSION),
        }))
    }

    async fn send(
        &self,
        request: Request<proto::KeyRequest>,
    ) -> Result<Response<proto::KeyResponse>, Status> {
        let req = request.into_inner();
        let key = core_key(req.key)?;
        debug!(?key, down_ms = req.down_ms, "key request");
        self.relay
            .send_key(key, req.down_ms)
            .await
            .map_err(status_for)?;
        Ok(Response::new(proto::KeyResponse {}))
    }

    async fn send_up(
        &self,
        request: Request<proto::KeyUpRequest>,
    ) -> Result<Response<proto::KeyUpResponse>, Status> {
        let key = core_key(request.into_inner().key)?;
        self.relay.send_key_up(key).await.map_err(status_for)?;
        Ok(Response::new(proto::KeyUpResponse {}))
    }

    async fn send_down(
        &self,
        request: Request<proto::KeyDownRequest>,
    ) -> Result<Response<proto::KeyDownResponse>, Status> {
        let key = core_key(request.into_inner().key)?;
        self.relay.send_key_down(key).await.map_err(status_for)?;
        Ok(Response::new(proto::KeyDownResponse {}))
    }

    async fn send_mouse(
        &self,
        request: Request<proto::MouseRequest>,
    ) -> Result<Response<proto::MouseResponse>, Status> {
        let req = request.into_inner();
        let action = core_action(req.action)?;
        self.relay
            .send_mouse(req.width, req.height, req.x, req.y, action)
            .await
            .map_err(status_for)?;
        Ok(Response::new(proto::MouseResponse {}))
    }
}

fn status_for(err: RelayError) -> Status {
    match err {
        RelayError::NotInitialized => Status::failed_precondition(err.to_string()),
        RelayError::Link(_) => Status::unavailable(err.to_string()),
    }
}

/// Decodes a wire enum value into the symbolic key.
///
/// The generated `input.Key` enum mirrors [`hidlink_core::keymap::ALL_KEYS`]
/// value-for-value, which makes the index lookup total once the value is
/// validated; `proto_key_values_mirror_the_symbolic_set` pins the pairing.
fn core_key(value: i32) -> Result<Key, Status> {
    let key = proto::Key::try_from(value)
        .map_err(|_| Status::invalid_argument(format!("unknown key value {value}")))?;
    Ok(hidlink_core::keymap::ALL_KEYS[key as usize])
}

fn core_action(value: i32) -> Result<MouseAction, Status> {
    let action = proto::MouseAction::try_from(value)
        .map_err(|_| Status::invalid_argument(format!("unknown mouse action {value}")))?;
    Ok(match action {
        proto::MouseAction::Move => MouseAction::Move,
        proto::MouseAction::Click => MouseAction::Click,
        proto::MouseAction::ScrollDown => MouseAction::ScrollDown,
    })
}

fn proto_coordinate(mode: CoordinateMode) -> proto::Coordinate {
    match mode {
        CoordinateMode::Screen => proto::Coordinate::Screen,
        CoordinateMode::Relative => proto::Coordinate::Relative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proto_key_values_mirror_the_symbolic_set() {
        for (index, expected) in hidlink_core::keymap::ALL_KEYS.iter().enumerate() {
            let value = index as i32;
            let proto_key = proto::Key::try_from(value).unwrap();
            assert_eq!(
                format!("{proto_key:?}"),
                format!("{expected:?}"),
                "value {value} names diverge"
            );
            assert_eq!(core_key(value).unwrap(), *expected);
        }
        assert!(core_key(70).is_err());
        assert!(core_key(-1).is_err());
    }

    #[test]
    fn mouse_action_values_map_one_to_one() {
        assert_eq!(core_action(0).unwrap(), MouseAction::Move);
        assert_eq!(core_action(1).unwrap(), MouseAction::Click);
        assert_eq!(core_action(2).unwrap(), MouseAction::ScrollDown);
        assert!(core_action(3).is_err());
    }

    #[test]
    fn coordinate_modes_map_one_to_one() {
        assert_eq!(
            proto_coordinate(CoordinateMode::Screen),
            proto::Coordinate::Screen
        );
        assert_eq!(
            proto_coordinate(CoordinateMode::Relative),
            proto::Coordinate::Relative
        );
    }
}
