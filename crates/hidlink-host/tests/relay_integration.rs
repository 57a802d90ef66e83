//! End-to-end host tests: relay use case driving a real `SerialLink` over an
//! in-memory pipe, asserted at the byte level — exactly what a device would
//! read off the wire.

use std::sync::Arc;
use std::time::Duration;

use hidlink_core::{Command, CoordinateMode, Key, MouseAction};
use hidlink_host::application::{RelayConfig, RelayService};
use hidlink_host::infrastructure::link::SerialLink;
use tokio::io::{AsyncReadExt, DuplexStream};

fn relay_over_pipe(
    config: RelayConfig,
) -> (RelayService<SerialLink<DuplexStream>>, DuplexStream) {
    let (tx, rx) = tokio::io::duplex(4096);
    let link = SerialLink::from_writer(tx);
    (RelayService::new(Arc::new(link), config), rx)
}

fn relative_config() -> RelayConfig {
    RelayConfig {
        coordinate_mode: CoordinateMode::Relative,
        click_settle: Duration::from_millis(80),
        scroll_delta: 1000,
    }
}

async fn read_bytes(rx: &mut DuplexStream, n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    rx.read_exact(&mut buf).await.unwrap();
    buf
}

#[tokio::test]
async fn key_pulse_reaches_the_wire_as_one_frame() {
    let (relay, mut rx) = relay_over_pipe(relative_config());
    relay.init(&[]).await.unwrap();
    relay.send_key(Key::Enter, 0.0).await.unwrap();
    assert_eq!(read_bytes(&mut rx, 2).await, vec![0x00, 0xE0]);
}

#[tokio::test]
async fn requests_before_init_write_zero_bytes() {
    let (relay, mut rx) = relay_over_pipe(relative_config());
    assert!(relay.send_key(Key::A, 0.0).await.is_err());
    assert!(relay
        .send_mouse(0, 0, 1, 1, MouseAction::Click)
        .await
        .is_err());

    relay.init(&[]).await.unwrap();
    relay.send_key(Key::A, 0.0).await.unwrap();
    // The first bytes on the wire are the post-init pulse; nothing leaked
    // before it.
    assert_eq!(read_bytes(&mut rx, 2).await, vec![0x00, b'a']);
}

#[tokio::test(start_paused = true)]
async fn timed_key_releases_even_when_the_caller_gives_up() {
    let (relay, mut rx) = relay_over_pipe(relative_config());
    let relay = Arc::new(relay);
    relay.init(&[]).await.unwrap();

    // The caller aborts shortly after the request is accepted.
    let caller = {
        let relay = Arc::clone(&relay);
        tokio::spawn(async move {
            relay.send_key(Key::Space, 50.0).await.unwrap();
            tokio::time::sleep(Duration::from_secs(3600)).await;
        })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    caller.abort();

    assert_eq!(read_bytes(&mut rx, 2).await, vec![0x01, b' ']);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(
        read_bytes(&mut rx, 2).await,
        vec![0x02, b' '],
        "release must fire despite the aborted caller"
    );
}

#[tokio::test(start_paused = true)]
async fn click_request_produces_move_then_click() {
    let (relay, mut rx) = relay_over_pipe(relative_config());
    relay.init(&[]).await.unwrap();
    relay
        .send_mouse(0, 0, 300, -200, MouseAction::Click)
        .await
        .unwrap();

    assert_eq!(
        read_bytes(&mut rx, 6).await,
        vec![0x03, 0x2C, 0x01, 0x38, 0xFF, 0x04]
    );
}

#[tokio::test(start_paused = true)]
async fn scroll_request_carries_the_configured_delta() {
    let (relay, mut rx) = relay_over_pipe(RelayConfig {
        scroll_delta: 1000,
        ..relative_config()
    });
    relay.init(&[]).await.unwrap();
    relay
        .send_mouse(0, 0, 0, 0, MouseAction::ScrollDown)
        .await
        .unwrap();

    let bytes = read_bytes(&mut rx, 8).await;
    assert_eq!(&bytes[..5], &[0x03, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(bytes[5], 0x05);
    assert_eq!(i16::from_le_bytes([bytes[6], bytes[7]]), 1000);
}

#[tokio::test]
async fn screen_mode_session_walks_the_pointer() {
    let (relay, mut rx) = relay_over_pipe(RelayConfig {
        coordinate_mode: CoordinateMode::Screen,
        ..relative_config()
    });
    assert_eq!(relay.init(&[]).await.unwrap(), CoordinateMode::Screen);

    relay
        .send_mouse(1920, 1080, 1000, 500, MouseAction::Move)
        .await
        .unwrap();
    relay
        .send_mouse(1920, 1080, 1000, 500, MouseAction::Move)
        .await
        .unwrap();

    // First move is relative to the centre seed, second is a no-op delta.
    let bytes = read_bytes(&mut rx, 10).await;
    assert_eq!(
        bytes,
        [
            Command::MouseMove { dx: 40, dy: -40 }.encode(),
            Command::MouseMove { dx: 0, dy: 0 }.encode(),
        ]
        .concat()
    );
}

#[tokio::test]
async fn concurrent_pulses_arrive_as_whole_frames() {
    let (relay, mut rx) = relay_over_pipe(relative_config());
    let relay = Arc::new(relay);
    relay.init(&[]).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let relay = Arc::clone(&relay);
        tasks.push(tokio::spawn(async move {
            relay
                .send_mouse(0, 0, 300, -200, MouseAction::Move)
                .await
                .unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let bytes = read_bytes(&mut rx, 16 * 5).await;
    let expected = Command::MouseMove { dx: 300, dy: -200 }.encode();
    for frame in bytes.chunks(5) {
        assert_eq!(frame, expected.as_slice());
    }
}
