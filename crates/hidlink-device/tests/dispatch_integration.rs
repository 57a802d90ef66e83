//! Integration test: the dispatch loop fed from an in-memory stream.
//!
//! Drives the dispatcher exactly as the serial port would — bytes arriving
//! in bursts with idle gaps in between — and asserts the ordered physical
//! actuations observed by the mock backend.

use std::time::Duration;

use tokio::io::AsyncWriteExt;

use hidlink_core::Command;
use hidlink_device::application::dispatch::{Dispatcher, DispatcherConfig};
use hidlink_device::infrastructure::hid::mock::{MockActuator, MockEvent};

#[tokio::test]
async fn timed_key_hold_actuates_down_then_up() {
    let (mut tx, rx) = tokio::io::duplex(64);
    let dispatcher = Dispatcher::new(rx, DispatcherConfig::default());
    let run = tokio::spawn(async move {
        let hid = MockActuator::new();
        dispatcher.run(&hid).await.unwrap();
        hid.events()
    });

    // The host's timed-press composition: DOWN, a host-side wait, UP.
    tx.write_all(&Command::KeyDown { key: b'a' }.encode())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    tx.write_all(&Command::KeyUp { key: b'a' }.encode())
        .await
        .unwrap();
    drop(tx);

    assert_eq!(
        run.await.unwrap(),
        vec![MockEvent::KeyDown(b'a'), MockEvent::KeyUp(b'a')]
    );
}

#[tokio::test]
async fn move_then_click_sequence_survives_a_split_frame() {
    let (mut tx, rx) = tokio::io::duplex(64);
    let dispatcher = Dispatcher::new(rx, DispatcherConfig::default());
    let run = tokio::spawn(async move {
        let hid = MockActuator::new();
        dispatcher.run(&hid).await.unwrap();
        hid.events()
    });

    // The MouseMove frame arrives split across two writes; the bounded
    // argument wait must span the gap, not discard the frame.
    let move_frame = Command::MouseMove { dx: 64, dy: -32 }.encode();
    tx.write_all(&move_frame[..3]).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    tx.write_all(&move_frame[3..]).await.unwrap();
    tx.write_all(&Command::MouseClick.encode()).await.unwrap();
    drop(tx);

    assert_eq!(
        run.await.unwrap(),
        vec![MockEvent::MoveStep(64, -32), MockEvent::Click]
    );
}

#[tokio::test]
async fn garbage_between_frames_only_costs_the_garbage_bytes() {
    let (mut tx, rx) = tokio::io::duplex(64);
    let dispatcher = Dispatcher::new(rx, DispatcherConfig::default());
    let run = tokio::spawn(async move {
        let hid = MockActuator::new();
        dispatcher.run(&hid).await.unwrap();
        hid.events()
    });

    let mut bytes = Vec::new();
    Command::KeyPulse { key: b'x' }.encode_into(&mut bytes);
    bytes.extend_from_slice(&[0xAA, 0xBB]); // not opcodes
    Command::MouseScroll { delta: 1000 }.encode_into(&mut bytes);
    tx.write_all(&bytes).await.unwrap();
    drop(tx);

    assert_eq!(
        run.await.unwrap(),
        vec![MockEvent::KeyPress(b'x'), MockEvent::Scroll(1000)]
    );
}
