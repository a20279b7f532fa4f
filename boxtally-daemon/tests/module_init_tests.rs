//! Module initialization + lifecycle integration tests.
//!
//! Drives the scan pipeline module through its full Plugin lifecycle
//! the way the orchestrator does, without blocking on signals.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

use boxtally_core::config::BoxtallyConfig;
use boxtally_core::plugin::{Plugin, PluginState};
use boxtally_daemon::modules::scan_pipeline;

async fn ephemeral_addr() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[tokio::test]
async fn pipeline_module_full_lifecycle() {
    let addr = ephemeral_addr().await;
    let mut config = BoxtallyConfig::default();
    config.scan_pipeline.tcp_bind = addr.to_string();
    config.scan_pipeline.batch_size = 1;
    config.scan_pipeline.debounce_ms = 0;

    let (mut pipeline, mut channels) = scan_pipeline::init(&config).unwrap().unwrap();

    pipeline.init().await.unwrap();
    pipeline.start().await.unwrap();
    assert_eq!(pipeline.state(), PluginState::Running);

    tokio::time::sleep(Duration::from_millis(50)).await;

    // 실제 TCP 클라이언트로 스캔 주입
    let mut client = TcpStream::connect(addr).await.unwrap();
    client
        .write_all(b"LRNO=DOCK-7;PkgsNo=1;BoxNo=1;\n")
        .await
        .unwrap();
    client.flush().await.unwrap();

    let scan = tokio::time::timeout(Duration::from_secs(3), channels.scan_rx.recv())
        .await
        .expect("scan event should arrive")
        .unwrap();
    assert_eq!(scan.record.shipment_id, "DOCK-7");

    // PkgsNo=1이므로 첫 스캔에 바로 완료 이벤트 발생
    let completion = tokio::time::timeout(Duration::from_secs(3), channels.completion_rx.recv())
        .await
        .expect("completion event should arrive")
        .unwrap();
    assert_eq!(completion.shipment_id, "DOCK-7");

    pipeline.stop().await.unwrap();
    assert_eq!(pipeline.state(), PluginState::Stopped);
}

#[tokio::test]
async fn disabled_module_is_skipped() {
    let mut config = BoxtallyConfig::default();
    config.scan_pipeline.enabled = false;
    assert!(scan_pipeline::init(&config).unwrap().is_none());
}
