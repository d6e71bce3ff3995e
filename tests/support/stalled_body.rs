//! Raw HTTP responder whose body stops after a short prefix and never ends.

#![allow(dead_code)]

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::socket_guard::should_skip_socket_bound_test;

/// Body bytes sent before the connection stalls.
pub const STALLED_PREFIX: &[u8] = b"<html>partial";

/// Answers every request with `200 OK`, a `Content-Length` far beyond what
/// is sent, and [`STALLED_PREFIX`] as the only body bytes.
///
/// Returns the server URI (`http://127.0.0.1:<port>`), or `None` when
/// localhost sockets are unavailable.
pub async fn start_stalled_body_server_or_skip() -> Option<String> {
    if should_skip_socket_bound_test() {
        return None;
    }
    let listener = TcpListener::bind("127.0.0.1:0").await.ok()?;
    let addr = listener.local_addr().ok()?;

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let head = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 100000\r\n\r\n";
                if socket.write_all(head.as_bytes()).await.is_err()
                    || socket.write_all(STALLED_PREFIX).await.is_err()
                    || socket.flush().await.is_err()
                {
                    return;
                }
                tokio::time::sleep(Duration::from_secs(60)).await;
            });
        }
    });

    Some(format!("http://{addr}"))
}
