//! Entry receiver for monitoring a running app
//!
//! Binds the broadcast target port and decodes the JSON line stream back
//! into `LogEntry` values. Used by dev monitors and integration tests.

use crate::constants::NETWORK_CHANNEL_CAPACITY;
use crate::entry::LogEntry;
use crate::error::{LogError, Result};
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::Arc;
use std::time::Duration;

/// Spawn a UDP entry receiver listening on `addr`
pub fn spawn_receiver(shutdown: Arc<AtomicBool>, addr: &str) -> Result<Receiver<LogEntry>> {
    let (tx, rx) = sync_channel::<LogEntry>(NETWORK_CHANNEL_CAPACITY);

    // Bind up-front so callers can handle port-in-use cleanly
    let socket = UdpSocket::bind(addr).map_err(|e| LogError::SocketBind {
        addr: addr.to_string(),
        source: e,
    })?;
    socket
        .set_read_timeout(Some(Duration::from_millis(100)))
        .ok();

    std::thread::spawn(move || {
        run_receiver(socket, tx, shutdown);
    });

    Ok(rx)
}

/// Run the receiver loop (blocking, runs in thread)
fn run_receiver(socket: UdpSocket, tx: SyncSender<LogEntry>, shutdown: Arc<AtomicBool>) {
    let mut buf = [0u8; 65535];

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match socket.recv_from(&mut buf) {
            Ok((len, _addr)) => {
                if let Ok(text) = std::str::from_utf8(&buf[..len]) {
                    // A packet may carry multiple JSON lines
                    for line in text.lines() {
                        if let Ok(entry) = serde_json::from_str::<LogEntry>(line) {
                            let _ = tx.try_send(entry);
                        }
                    }
                }
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                // Timeout - check shutdown and continue
                continue;
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => {
                continue;
            }
            Err(_) => {
                // Socket error - exit
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LogLevel;

    #[test]
    fn test_entry_line_deserialization() {
        let json = r#"{"timestamp":"2026-08-06T12:34:56.789Z","level":"INFO","category":"Navigation","message":"Route changed: / -> /board","route":"/board","sessionId":"session-3"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.category, "Navigation");
        assert_eq!(entry.route, "/board");
        assert_eq!(entry.session_id, "session-3");
        assert_eq!(entry.data, None);
    }

    #[test]
    fn test_bind_failure_is_reported() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let err = spawn_receiver(shutdown, "definitely-not-an-addr").unwrap_err();
        assert!(err.to_string().contains("Cannot bind receiver socket"));
    }
}
