//! Entry broadcaster for the network sink
//!
//! Streams recorded entries as JSON lines over UDP to a local monitor.
//! The logger hands entries over a bounded channel and a dedicated thread
//! owns the socket, so a log call never blocks: when the queue is full or
//! the thread is gone the entry is dropped.

use crate::constants::NETWORK_CHANNEL_CAPACITY;
use crate::entry::LogEntry;
use std::net::UdpSocket;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread;

/// Handle to the broadcaster thread. Dropping it closes the channel and
/// lets the thread drain and exit.
pub struct Broadcaster {
    tx: SyncSender<LogEntry>,
}

impl Broadcaster {
    /// Spawn a broadcaster sending to `target` (e.g. `127.0.0.1:9417`)
    pub fn spawn(target: impl Into<String>) -> Self {
        let (tx, rx) = sync_channel::<LogEntry>(NETWORK_CHANNEL_CAPACITY);
        let target = target.into();

        let _ = thread::Builder::new()
            .name("flowlog-broadcast".to_string())
            .spawn(move || run_broadcaster(rx, target));

        Self { tx }
    }

    /// Queue an entry for broadcast; never blocks
    pub fn send(&self, entry: LogEntry) {
        let _ = self.tx.try_send(entry);
    }
}

/// Run the broadcaster loop (blocking, runs in thread)
fn run_broadcaster(rx: Receiver<LogEntry>, target: String) {
    // Bind to any available port for sending
    let socket = match UdpSocket::bind("127.0.0.1:0") {
        Ok(s) => s,
        Err(_) => return,
    };

    // Process entries until the channel closes
    for entry in rx {
        if let Ok(json) = serde_json::to_string(&entry) {
            let msg = format!("{}\n", json);
            let _ = socket.send_to(msg.as_bytes(), &target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{LogLevel, Payload};
    use chrono::Utc;
    use serde_json::json;

    fn make_entry() -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Error,
            category: "Global Error".to_string(),
            message: "boom".to_string(),
            data: Some(Payload::Json(json!({"source": "app.rs:10"}))),
            component: None,
            route: "/board".to_string(),
            session_id: "session-7".to_string(),
        }
    }

    #[test]
    fn test_entry_wire_serialization() {
        let json = serde_json::to_string(&make_entry()).unwrap();

        assert!(json.contains("\"level\":\"ERROR\""));
        assert!(json.contains("\"category\":\"Global Error\""));
        assert!(json.contains("\"sessionId\":\"session-7\""));
    }

    #[test]
    fn test_wire_roundtrip() {
        let entry = make_entry();
        let json = serde_json::to_string(&entry).unwrap();

        let parsed: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_send_never_blocks_when_queue_full() {
        // No receiver thread is draining a dead target fast enough to
        // matter; pushing far past the channel capacity must not block.
        let broadcaster = Broadcaster::spawn("127.0.0.1:1");
        for _ in 0..(NETWORK_CHANNEL_CAPACITY * 4) {
            broadcaster.send(make_entry());
        }
    }
}
