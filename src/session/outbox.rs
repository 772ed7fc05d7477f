use serde_json::Value;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::UnboundedSender;

/// Where a session's outbound frames go: a websocket pump for humans, a
/// bounded queue for robots. Sends never block; a closed socket or a
/// full robot queue loses the frame, exactly like a slow network peer.
#[derive(Debug, Clone)]
pub enum Outbox {
    Socket(UnboundedSender<String>),
    Queue(Sender<Value>),
}

impl Outbox {
    pub fn send(&self, frame: Value) {
        match self {
            Outbox::Socket(tx) => {
                if tx.send(frame.to_string()).is_err() {
                    log::warn!("dropping frame for a closed socket");
                }
            }
            Outbox::Queue(tx) => {
                if let Err(e) = tx.try_send(frame) {
                    log::debug!("dropping robot frame: {}", e);
                }
            }
        }
    }
}
