use crate::MAX_MESSAGE_SIZE;
use crate::PING_PERIOD;
use crate::PONG_WAIT;
use crate::WRITE_WAIT;
use crate::session::Session;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tokio::time::timeout;

/// Per-connection pump: outbound frames to the socket under a write
/// deadline, inbound frames into the dispatcher, a ping at 90% of the
/// read deadline. Any stall, oversize loop-out, or transport error ends
/// here with the session leaving its table.
pub async fn bridge(
    session: Arc<Session>,
    mut outbound: UnboundedReceiver<String>,
    mut socket: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    let mut heartbeat = tokio::time::interval(PING_PERIOD);
    let mut last_seen = Instant::now();
    'sesh: loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if last_seen.elapsed() > PONG_WAIT {
                    log::warn!("user [{}] missed the read deadline", session.id);
                    break 'sesh;
                }
                match timeout(WRITE_WAIT, socket.ping(b"")).await {
                    Ok(Ok(())) => {}
                    _ => break 'sesh,
                }
            }
            frame = outbound.recv() => match frame {
                Some(text) => match timeout(WRITE_WAIT, socket.text(text)).await {
                    Ok(Ok(())) => {}
                    _ => {
                        log::error!("user [{}] write failed or timed out", session.id);
                        break 'sesh;
                    }
                },
                None => break 'sesh,
            },
            message = stream.next() => match message {
                Some(Ok(actix_ws::Message::Text(text))) => {
                    last_seen = Instant::now();
                    if text.len() > MAX_MESSAGE_SIZE {
                        log::error!("user [{}] sent an oversize frame", session.id);
                        continue 'sesh;
                    }
                    session.handle_text(&text).await;
                }
                Some(Ok(actix_ws::Message::Ping(bytes))) => {
                    last_seen = Instant::now();
                    let _ = socket.pong(&bytes).await;
                }
                Some(Ok(actix_ws::Message::Pong(_))) => last_seen = Instant::now(),
                Some(Ok(actix_ws::Message::Close(_))) | None => break 'sesh,
                Some(Err(e)) => {
                    log::error!("user [{}] socket error: {}", session.id, e);
                    break 'sesh;
                }
                _ => continue 'sesh,
            },
        }
    }
    let _ = socket.close(None).await;
    session.leave().await;
    log::info!("user [{}] disconnected", session.id);
}
