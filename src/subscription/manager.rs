use crate::subscription::SubscriberId;
use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Pumps live-update messages from one subscription into one WebSocket
pub struct ConnectionManager {
    subscriber_id: SubscriberId,
}

impl ConnectionManager {
    pub fn new(subscriber_id: SubscriberId) -> Self {
        Self { subscriber_id }
    }

    /// Handle WebSocket connection lifecycle.
    ///
    /// Returns when the client disconnects, a send fails, or the
    /// subscription is dropped from the registry.
    pub async fn handle(self, mut socket: WebSocket, mut updates: mpsc::Receiver<Arc<str>>) {
        info!(subscriber = %self.subscriber_id, "Client connected to real-time updates");

        loop {
            tokio::select! {
                // Clients have nothing to say; only watch for close and pings
                incoming = socket.recv() => {
                    match incoming {
                        Some(Ok(Message::Close(_))) | None => {
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                error!(error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Some(Ok(Message::Text(text))) => {
                            debug!(
                                subscriber = %self.subscriber_id,
                                len = text.len(),
                                "Ignoring client message"
                            );
                        }
                        Some(Ok(_)) => {
                            // Ignore binary, pong messages
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "WebSocket error");
                            break;
                        }
                    }
                }

                update = updates.recv() => {
                    match update {
                        Some(payload) => {
                            if let Err(e) = socket.send(Message::Text(payload.to_string())).await {
                                debug!(error = %e, "Failed to send update, closing");
                                break;
                            }
                        }
                        None => {
                            // Sink removed from the registry
                            break;
                        }
                    }
                }
            }
        }

        info!(subscriber = %self.subscriber_id, "Client disconnected from real-time updates");
    }
}
