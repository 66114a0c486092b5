// Message channel boundary
//
// Decouples the command surface from the transport: the TCP line-chat
// adapter and the in-memory loopback both produce `InboundMessage`
// values and deliver replies through a `ReplyHandle`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{BotError, Result};

/// One chat message handed to the command surface.
pub struct InboundMessage {
    /// Who sent the message (peer address for the TCP adapter).
    pub author: String,

    /// Raw message text, one line.
    pub content: String,

    /// When the adapter took the message off the wire.
    pub received_at: Instant,

    /// Where replies to this message go.
    pub reply: ReplyHandle,
}

/// Sending side of a connection's reply stream, cheap to clone.
#[derive(Clone)]
pub struct ReplyHandle {
    tx: mpsc::Sender<String>,
}

impl ReplyHandle {
    /// Deliver one reply to the originating connection.
    pub async fn send(&self, text: impl Into<String>) -> Result<()> {
        self.tx
            .send(text.into())
            .await
            .map_err(|_| BotError::Delivery("reply receiver is gone".to_string()))
    }
}

/// In-memory reply pair for tests: a handle plus the receiver of
/// everything sent through it.
#[allow(dead_code)]
pub fn loopback(capacity: usize) -> (ReplyHandle, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(capacity);
    (ReplyHandle { tx }, rx)
}

/// Accept chat connections forever, one task per connection.
pub async fn serve(
    listener: TcpListener,
    config: Arc<Config>,
    inbound: mpsc::Sender<InboundMessage>,
) -> anyhow::Result<()> {
    loop {
        // A single failed accept (peer reset in the backlog, fd pressure)
        // must not take the listener down; the pause keeps fd exhaustion
        // from spinning the loop.
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!("Failed to accept connection: {}", err);
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };
        debug!("New connection from {}", addr);

        let config = Arc::clone(&config);
        let inbound = inbound.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, addr, config, inbound).await {
                warn!("Connection {} closed with error: {}", addr, err);
            }
        });
    }
}

/// Drive one chat connection: token handshake first, then a
/// line-per-message read loop, with a writer task draining this
/// connection's replies.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    config: Arc<Config>,
    inbound: mpsc::Sender<InboundMessage>,
) -> anyhow::Result<()> {
    let (read_half, write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // The first line must be the access token; a mismatch closes the
    // connection without any reply.
    match lines.next_line().await? {
        Some(token) if token == config.token => {
            debug!("Connection {} authenticated", addr);
        }
        _ => {
            info!("Connection {} rejected: bad token", addr);
            return Ok(());
        }
    }

    let (reply_tx, reply_rx) = mpsc::channel(config.outbound_queue_depth);
    let writer = tokio::spawn(write_replies(write_half, reply_rx));

    while let Some(line) = lines.next_line().await? {
        let message = InboundMessage {
            author: addr.to_string(),
            content: line,
            received_at: Instant::now(),
            reply: ReplyHandle {
                tx: reply_tx.clone(),
            },
        };
        if inbound.send(message).await.is_err() {
            // Command surface shut down
            break;
        }
    }

    drop(reply_tx);
    writer.await?;
    debug!("Connection {} closed", addr);
    Ok(())
}

/// Write queued replies back to the peer, newline-terminated.
async fn write_replies(mut half: OwnedWriteHalf, mut replies: mpsc::Receiver<String>) {
    while let Some(text) = replies.recv().await {
        if let Err(err) = half.write_all(text.as_bytes()).await {
            warn!("Reply write failed: {}", err);
            return;
        }
        if let Err(err) = half.write_all(b"\n").await {
            warn!("Reply write failed: {}", err);
            return;
        }
    }
}
