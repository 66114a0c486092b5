// Command surface
//
// One task owns the inbound queue and serves messages strictly in
// arrival order. Benchmarks run inline on this task and block the loop
// until they finish; commands arriving meanwhile wait in the queue.

use tokio::sync::mpsc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::channel::InboundMessage;
use crate::command::{self, Command};
use crate::config::Config;
use crate::registry::Dispatcher;

/// The command-serving event loop.
pub struct CommandSurface {
    dispatcher: Dispatcher,
    prefix: String,
}

impl CommandSurface {
    /// Create a surface over a dispatcher, taking the command prefix
    /// from the configuration.
    pub fn new(config: &Config, dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            prefix: config.prefix.clone(),
        }
    }

    /// Serve messages until the inbound queue closes.
    pub async fn run(self, mut inbound: mpsc::Receiver<InboundMessage>) {
        info!("Command loop started");
        while let Some(message) = inbound.recv().await {
            self.handle(message).await;
        }
        info!("Command loop stopped");
    }

    /// Parse one message and serve it under a per-command span.
    async fn handle(&self, message: InboundMessage) {
        let Some(cmd) = command::parse(&message.content, &self.prefix) else {
            return;
        };

        let request_id = Uuid::new_v4();
        let span = info_span!("command", id = %request_id, author = %message.author);
        self.serve_command(cmd, message).instrument(span).await;
    }

    async fn serve_command(&self, cmd: Command, message: InboundMessage) {
        match cmd {
            Command::Ping => {
                // Latency is the gap between the adapter stamping the
                // message and this loop getting to it.
                let latency_ms = message.received_at.elapsed().as_millis();
                let text = format!("Pong! Latency: {}ms", latency_ms);
                if let Err(err) = message.reply.send(text).await {
                    warn!("Ping reply dropped: {}", err);
                }
            }
            Command::Benchmark { keyword } => {
                info!("Benchmark requested: '{}'", keyword);

                let ack = format!("Running benchmark '{}'...", keyword);
                if let Err(err) = message.reply.send(ack).await {
                    warn!("Acknowledgment dropped, abandoning command: {}", err);
                    return;
                }

                // Blocks the loop until the workloads finish
                let reply = match self.dispatcher.dispatch(&keyword) {
                    Ok(report) => report,
                    Err(err) => {
                        warn!("Benchmark '{}' failed: {}", keyword, err);
                        err.user_reply()
                    }
                };

                if let Err(err) = message.reply.send(reply).await {
                    warn!("Result reply dropped: {}", err);
                }
            }
        }
    }
}
