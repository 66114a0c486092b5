use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

mod channel;
mod command;
mod config;
mod error;
mod registry;
mod report;
mod surface;
mod timer;
mod workload;

/// How long shutdown waits for queued commands before aborting the loop.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (for log level)
    let config = config::Config::load()?;
    config.validate()?;

    // Initialize logging with the configured level and format
    init_tracing(&config);

    tracing::info!("🚀 Benchbot starting...");
    tracing::info!("Chat adapter configured: {}", config.bind_addr());

    // Build the benchmark registry
    let registry = registry::BenchmarkRegistry::builtin();
    tracing::info!(
        "✅ Benchmark registry loaded: {}",
        registry.keywords().join(", ")
    );

    let trigger = format!("{}benchmark", config.prefix);
    let dispatcher = registry::Dispatcher::new(registry, trigger);

    // Inbound queue feeding the single command loop
    let (inbound_tx, inbound_rx) = tokio::sync::mpsc::channel(config.inbound_queue_depth);

    let command_surface = surface::CommandSurface::new(&config, dispatcher);
    let mut command_loop = tokio::spawn(command_surface.run(inbound_rx));
    tracing::info!("✅ Command loop started");

    // Bind the chat listener
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Print startup banner
    print_startup_banner(&config);

    tracing::info!("🚀 Chat adapter listening on {}", addr);

    let config = Arc::new(config);
    tokio::select! {
        result = channel::serve(listener, Arc::clone(&config), inbound_tx) => {
            result?;
        }
        _ = shutdown_signal() => {}
    }

    // The listener is gone, but open connections still hold queue senders,
    // so the drain window is bounded: serve what is already queued, then
    // tear the loop down.
    tracing::info!("⏳ Draining command queue...");
    if tokio::time::timeout(SHUTDOWN_GRACE, &mut command_loop)
        .await
        .is_err()
    {
        command_loop.abort();
    }
    tracing::info!("👋 Benchbot shutdown complete");

    Ok(())
}

/// Initialize the tracing subscriber from configuration
fn init_tracing(config: &config::Config) {
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    match config.log_format {
        config::LogFormat::Pretty => builder.init(),
        config::LogFormat::Compact => builder.compact().init(),
        config::LogFormat::Json => builder.json().init(),
    }
}

/// Print startup banner
fn print_startup_banner(config: &config::Config) {
    let banner = r#"
╔═══════════════════════════════════════════════════════════╗
║                                                           ║
║               🤖 Benchbot - Rust Edition                  ║
║                                                           ║
║  Chat-triggered micro-benchmark harness                   ║
║                                                           ║
╚═══════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner);
    println!("  Version:     {}", env!("CARGO_PKG_VERSION"));
    println!("  Chat:        tcp://{}", config.bind_addr());
    println!("  Prefix:      {}", config.prefix);
    println!("  Log Level:   {}", config.log_level);
    println!("  Log Format:  {:?}", config.log_format);
    println!();
}

/// Handle graceful shutdown signal
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown...");
        },
    }
}
