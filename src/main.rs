use dedup_kv::config::{ServerConfig, USAGE};
use dedup_kv::server;
use dedup_kv::storage::memory::KvStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("{}", USAGE);
        eprintln!("Example: {} --bind 127.0.0.1:5000 --log-level debug", args[0]);
        return Ok(());
    }

    let config = match ServerConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    tracing::info!("Starting key-value server on {}", config.bind_addr);

    // 1. Store:
    let store = Arc::new(KvStore::new());

    // 2. Stats reporter:
    if let Some(interval) = config.stats_interval {
        let stats_store = store.clone();
        tokio::spawn(async move {
            server::report_stats(stats_store, interval).await;
        });
    }

    // 3. HTTP server:
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Press Ctrl+C to shutdown");
    server::serve(listener, store).await?;

    Ok(())
}
