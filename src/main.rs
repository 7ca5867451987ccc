use memkv::config::{ServerConfig, USAGE};
use memkv::server;
use memkv::store::memory::KvStore;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    if std::env::args().skip(1).any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return;
    }

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}\n\n{}", e, USAGE);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    tracing::info!("Starting memkv on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    // One store for the whole process; handlers get it through the router.
    let store = Arc::new(KvStore::new());

    if let Err(e) = server::serve(config, store).await {
        tracing::error!("Server failed to start: {:#}", e);
        std::process::exit(1);
    }
}
