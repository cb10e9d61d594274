#[tokio::main]
async fn main() {
    if let Err(e) = banguat_rates::run().await {
        tracing::error!("Fatal: {}", e);
        std::process::exit(1);
    }
}
