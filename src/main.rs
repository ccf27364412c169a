#[tokio::main]
async fn main() {
    if let Err(e) = realtime_token_proxy::run_with_config().await {
        tracing::error!(error = %e, "server exited");
        std::process::exit(1);
    }
}
