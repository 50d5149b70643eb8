use std::env;

use timing_lab::core::config::DEFAULT_CONFIG_FILE;
use timing_lab::run_demos;

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Arguments name the demos to run; none means all of them.
    let only: Vec<String> = env::args().skip(1).collect();
    let config_path = env::var("TIMING_LAB_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    if let Err(e) = run_demos(&config_path, "results", &only).await {
        eprintln!("Fatal error: {}", e);
        std::process::exit(1);
    }
}
