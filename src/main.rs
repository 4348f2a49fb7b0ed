use std::process::ExitCode;

use clap::Parser;
use nowcoder_crawl::CrawlerConfig;

mod args;
use args::Args;

/// Fallback credential when neither the command line nor the config has one
const COOKIE_ENV: &str = "NOWCODER_COOKIE";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match CrawlerConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => CrawlerConfig::default(),
    };
    if config.default_credential.is_none() {
        config.default_credential = std::env::var(COOKIE_ENV).ok().filter(|c| !c.trim().is_empty());
    }

    let start_time = std::time::Instant::now();
    let response = nowcoder_crawl::respond(args.to_params(), None, &config).await;
    ::log::info!(
        "Finished with code {} ({} items) in {:.2} seconds",
        response.code,
        response.items().len(),
        start_time.elapsed().as_secs_f64()
    );

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            ::log::error!("Failed to encode response: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
