use clap::Parser;
use nft_art_dl::cli::{self, Cli};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

/// Exit status when the run finished but some tokens failed
const EXIT_PARTIAL_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging();

    let args = Cli::parse();
    match cli::execute(args).await {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(summary) => {
            tracing::error!(
                failed = summary.failed,
                total = summary.total(),
                "some token images could not be saved"
            );
            ExitCode::from(EXIT_PARTIAL_FAILURE)
        }
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "run aborted");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    const DEFAULT_LOG_FILTER: &str = "info";

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt().with_env_filter(filter).with_target(false).init();
}
