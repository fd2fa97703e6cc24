//! Account management binary.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accounts_lib::cli::Cli;
use common::{AppError, Settings};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            init_tracing("info");
            fail(err);
        }
    };

    init_tracing(settings.default_log_filter());

    if settings.uses_insecure_secret_key() && !settings.debug {
        tracing::warn!("DJANGO_SECRET_KEY not set, using insecure default");
    }

    if let Err(err) = accounts_lib::run(cli, settings).await {
        fail(err);
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn fail(err: AppError) -> ! {
    tracing::error!(code = err.code(), "Command failed");
    eprintln!("Error: {}", err.user_message());
    std::process::exit(1);
}
