mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_tracing();

    let (addr, config) = match cli::run() {
        cli::RunOutcome::Serve { addr, config } => (addr, config),
        cli::RunOutcome::Exit(code) => std::process::exit(code),
    };

    if let Err(err) = livescore::serve(addr, config).await {
        tracing::error!(error = %err, "server stopped");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
