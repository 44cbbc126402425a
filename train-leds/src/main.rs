use tracing::error;
use tracing_subscriber::EnvFilter;

use train_leds::app::App;
use train_leds::config::AppConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("train_leds=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let app = match App::build(&config) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "failed to start");
            std::process::exit(1);
        }
    };

    if let Err(e) = app.serve().await {
        error!(error = %e, "shutting down");
        std::process::exit(1);
    }
}
