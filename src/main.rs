use clap::Parser;
use preview_envs::cli::Cli;
use preview_envs::config::ActionConfig;
use preview_envs::{Error, action, outputs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match ActionConfig::from_env(cli) {
        Ok(config) => action::run(config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        report_failure(&e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout only carries workflow commands
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn report_failure(error: &Error) {
    tracing::error!("{}", error);

    outputs::error("Action failed");
    outputs::error(&error.to_string());

    if let Error::HumanitecApi { status, body, .. } = error {
        outputs::error("API response:");
        outputs::error(&format!("status: {}", status.as_u16()));
        if !body.is_empty() {
            outputs::error(&format!("response: {}", body));
        }
    }
}
