use clap::Parser;
use insight_studio::config::setup_logging;
use insight_studio::feedback::FeedbackSink;
use insight_studio::inference::InferenceClient;
use insight_studio::web::AppState;
use tracing::{error, info};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = insight_studio::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let inference = match InferenceClient::new(cli.remote.inference_config()) {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to set up inference client: {}", err);
            return;
        }
    };
    info!(
        "Analysis model: {}, generation model: {}",
        inference.config().analysis_url,
        inference.config().generation_url
    );
    info!("Feedback is appended to {}", cli.feedback_path.display());

    let state = AppState::new(inference, FeedbackSink::new(cli.feedback_path.clone()));
    if let Err(err) = insight_studio::web::setup_server(
        &cli.listen_address,
        cli.port,
        state,
        cli.secure_cookies,
    )
    .await
    {
        error!("Application error: {}", err);
    }
}
