//! Config handling

use std::time::Duration;

use tracing::log::LevelFilter;
use url::Url;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Where and how to reach the remote models.
#[derive(Clone, Debug)]
pub struct InferenceConfig {
    /// Static bearer token for both endpoints.
    pub api_token: String,
    /// Visual question answering endpoint.
    pub analysis_url: Url,
    /// Image generation endpoint.
    pub generation_url: Url,
    /// Optional per-request timeout.
    pub timeout: Option<Duration>,
}
