//! CLI parser
use clap::{Args, Parser};
use std::num::NonZeroU16;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::config::InferenceConfig;
use crate::constants::{
    DEFAULT_ANALYSIS_API_URL, DEFAULT_FEEDBACK_PATH, DEFAULT_GENERATION_API_URL,
};

#[derive(Args, Debug, Clone)]
/// Remote model options, shared by the server and the headless generator.
pub struct RemoteOptions {
    #[arg(long, env = "HF_API_KEY", hide_env_values = true)]
    /// Bearer token sent to both inference endpoints. Env: HF_API_KEY
    pub hf_api_key: String,

    #[arg(long, default_value = DEFAULT_ANALYSIS_API_URL, env = "STUDIO_ANALYSIS_URL")]
    /// Visual question answering endpoint. Env: STUDIO_ANALYSIS_URL
    pub analysis_url: Url,

    #[arg(long, default_value = DEFAULT_GENERATION_API_URL, env = "STUDIO_GENERATION_URL")]
    /// Image generation endpoint. Env: STUDIO_GENERATION_URL
    pub generation_url: Url,

    #[arg(long, env = "STUDIO_REQUEST_TIMEOUT")]
    /// Per-request timeout in seconds, unset means the HTTP client default.
    /// Env: STUDIO_REQUEST_TIMEOUT
    pub request_timeout: Option<u64>,
}

impl RemoteOptions {
    /// Builds the inference client configuration from the parsed options.
    pub fn inference_config(&self) -> InferenceConfig {
        InferenceConfig {
            api_token: self.hf_api_key.clone(),
            analysis_url: self.analysis_url.clone(),
            generation_url: self.generation_url.clone(),
            timeout: self.request_timeout.map(Duration::from_secs),
        }
    }
}

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "STUDIO_DEBUG")]
    /// Enable debug logging. Env: STUDIO_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "8080", env = "STUDIO_PORT")]
    /// http listener, defaults to `8080`.
    /// Env: STUDIO_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "STUDIO_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: STUDIO_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, short, default_value = DEFAULT_FEEDBACK_PATH, env = "STUDIO_FEEDBACK_PATH")]
    /// File that feedback entries are appended to.
    /// Env: STUDIO_FEEDBACK_PATH
    pub feedback_path: PathBuf,

    #[clap(long, env = "STUDIO_SECURE_COOKIES")]
    /// Only send the session cookie over HTTPS. Env: STUDIO_SECURE_COOKIES
    pub secure_cookies: bool,

    #[command(flatten)]
    /// Remote model options
    pub remote: RemoteOptions,
}
