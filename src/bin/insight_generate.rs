//! Runs the analyse → compose → generate pipeline on a local image.

use anyhow::{Context, Result};
use clap::Parser;
use insight_studio::cli::RemoteOptions;
use insight_studio::config::setup_logging;
use insight_studio::constants::GENERATED_IMAGE_FILENAME;
use insight_studio::inference::InferenceClient;
use insight_studio::intake::UploadedImage;
use insight_studio::pipeline;
use std::path::PathBuf;

/// Generate a stylised image from a portrait.
///
///   insight_generate portrait.jpg --prompt "wearing a wizard hat"
#[derive(Parser, Debug)]
#[command(name = "insight_generate")]
#[command(about = "Describe a portrait with a VQA model, then render it with an image model")]
struct Args {
    /// JPG or PNG image to start from
    image: PathBuf,

    /// Extra description appended to the generated prompt
    #[arg(long, short, default_value = "")]
    prompt: String,

    /// Where to write the generated PNG
    #[arg(long, short, default_value = GENERATED_IMAGE_FILENAME)]
    output: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(flatten)]
    remote: RemoteOptions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug).map_err(|err| anyhow::anyhow!(err))?;

    let image = UploadedImage::from_path(&args.image)
        .await
        .with_context(|| format!("Failed to load {}", args.image.display()))?;
    let client = InferenceClient::new(args.remote.inference_config())?;

    let outcome = pipeline::run(&client, &image, &args.prompt).await;
    for notice in &outcome.analysis_notices {
        eprintln!("{}: {}", notice.level.as_str(), notice.text);
    }
    eprintln!("Prompt: {}", outcome.prompt);

    let png = outcome.generated.context("Image generation failed")?;

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&args.output, &png)
        .await
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    eprintln!("Saved: {}", args.output.display());
    Ok(())
}
