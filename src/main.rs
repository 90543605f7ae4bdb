mod azure;
mod cli;
mod config;
mod download;
mod error;
mod image;
mod job;
mod media;
mod ui;
mod video;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use console::Style;
use tracing_subscriber::EnvFilter;

use azure::types::{ImageGenerationRequest, ImageQuality, ImageSize};
use azure::{AzureClient, Endpoint, RouteMode};
use cli::{Cli, Command, VideoArgs};
use config::MediaConfig;
use error::MediaError;
use job::{PollSettings, TokioSleeper};
use media::ImageAttachment;
use ui::JobProgress;
use video::{VideoJob, VideoRequest, VideoSize};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err:#}", Style::new().red().bold().apply_to("error:"));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "azmedia=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<PathBuf> {
    let config = MediaConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.validate()?;

    match cli.command {
        Command::Image {
            prompt,
            output,
            size,
            quality,
        } => run_image(&config, prompt, output, size, quality).await,
        Command::Video { prompt, video } => {
            run_video(&config, prompt, None, video, VideoDefaults::TEXT).await
        }
        Command::ImageToVideo {
            image,
            prompt,
            video,
        } => run_video(&config, prompt, Some(&image), video, VideoDefaults::IMAGE).await,
    }
}

async fn run_image(
    config: &MediaConfig,
    prompt: String,
    output: PathBuf,
    size: ImageSize,
    quality: ImageQuality,
) -> Result<PathBuf> {
    let endpoint = Endpoint::new(
        &config.endpoint,
        &config.image_deployment,
        config.api_version_or(config::IMAGE_API_VERSION),
    );
    let client = AzureClient::new(endpoint, config.api_key.clone())?;

    let progress = JobProgress::start("Generating image");
    progress.note("prompt", &prompt);
    progress.note("size", size.as_str());
    progress.note("quality", quality.as_str());
    progress.note("model", &config.image_deployment);

    let request = ImageGenerationRequest {
        prompt,
        size,
        quality,
        n: 1,
    };
    let result = image::generate_image(&client, &request, &output).await;
    progress.complete(&result);
    result.context("image generation failed")
}

/// Per-command fallbacks used when neither flags, env nor file set a value.
#[derive(Debug, Clone, Copy)]
struct VideoDefaults {
    api_version: &'static str,
    mode: RouteMode,
}

impl VideoDefaults {
    const TEXT: Self = Self {
        api_version: config::VIDEO_API_VERSION,
        mode: RouteMode::Auto,
    };
    const IMAGE: Self = Self {
        api_version: config::IMAGE_TO_VIDEO_API_VERSION,
        mode: RouteMode::Jobs,
    };
}

/// Route mode, polling and API version after layering flags over config over defaults.
#[derive(Debug, PartialEq, Eq)]
struct VideoSettings {
    mode: RouteMode,
    poll: PollSettings,
    api_version: String,
}

fn resolve_video_settings(
    config: &MediaConfig,
    args: &VideoArgs,
    defaults: VideoDefaults,
) -> Result<VideoSettings, MediaError> {
    // A --route flag wins without reading the configured mode at all.
    let mode = match args.route {
        Some(mode) => mode,
        None => config.video_api_mode()?.unwrap_or(defaults.mode),
    };
    Ok(VideoSettings {
        mode,
        poll: PollSettings::from_secs(
            args.poll_interval.unwrap_or(config.poll_interval_secs),
            args.max_wait.unwrap_or(config.max_wait_secs),
        ),
        api_version: config.api_version_or(defaults.api_version).to_string(),
    })
}

async fn run_video(
    config: &MediaConfig,
    prompt: String,
    image: Option<&Path>,
    args: VideoArgs,
    defaults: VideoDefaults,
) -> Result<PathBuf> {
    // Local validation happens before any request is made.
    let size: VideoSize = args.size.parse()?;
    let image = image.map(ImageAttachment::from_path).transpose()?;

    let VideoSettings {
        mode,
        poll,
        api_version,
    } = resolve_video_settings(config, &args, defaults)?;
    let endpoint = Endpoint::new(&config.endpoint, &config.video_deployment, &api_version);
    let client = AzureClient::new(endpoint, config.api_key.clone())?;

    let progress = JobProgress::start("Generating video");
    if let Some(img) = &image {
        progress.note("image", format!("{} ({:.2} MB)", img.mime_type, img.size_mb()));
    }
    progress.note("prompt", if prompt.is_empty() { "(none)" } else { prompt.as_str() });
    progress.note("size", size);
    progress.note("seconds", args.seconds);
    progress.note("model", &config.video_deployment);
    progress.note(
        "polling",
        format!("every {}s, up to {}s", poll.interval.as_secs(), poll.max_wait.as_secs()),
    );

    let job = VideoJob {
        request: VideoRequest {
            prompt,
            size,
            seconds: args.seconds,
            image,
        },
        mode,
        output: args.output,
        poll,
    };
    let result = video::generate_video(&client, &job, &config.schema, &TokioSleeper, &progress).await;
    progress.complete(&result);
    result.context("video generation failed")
}
