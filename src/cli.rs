//! Command-line interface built on clap.
//!
//! [`Cli`] carries global flags (--config, --verbose) and one [`Command`] per
//! generation mode. Video options shared by `video` and `image-to-video` live
//! in [`VideoArgs`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::azure::RouteMode;
use crate::azure::types::{ImageQuality, ImageSize};

/// Generate images and videos with Azure OpenAI.
#[derive(Debug, Parser)]
#[command(name = "azmedia", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file to read instead of ./azmedia.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate an image from a text prompt.
    Image {
        /// What the image should show.
        #[arg(long)]
        prompt: String,

        #[arg(long, default_value = "./output.png")]
        output: PathBuf,

        #[arg(long, value_enum, default_value = "1024x1024")]
        size: ImageSize,

        #[arg(long, value_enum, default_value = "high")]
        quality: ImageQuality,
    },

    /// Generate a video from a text prompt.
    Video {
        /// What the video should show.
        #[arg(long)]
        prompt: String,

        #[command(flatten)]
        video: VideoArgs,
    },

    /// Animate a still image into a video.
    ImageToVideo {
        /// Reference image (PNG, JPG or WEBP).
        #[arg(long)]
        image: PathBuf,

        /// How the image should move. Optional.
        #[arg(long, default_value = "")]
        prompt: String,

        #[command(flatten)]
        video: VideoArgs,
    },
}

#[derive(Debug, Args)]
pub struct VideoArgs {
    #[arg(long, default_value = "./output.mp4")]
    pub output: PathBuf,

    /// Frame size as WIDTHxHEIGHT, e.g. 854x480.
    #[arg(long, default_value = "1920x1080")]
    pub size: String,

    /// Clip length in seconds.
    #[arg(long, visible_alias = "n-seconds", default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub seconds: u32,

    /// Seconds between status queries (default from config, 10).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: Option<u64>,

    /// Give up after this many seconds (default from config, 600).
    #[arg(long)]
    pub max_wait: Option<u64>,

    /// Route shape to use; `auto` probes each in turn.
    #[arg(long, value_enum)]
    pub route: Option<RouteMode>,
}
