//! tile-rle - tile data converter
//!
//! Compresses hex tile data (from JSON or a palette PNG) into RLE blocks
//! with spritesheet frame offsets, and decodes results back.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use tile_rle::converter::{self, ImageConversion, StoredResult};
use tile_rle::{load_config, Compressor, JobConfig};

#[derive(Parser)]
#[command(name = "tile-rle")]
#[command(about = "Tile data RLE converter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a JSON array of hex tile strings
    Compress {
        /// Input JSON file
        input: PathBuf,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        job: JobArgs,
    },

    /// Extract tiles from a palette image and compress them
    Image {
        /// Input PNG file
        input: PathBuf,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        job: JobArgs,

        /// Drop duplicate tiles and emit a tile map
        #[arg(long)]
        optimise: bool,
    },

    /// Decode a compression result into per-frame digit streams
    Decode {
        /// Result JSON written by `compress` or `image`
        input: PathBuf,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compressor the result was made with (read from the file, else rle)
        #[arg(long, value_enum)]
        compressor: Option<Compressor>,
    },
}

#[derive(Args)]
struct JobArgs {
    /// Job config JSON; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compressor (defaults to rle without a config file)
    #[arg(long, value_enum)]
    compressor: Option<Compressor>,

    /// Treat the data as an animation
    #[arg(long)]
    animation: bool,

    /// Animation frames are separate files, not one spritesheet
    #[arg(long)]
    individual_files: bool,

    /// Frame width in tiles
    #[arg(long)]
    frame_width: Option<u32>,

    /// Frame height in tiles
    #[arg(long)]
    frame_height: Option<u32>,
}

impl JobArgs {
    fn resolve(&self) -> Result<JobConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => JobConfig {
                compressor: Compressor::Rle,
                ..JobConfig::default()
            },
        };

        if let Some(compressor) = self.compressor {
            config.compressor = compressor;
        }
        if self.animation {
            config.animation.is_animation = true;
        }
        if self.individual_files {
            config.animation.individual_files = true;
        }
        if let Some(width) = self.frame_width {
            config.animation.frame_width = width;
        }
        if let Some(height) = self.frame_height {
            config.animation.frame_height = height;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compress { input, output, job } => {
            let config = job.resolve()?;
            let result = converter::compress_tiles_file(&input, &config)
                .with_context(|| format!("Failed to compress {:?}", input))?;
            let stored = StoredResult {
                compressor: Some(config.compressor),
                result,
            };
            converter::write_json(output.as_deref(), &stored)?;
        }

        Commands::Image {
            input,
            output,
            job,
            optimise,
        } => {
            let mut config = job.resolve()?;
            config.optimise_tiles |= optimise;
            let conversion: ImageConversion = converter::convert_image(&input, &config)
                .with_context(|| format!("Failed to convert image {:?}", input))?;
            converter::write_json(output.as_deref(), &conversion)?;
        }

        Commands::Decode {
            input,
            output,
            compressor,
        } => {
            let stored: StoredResult = converter::read_json(&input)
                .with_context(|| format!("Failed to read result {:?}", input))?;
            if stored.result.tiles_data.is_empty() {
                anyhow::bail!("{:?} holds no tile data", input);
            }
            let compressor = compressor.or(stored.compressor).unwrap_or(Compressor::Rle);
            let frames = converter::decode_result(&stored.result, compressor)?;
            tracing::info!("Decoded {} frame(s) from {:?}", frames.len(), input);
            converter::write_json(output.as_deref(), &frames)?;
        }
    }

    Ok(())
}
