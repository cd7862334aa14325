//! File-level conversion jobs used by the command line tool.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::compression::rle::{decode_blocks, split_frames};
use crate::compression::{compress, CompressionResult, Compressor};
use crate::config::JobConfig;
use crate::error::CodecError;
use crate::graphics::tiles::{load_tiles, optimise_tiles};

/// A compression result tagged with the compressor that produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredResult {
    /// Missing in files written by hand; decoding then falls back to RLE.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressor: Option<Compressor>,
    #[serde(flatten)]
    pub result: CompressionResult,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageConversion {
    pub compressor: Compressor,
    pub palette: Vec<[u8; 4]>,
    pub columns: u32,
    pub rows: u32,
    /// Present when duplicate tiles were dropped before compressing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_map: Option<Vec<usize>>,
    #[serde(flatten)]
    pub result: CompressionResult,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CodecError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Pretty-print `value` to `path`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<(), CodecError> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
            tracing::info!("Wrote {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, value)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

/// Compress a JSON array of tile digit strings.
pub fn compress_tiles_file(input: &Path, config: &JobConfig) -> Result<CompressionResult, CodecError> {
    let tiles: Vec<String> = read_json(input)?;
    tracing::info!(
        "Compressing {} tiles from {:?} with {:?}",
        tiles.len(),
        input,
        config.compressor
    );
    Ok(compress(&tiles, config.compressor, &config.animation))
}

/// Cut an image into tiles, optionally drop duplicates, then compress.
pub fn convert_image(input: &Path, config: &JobConfig) -> Result<ImageConversion, CodecError> {
    // Dropping tiles would shift every frame boundary after the first duplicate
    if config.optimise_tiles && config.animation.is_spritesheet() {
        return Err(CodecError::OptimisedSpritesheet);
    }

    let tile_set = load_tiles(input)?;

    let (tiles, tile_map) = if config.optimise_tiles {
        let optimised = optimise_tiles(&tile_set.tiles);
        (optimised.tiles, Some(optimised.tile_map))
    } else {
        (tile_set.tiles, None)
    };

    let result = compress(&tiles, config.compressor, &config.animation);
    tracing::info!(
        "Converted {:?}: {} tiles, ratio {}",
        input,
        tiles.len(),
        result.compression_ratio
    );

    Ok(ImageConversion {
        compressor: config.compressor,
        palette: tile_set.palette,
        columns: tile_set.columns,
        rows: tile_set.rows,
        tile_map,
        result,
    })
}

/// Decode a result into one digit stream per frame.
///
/// Results without frame offsets decode to a single stream. Uncompressed
/// results are returned as their concatenated tiles.
pub fn decode_result(
    result: &CompressionResult,
    compressor: Compressor,
) -> Result<Vec<String>, CodecError> {
    if compressor == Compressor::None {
        return Ok(vec![result.tiles_data.concat()]);
    }

    if result.frame_tile_offsets.is_empty() {
        return Ok(vec![decode_blocks(&result.tiles_data)?]);
    }

    split_frames(&result.tiles_data, &result.frame_tile_offsets)?
        .into_iter()
        .map(decode_blocks)
        .collect()
}
