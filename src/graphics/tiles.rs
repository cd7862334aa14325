//! Tile extraction from palette images.
//!
//! Cuts an image into 8x8 tiles and writes each pixel's palette index as one
//! hex digit, producing the digit stream consumed by the compressor.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

use crate::binary_utils::nibble_to_hex;
use crate::error::CodecError;

pub const TILE_DIM: u32 = 8;
pub const MAX_PALETTE_COLOURS: usize = 16;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TileSet {
    /// RGBA colours in order of first appearance; digit `n` refers to `palette[n]`.
    pub palette: Vec<[u8; 4]>,
    /// One 64-digit hex string per tile, row-major across the image.
    pub tiles: Vec<String>,
    pub columns: u32,
    pub rows: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OptimisedTiles {
    pub tiles: Vec<String>,
    /// `tile_map[source_index] = unique_index`
    pub tile_map: Vec<usize>,
}

/// Open an image file and cut it into tiles.
pub fn load_tiles(path: &Path) -> Result<TileSet, CodecError> {
    let image = image::open(path)?.to_rgba8();
    tracing::info!(
        "Loaded {:?} ({}x{})",
        path,
        image.width(),
        image.height()
    );
    extract_tiles(&image)
}

pub fn extract_tiles(image: &RgbaImage) -> Result<TileSet, CodecError> {
    let (width, height) = image.dimensions();
    if width % TILE_DIM != 0 || height % TILE_DIM != 0 {
        return Err(CodecError::UnalignedImage {
            width,
            height,
            tile_dim: TILE_DIM,
        });
    }

    let columns = width / TILE_DIM;
    let rows = height / TILE_DIM;
    let mut palette: Vec<Rgba<u8>> = Vec::with_capacity(MAX_PALETTE_COLOURS);
    let mut tiles = Vec::with_capacity((columns * rows) as usize);

    for tile_y in 0..rows {
        for tile_x in 0..columns {
            let mut digits = String::with_capacity((TILE_DIM * TILE_DIM) as usize);

            for y in 0..TILE_DIM {
                for x in 0..TILE_DIM {
                    let pixel = *image.get_pixel(tile_x * TILE_DIM + x, tile_y * TILE_DIM + y);
                    let index = palette_index(&mut palette, pixel)?;
                    digits.push(nibble_to_hex(index));
                }
            }

            tiles.push(digits);
        }
    }

    tracing::debug!(
        "Extracted {} tiles using {} colours",
        tiles.len(),
        palette.len()
    );

    Ok(TileSet {
        palette: palette.into_iter().map(|colour| colour.0).collect(),
        tiles,
        columns,
        rows,
    })
}

fn palette_index(palette: &mut Vec<Rgba<u8>>, colour: Rgba<u8>) -> Result<u8, CodecError> {
    if let Some(index) = palette.iter().position(|&c| c == colour) {
        return Ok(index as u8);
    }
    if palette.len() == MAX_PALETTE_COLOURS {
        return Err(CodecError::TooManyColours(MAX_PALETTE_COLOURS + 1));
    }
    palette.push(colour);
    Ok((palette.len() - 1) as u8)
}

/// Drop duplicate tiles, keeping the first occurrence of each.
pub fn optimise_tiles<S: AsRef<str>>(tiles: &[S]) -> OptimisedTiles {
    let mut seen: HashMap<u64, Vec<usize>> = HashMap::new();
    let mut unique: Vec<String> = Vec::new();
    let mut tile_map = Vec::with_capacity(tiles.len());

    for tile in tiles {
        let tile = tile.as_ref();

        let unique_index = match seen.entry(tile_hash(tile)) {
            Entry::Occupied(mut entry) => {
                // Confirm on hash hits, collisions are possible
                match entry.get().iter().copied().find(|&i| unique[i] == tile) {
                    Some(index) => index,
                    None => {
                        let index = unique.len();
                        unique.push(tile.to_string());
                        entry.get_mut().push(index);
                        index
                    }
                }
            }
            Entry::Vacant(entry) => {
                let index = unique.len();
                unique.push(tile.to_string());
                entry.insert(vec![index]);
                index
            }
        };

        tile_map.push(unique_index);
    }

    tracing::debug!("Optimised {} tiles down to {}", tiles.len(), unique.len());

    OptimisedTiles {
        tiles: unique,
        tile_map,
    }
}

fn tile_hash(tile: &str) -> u64 {
    let mut hasher = XxHash64::default();
    tile.hash(&mut hasher);
    hasher.finish()
}
