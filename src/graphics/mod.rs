//! Graphics processing for tile data
//!
//! Turns palette images into the per-tile hex digit strings the compressor consumes.

pub mod tiles;

pub use tiles::{extract_tiles, load_tiles, optimise_tiles, OptimisedTiles, TileSet};
