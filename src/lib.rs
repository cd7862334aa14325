//! tile_rle library
//!
//! Run-length encoding for 4-bit tile data, with spritesheet frame offsets,
//! plus the tile extraction and file handling used by the `tile-rle` tool.

pub mod binary_utils;
pub mod compression;
pub mod config;
pub mod converter;
pub mod error;
pub mod graphics;

pub use compression::rle::{decode_blocks, split_frames, RleEncoder};
pub use compression::{
    compress, compression_ratio, AnimationConfig, CompressionResult, Compressor,
    COMPRESSION_FLAG_LENGTH,
};
pub use config::{load_config, JobConfig};
pub use error::CodecError;
