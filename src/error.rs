use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid compressed block {index}: {block:?} (expected 8 hex digits)")]
    InvalidBlock { index: usize, block: String },

    #[error("Invalid frame offset {offset} at position {index} (block count: {block_count})")]
    InvalidFrameOffset {
        index: usize,
        offset: usize,
        block_count: usize,
    },

    #[error("Image dimensions {width}x{height} are not multiples of the {tile_dim}px tile size")]
    UnalignedImage {
        width: u32,
        height: u32,
        tile_dim: u32,
    },

    #[error("Tile optimisation cannot be combined with spritesheet framing")]
    OptimisedSpritesheet,

    #[error("Image uses at least {0} colours, a 4-bit palette holds 16")]
    TooManyColours(usize),
}
