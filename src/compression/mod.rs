//! Tile data compression
//!
//! Entry point for turning a tile digit stream into the data written out for
//! the engine, optionally run-length encoded and split into spritesheet frames.

pub mod rle;

use serde::{Deserialize, Serialize};

use self::rle::RleEncoder;

/// Leading words in the generated data that mark the compression type.
/// Frame offsets are shifted by this amount.
pub const COMPRESSION_FLAG_LENGTH: usize = 1;

// Digits per frame when the animation has no usable frame dimensions
const DEFAULT_FRAME_SIZE: usize = 4;

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Compressor {
    #[default]
    None,
    Rle,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationConfig {
    pub is_animation: bool,
    /// Frames are stored as separate files rather than one spritesheet.
    pub individual_files: bool,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl AnimationConfig {
    /// True when the digit stream is one spritesheet cut into fixed-size frames.
    pub fn is_spritesheet(&self) -> bool {
        self.is_animation && !self.individual_files
    }

    /// Frame length in digits. Zero-sized frames fall back to 4; sizes too
    /// large to count saturate, so the whole stream becomes one frame.
    pub fn frame_size(&self) -> usize {
        let size = 4usize
            .saturating_mul(self.frame_width as usize)
            .saturating_mul(self.frame_height as usize);
        match size {
            0 => DEFAULT_FRAME_SIZE,
            size => size,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompressionResult {
    pub tiles_data: Vec<String>,
    pub frame_tile_offsets: Vec<usize>,
    pub compression_ratio: String,
}

impl CompressionResult {
    fn uncompressed(tiles_data: Vec<String>) -> Self {
        CompressionResult {
            tiles_data,
            frame_tile_offsets: Vec::new(),
            compression_ratio: format_ratio(0.0),
        }
    }
}

/// Compress a tile digit stream with the selected compressor.
///
/// Never fails: inputs are expected to hold hex digits only, and a spritesheet
/// with zero frame dimensions uses the default frame size.
///
/// A spritesheet stream that stops partway through a frame still gets that
/// partial frame closed and padded, with its own entry in the offset table.
/// No digits are dropped.
pub fn compress<S: AsRef<str>>(
    tiles_data: &[S],
    compressor: Compressor,
    animation: &AnimationConfig,
) -> CompressionResult {
    let tiles: Vec<String> = tiles_data.iter().map(|t| t.as_ref().to_string()).collect();

    if compressor == Compressor::None || tiles.is_empty() {
        return CompressionResult::uncompressed(tiles);
    }

    let mut encoder = RleEncoder::new(animation);
    let mut position = 0;
    for tile in &tiles {
        for digit in tile.chars() {
            encoder.push_digit(position, digit);
            position += 1;
        }
    }
    let (compressed, frame_tile_offsets) = encoder.finish();

    let ratio = compression_ratio(position, compressed.len());
    tracing::debug!(
        "RLE compressed {} digits into {} blocks ({}%)",
        position,
        compressed.len(),
        ratio
    );

    CompressionResult {
        tiles_data: compressed,
        frame_tile_offsets,
        compression_ratio: ratio,
    }
}

/// Negative when the blocks are fewer than the input digits.
pub fn compression_ratio(uncompressed_len: usize, compressed_len: usize) -> String {
    if uncompressed_len == 0 {
        return format_ratio(0.0);
    }
    let uncompressed = uncompressed_len as f64;
    let ratio = -((uncompressed - compressed_len as f64) / uncompressed * 100.0);
    format_ratio(ratio)
}

fn format_ratio(ratio: f64) -> String {
    // Adding 0.0 turns -0.0 into 0.0 so an unchanged size prints "0.00"
    format!("{:.2}", ratio + 0.0)
}

#[cfg(test)]
mod tests {
    use super::rle::decode_blocks;
    use super::*;

    fn spritesheet(frame_width: u32, frame_height: u32) -> AnimationConfig {
        AnimationConfig {
            is_animation: true,
            individual_files: false,
            frame_width,
            frame_height,
        }
    }

    #[test]
    fn none_compressor_returns_input_unchanged() {
        let input = vec!["0123", "4567"];
        let result = compress(&input, Compressor::None, &spritesheet(1, 1));
        assert_eq!(result.tiles_data, vec!["0123", "4567"]);
        assert!(result.frame_tile_offsets.is_empty());
        assert_eq!(result.compression_ratio, "0.00");
    }

    #[test]
    fn empty_input_has_zero_ratio() {
        let input: Vec<String> = Vec::new();
        let result = compress(&input, Compressor::Rle, &AnimationConfig::default());
        assert!(result.tiles_data.is_empty());
        assert!(result.frame_tile_offsets.is_empty());
        assert_eq!(result.compression_ratio, "0.00");
    }

    #[test]
    fn two_runs_fit_one_padded_block() {
        let result = compress(&["00001111"], Compressor::Rle, &AnimationConfig::default());
        assert_eq!(result.tiles_data, vec!["30310000"]);
        assert!(result.frame_tile_offsets.is_empty());
        assert_eq!(result.compression_ratio, "-87.50");
    }

    #[test]
    fn run_of_sixteen_spans_tiles() {
        let result = compress(
            &["11111111", "11111111"],
            Compressor::Rle,
            &AnimationConfig::default(),
        );
        assert_eq!(result.tiles_data, vec!["F1000000"]);
    }

    #[test]
    fn runs_longer_than_sixteen_are_split() {
        let input = ["7".repeat(20)];
        let result = compress(&input, Compressor::Rle, &AnimationConfig::default());
        // 16 + 4
        assert_eq!(result.tiles_data, vec!["F7370000"]);
        assert_eq!(decode_blocks(&result.tiles_data).unwrap(), format!("{}00", "7".repeat(20)));
    }

    #[test]
    fn full_blocks_are_emitted_without_padding() {
        let result = compress(&["0123"], Compressor::Rle, &AnimationConfig::default());
        assert_eq!(result.tiles_data, vec!["00010203"]);
        assert_eq!(result.compression_ratio, "-75.00");

        let result = compress(&["01234"], Compressor::Rle, &AnimationConfig::default());
        assert_eq!(result.tiles_data, vec!["00010203", "04000000"]);
    }

    #[test]
    fn individual_file_animations_are_not_framed() {
        let config = AnimationConfig {
            is_animation: true,
            individual_files: true,
            frame_width: 1,
            frame_height: 1,
        };
        let result = compress(&["00001111", "2222"], Compressor::Rle, &config);
        assert_eq!(result.tiles_data, vec!["30313200"]);
        assert!(result.frame_tile_offsets.is_empty());
    }

    #[test]
    fn spritesheet_frames_start_on_block_boundaries() {
        // Frame size 4 digits: three frames
        let result = compress(&["0000", "1122", "3333"], Compressor::Rle, &spritesheet(1, 1));
        assert_eq!(result.tiles_data, vec!["30000000", "11120000", "33000000"]);
        assert_eq!(
            result.frame_tile_offsets,
            vec![COMPRESSION_FLAG_LENGTH, COMPRESSION_FLAG_LENGTH + 1, COMPRESSION_FLAG_LENGTH + 2]
        );
    }

    #[test]
    fn zero_frame_dimensions_fall_back_to_four_digits() {
        let config = spritesheet(0, 0);
        assert_eq!(config.frame_size(), 4);
        let result = compress(&["00000000"], Compressor::Rle, &config);
        assert_eq!(result.tiles_data, vec!["30000000", "30000000"]);
        assert_eq!(result.frame_tile_offsets, vec![1, 2]);
    }

    #[test]
    fn oversized_frame_dimensions_do_not_overflow() {
        let config = spritesheet(u32::MAX, u32::MAX);
        assert!(config.frame_size() >= u32::MAX as usize);

        let result = compress(&["00001111"], Compressor::Rle, &config);
        assert_eq!(result.tiles_data, vec!["30310000"]);
        assert_eq!(result.frame_tile_offsets, vec![COMPRESSION_FLAG_LENGTH]);
    }

    #[test]
    fn frame_boundaries_are_checked_per_digit() {
        // One tile holding two frames of 4 digits each
        let result = compress(&["AAAABBBB"], Compressor::Rle, &spritesheet(1, 1));
        assert_eq!(result.tiles_data, vec!["3A000000", "3B000000"]);
        assert_eq!(result.frame_tile_offsets.len(), 2);
    }

    #[test]
    fn spritesheet_offsets_strictly_increase() {
        let tiles: Vec<String> = (0..6)
            .map(|i| format!("{:X}", i).repeat(8) + "0123456789ABCDEF")
            .collect();
        let result = compress(&tiles, Compressor::Rle, &spritesheet(2, 3));
        let offsets = &result.frame_tile_offsets;
        assert_eq!(offsets[0], COMPRESSION_FLAG_LENGTH);
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        // 6 tiles x 24 digits, frame size 24
        assert_eq!(offsets.len(), 6);
    }

    #[test]
    fn ratio_formats_two_decimals() {
        assert_eq!(compression_ratio(0, 0), "0.00");
        assert_eq!(compression_ratio(8, 8), "0.00");
        assert_eq!(compression_ratio(3, 1), "-66.67");
        assert_eq!(compression_ratio(4, 8), "100.00");
    }

    #[test]
    fn animation_config_reads_camel_case_json() {
        let config: AnimationConfig =
            serde_json::from_str(r#"{"isAnimation": true, "frameWidth": 2, "frameHeight": 3}"#)
                .unwrap();
        assert!(config.is_spritesheet());
        assert_eq!(config.frame_size(), 24);
    }

    #[test]
    fn result_serialises_with_camel_case_fields() {
        let result = compress(&["0000"], Compressor::Rle, &AnimationConfig::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["tilesData"][0], "30000000");
        assert_eq!(json["frameTileOffsets"], serde_json::json!([]));
        assert_eq!(json["compressionRatio"], "-75.00");
    }
}
