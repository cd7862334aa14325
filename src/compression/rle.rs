use super::{AnimationConfig, COMPRESSION_FLAG_LENGTH};
use crate::binary_utils::{hex_to_nibble, nibble_to_hex, pad_hex};
use crate::error::CodecError;

// A block holds four (length - 1, value) nibble pairs
pub const BLOCK_LEN: usize = 8;
const MAX_RUN_LEN: usize = 16;

/// Streaming run-length encoder over hex digits.
///
/// Digits are pushed one at a time together with their position in the whole
/// stream; spritesheet frame boundaries are detected from that position.
pub struct RleEncoder {
    frame_size: Option<usize>,
    compressed: Vec<String>,
    block: String,
    current: Option<char>,
    counter: usize,
    frame_offsets: Vec<usize>,
}

impl RleEncoder {
    pub fn new(animation: &AnimationConfig) -> Self {
        let frame_size = animation.is_spritesheet().then(|| animation.frame_size());
        let frame_offsets = match frame_size {
            Some(_) => vec![COMPRESSION_FLAG_LENGTH],
            None => Vec::new(),
        };

        RleEncoder {
            frame_size,
            compressed: Vec::new(),
            block: String::with_capacity(BLOCK_LEN),
            current: None,
            counter: 0,
            frame_offsets,
        }
    }

    pub fn push_digit(&mut self, position: usize, digit: char) {
        match self.current {
            Some(current) if current == digit && self.counter < MAX_RUN_LEN => {
                self.counter += 1;
            }
            Some(_) => {
                self.flush_run();
                self.current = Some(digit);
                self.counter = 1;
            }
            None => {
                self.current = Some(digit);
                self.counter = 1;
            }
        }

        if let Some(frame_size) = self.frame_size {
            if (position + 1) % frame_size == 0 {
                self.end_frame();
            }
        }
    }

    /// Returns the compressed blocks and the frame offset table.
    pub fn finish(mut self) -> (Vec<String>, Vec<usize>) {
        if self.frame_size.is_some() {
            if self.current.is_some() {
                tracing::warn!(
                    "Spritesheet data ends inside a frame, closing the partial frame after {} blocks",
                    self.compressed.len()
                );
                self.end_frame();
            }
            // The last offset points past the final frame
            self.frame_offsets.pop();
        } else {
            self.flush_run();
            self.flush_block();
        }

        (self.compressed, self.frame_offsets)
    }

    fn flush_run(&mut self) {
        let Some(digit) = self.current else {
            return;
        };
        if self.counter == 0 {
            return;
        }

        self.block.push(nibble_to_hex((self.counter - 1) as u8));
        self.block.push(digit);
        if self.block.len() >= BLOCK_LEN {
            self.compressed.push(std::mem::take(&mut self.block));
        }
    }

    fn flush_block(&mut self) {
        if self.block.is_empty() {
            return;
        }
        pad_hex(&mut self.block, BLOCK_LEN);
        self.compressed.push(std::mem::take(&mut self.block));
    }

    fn end_frame(&mut self) {
        self.flush_run();
        self.flush_block();
        self.current = None;
        self.counter = 0;
        self.frame_offsets
            .push(self.compressed.len() + COMPRESSION_FLAG_LENGTH);
    }
}

/// Expand compressed blocks back into the digit stream.
///
/// Padding pairs decode as extra '0' digits at the end of a block.
pub fn decode_blocks<S: AsRef<str>>(blocks: &[S]) -> Result<String, CodecError> {
    let mut digits = String::with_capacity(blocks.len() * BLOCK_LEN);

    for (index, block) in blocks.iter().enumerate() {
        let block = block.as_ref();
        let chars: Vec<char> = block.chars().collect();
        if chars.len() != BLOCK_LEN || chars.iter().any(|&c| hex_to_nibble(c).is_none()) {
            return Err(CodecError::InvalidBlock {
                index,
                block: block.to_string(),
            });
        }

        for pair in chars.chunks_exact(2) {
            let run_len = hex_to_nibble(pair[0]).map_or(0, usize::from) + 1;
            for _ in 0..run_len {
                digits.push(pair[1]);
            }
        }
    }

    Ok(digits)
}

/// Slice spritesheet blocks into frames using the frame offset table.
pub fn split_frames<'a>(
    blocks: &'a [String],
    offsets: &[usize],
) -> Result<Vec<&'a [String]>, CodecError> {
    let mut starts = Vec::with_capacity(offsets.len());
    let mut previous = 0;

    for (index, &offset) in offsets.iter().enumerate() {
        let invalid = || CodecError::InvalidFrameOffset {
            index,
            offset,
            block_count: blocks.len(),
        };
        let start = offset
            .checked_sub(COMPRESSION_FLAG_LENGTH)
            .ok_or_else(invalid)?;
        if start > blocks.len() || (index > 0 && start <= previous) {
            return Err(invalid());
        }
        starts.push(start);
        previous = start;
    }

    let frames = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(blocks.len());
            &blocks[start..end]
        })
        .collect();

    Ok(frames)
}
