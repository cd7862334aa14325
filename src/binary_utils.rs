// Nibble <-> hex digit helpers shared by the codec and the tile extractor

/// Uppercase hex digit for the low four bits of `nibble`; high bits are ignored.
pub fn nibble_to_hex(nibble: u8) -> char {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    DIGITS[usize::from(nibble & 0x0F)] as char
}

pub fn hex_to_nibble(digit: char) -> Option<u8> {
    digit.to_digit(16).map(|value| value as u8)
}

/// Right-pads `buffer` with '0' up to `len` characters.
pub fn pad_hex(buffer: &mut String, len: usize) {
    while buffer.len() < len {
        buffer.push('0');
    }
}
