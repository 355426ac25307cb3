//! Array-level endian swabbing
//!
//! Utilities for reversing the byte order of packed sample arrays in
//! place. The predictor filter uses these when it takes over the
//! post-decode swap step for 16- and 32-bit samples.

/// Swaps the byte order of every 16-bit word in the buffer
///
/// Trailing odd bytes are left untouched.
pub fn swab_bytes_16(buffer: &mut [u8]) {
    for pair in buffer.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

/// Swaps the byte order of every 32-bit word in the buffer
///
/// Trailing bytes that do not fill a word are left untouched.
pub fn swab_bytes_32(buffer: &mut [u8]) {
    for quad in buffer.chunks_exact_mut(4) {
        quad.reverse();
    }
}

/// Swaps the byte order of every 64-bit word in the buffer
///
/// Trailing bytes that do not fill a word are left untouched.
pub fn swab_bytes_64(buffer: &mut [u8]) {
    for word in buffer.chunks_exact_mut(8) {
        word.reverse();
    }
}

/// Swaps the byte order of every word of `width` bytes in the buffer
///
/// Widths of 1 (and 0) are a no-op since single bytes have no order.
pub fn swab_bytes(buffer: &mut [u8], width: usize) {
    match width {
        2 => swab_bytes_16(buffer),
        4 => swab_bytes_32(buffer),
        8 => swab_bytes_64(buffer),
        _ => {}
    }
}
