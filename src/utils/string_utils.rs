//! String utility functions
//!
//! Utilities for working with ASCII field data.

/// Trims trailing null characters from a byte buffer
///
/// ASCII fields are NUL-terminated on disk; the terminators are not
/// part of the logical value.
pub fn trim_trailing_nulls(buffer: &mut Vec<u8>) {
    while !buffer.is_empty() && buffer[buffer.len() - 1] == 0 {
        buffer.pop();
    }
}
