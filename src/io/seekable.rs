//! Seekable stream traits
//!
//! This module provides unified traits for streams that support
//! reading, writing and seeking operations.

use std::io::{Read, Seek, Write};

/// Trait for readers that can both read and seek
///
/// This trait combines the Read and Seek traits for use with
/// the directory reader and the value-fetch helpers.
pub trait SeekableReader: Read + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Seek + Send + Sync> SeekableReader for T {}

/// Trait for streams that can read, write and seek
///
/// The directory writer needs all three: it writes entry tables and
/// data regions, seeks back to patch chain pointers, and re-reads
/// previously written directories during a BigTIFF upgrade.
pub trait SeekableStream: Read + Write + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Write + Seek + Send + Sync> SeekableStream for T {}
