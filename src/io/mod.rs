//! I/O utilities for stream handling
//!
//! This module provides traits and implementations for the byte-level
//! operations the directory reader and writer are built on.

pub mod seekable;
pub mod byte_order;
