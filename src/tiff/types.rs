//! Core TIFF data structures

use std::fmt;

use crate::io::byte_order::ByteOrder;
use crate::tiff::directory::Directory;
use crate::tiff::format::TiffFormat;

/// Represents an open TIFF file: format, byte order and its directories
#[derive(Debug)]
pub struct Tiff {
    /// Format mode the file was read with
    pub format: TiffFormat,
    /// Byte order declared by the header
    pub byte_order: ByteOrder,
    /// Decoded directories, in chain order
    pub directories: Vec<Directory>,
}

impl Tiff {
    /// Creates a new empty TIFF structure
    pub fn new(format: TiffFormat, byte_order: ByteOrder) -> Self {
        Tiff {
            format,
            byte_order,
            directories: Vec::new(),
        }
    }

    /// Returns the main (first) directory if available
    pub fn main_directory(&self) -> Option<&Directory> {
        self.directories.first()
    }

    /// Returns the number of directories in the file
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Returns the reduced-resolution sub-images
    pub fn reduced_resolution_directories(&self) -> Vec<&Directory> {
        self.directories
            .iter()
            .filter(|dir| dir.is_reduced_resolution())
            .collect()
    }
}

impl fmt::Display for Tiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TIFF File:")?;
        writeln!(
            f,
            "  Format: {}",
            if self.format.is_big() { "BigTIFF" } else { "TIFF" }
        )?;
        writeln!(f, "  Byte order: {}", self.byte_order.name())?;
        writeln!(f, "  Number of directories: {}", self.directories.len())?;

        if let Some(dir) = self.main_directory() {
            write!(f, "{}", dir)?;
        }

        Ok(())
    }
}
