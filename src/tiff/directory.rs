//! Image File Directory (IFD) structures
//!
//! Two layers live here. `IFD` is the raw on-disk view: the entry
//! table exactly as read, plus the trailing next-directory offset.
//! `Directory` is the decoded view: typed field values keyed by tag,
//! the field-set bitmap, and the strip/tile descriptor tables. The
//! reader produces both; the writer consumes a `Directory`.

use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::tiff::constants::{compression, new_subfile_type, planar_config, predictor, tags};
use crate::tiff::entry::IFDEntry;
use crate::tiff::names;
use crate::tiff::value::FieldValue;

/// Bitmap over the 16-bit tag space recording which fields are set
///
/// TIFF fields are optional and a zero value is indistinguishable from
/// an absent one, so presence has to be tracked out of band.
#[derive(Clone)]
pub struct FieldSet {
    words: Box<[u64; 1024]>,
}

impl FieldSet {
    /// Creates an empty set
    pub fn new() -> Self {
        FieldSet { words: Box::new([0u64; 1024]) }
    }

    /// Marks a tag as set
    pub fn set(&mut self, tag: u16) {
        self.words[(tag >> 6) as usize] |= 1u64 << (tag & 63);
    }

    /// Clears a tag
    pub fn clear(&mut self, tag: u16) {
        self.words[(tag >> 6) as usize] &= !(1u64 << (tag & 63));
    }

    /// Tests whether a tag is set
    pub fn test(&self, tag: u16) -> bool {
        self.words[(tag >> 6) as usize] & (1u64 << (tag & 63)) != 0
    }

    /// Clears every tag
    pub fn reset(&mut self) {
        self.words.fill(0);
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count: u32 = self.words.iter().map(|w| w.count_ones()).sum();
        write!(f, "FieldSet({} tags)", count)
    }
}

/// Raw entry table of one Image File Directory
///
/// Holds the entries exactly as they appear on disk, in file order,
/// with a lookup map by tag. The decoded values live in `Directory`.
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based position in the chain)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Offset of the next IFD in the chain, 0 for the last
    pub next_offset: u64,
    /// Index into `entries` by tag, first occurrence wins
    tag_map: HashMap<u16, usize>,
}

impl IFD {
    /// Creates a new empty IFD at the given chain position and offset
    pub fn new(number: usize, offset: u64) -> Self {
        Self {
            entries: Vec::new(),
            number,
            offset,
            next_offset: 0,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry, returning false when the tag was already present
    ///
    /// Duplicate tags are legal nowhere but happen anyway; the caller
    /// decides whether to warn. The first occurrence stays in the map.
    pub fn add_entry(&mut self, entry: IFDEntry) -> bool {
        trace!("IFD #{}: {}", self.number, entry.description());
        let fresh = !self.tag_map.contains_key(&entry.tag);
        if fresh {
            self.tag_map.insert(entry.tag, self.entries.len());
        }
        self.entries.push(entry);
        fresh
    }

    /// Gets an entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&idx| &self.entries[idx])
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Number of entries
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// Decoded view of one directory
///
/// Owned exclusively by the session while it is the current directory;
/// superseded directories are discarded, not retained. Construction
/// starts from default field values, Set operations populate it in any
/// order, and the writer emits it in tag order.
#[derive(Debug, Clone)]
pub struct Directory {
    /// Directory number (0-based position in the chain)
    pub number: usize,
    /// Offset this directory was read from, 0 if never written
    pub offset: u64,
    /// Decoded field values by tag
    fields: HashMap<u16, FieldValue>,
    /// Which tags have been assigned
    field_set: FieldSet,
    /// Byte offset of each strip or tile
    pub strip_offsets: Vec<u64>,
    /// Byte count of each strip or tile
    pub strip_byte_counts: Vec<u64>,
    /// Whether the image is tiled rather than striped
    pub tiled: bool,
}

impl Directory {
    /// Creates a fresh directory with default field values
    pub fn new(number: usize) -> Self {
        Directory {
            number,
            offset: 0,
            fields: HashMap::new(),
            field_set: FieldSet::new(),
            strip_offsets: Vec::new(),
            strip_byte_counts: Vec::new(),
            tiled: false,
        }
    }

    /// Assigns a field value and marks it set
    pub fn set_field(&mut self, tag: u16, value: FieldValue) {
        self.field_set.set(tag);
        self.fields.insert(tag, value);
    }

    /// Removes a field
    pub fn unset_field(&mut self, tag: u16) {
        self.field_set.clear(tag);
        self.fields.remove(&tag);
    }

    /// Whether the tag has been assigned, per the field-set bitmap
    pub fn has_field(&self, tag: u16) -> bool {
        self.field_set.test(tag)
    }

    /// Fetches a field value, None when never assigned
    pub fn get_field(&self, tag: u16) -> Option<&FieldValue> {
        if !self.field_set.test(tag) {
            return None;
        }
        self.fields.get(&tag)
    }

    /// Tags currently set, in ascending order
    pub fn set_tags(&self) -> Vec<u16> {
        let mut tags: Vec<u16> = self.fields.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Field value widened to u64s, for offset/count style consumers
    pub fn tag_u64s(&self, tag: u16) -> Option<Vec<u64>> {
        self.get_field(tag)?.to_u64_vec()
    }

    /// First value of a field as u64
    pub fn tag_u64(&self, tag: u16) -> Option<u64> {
        self.get_field(tag)?.first_u64()
    }

    /// Releases decoded values and descriptor tables
    ///
    /// Called when the session advances past this directory; the
    /// shell can be reused for the next sub-image.
    pub fn reset(&mut self) {
        self.fields.clear();
        self.field_set.reset();
        self.strip_offsets.clear();
        self.strip_byte_counts.clear();
        self.tiled = false;
    }

    // Geometry accessors with the defaults the TIFF spec assigns
    // to absent fields.

    /// Image width in pixels
    pub fn width(&self) -> Option<u64> {
        self.tag_u64(tags::IMAGE_WIDTH)
    }

    /// Image height in pixels
    pub fn height(&self) -> Option<u64> {
        self.tag_u64(tags::IMAGE_LENGTH)
    }

    /// Image dimensions, when both tags are present
    pub fn dimensions(&self) -> Option<(u64, u64)> {
        Some((self.width()?, self.height()?))
    }

    /// Samples per pixel, default 1
    pub fn samples_per_pixel(&self) -> u64 {
        self.tag_u64(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Bits per sample, default 1
    pub fn bits_per_sample(&self) -> u64 {
        self.tag_u64(tags::BITS_PER_SAMPLE).unwrap_or(1)
    }

    /// Rows per strip, default "one strip covers the image"
    pub fn rows_per_strip(&self) -> u64 {
        self.tag_u64(tags::ROWS_PER_STRIP)
            .unwrap_or_else(|| self.height().unwrap_or(0))
    }

    /// Compression code, default uncompressed
    pub fn compression(&self) -> u64 {
        self.tag_u64(tags::COMPRESSION).unwrap_or(compression::NONE as u64)
    }

    /// Predictor code, default none
    pub fn predictor(&self) -> u16 {
        self.tag_u64(tags::PREDICTOR).unwrap_or(predictor::NONE as u64) as u16
    }

    /// Planar configuration, default chunky
    pub fn planar_configuration(&self) -> u16 {
        self.tag_u64(tags::PLANAR_CONFIGURATION)
            .unwrap_or(planar_config::CHUNKY as u64) as u16
    }

    /// Whether this is a reduced-resolution sub-image
    pub fn is_reduced_resolution(&self) -> bool {
        self.tag_u64(tags::NEW_SUBFILE_TYPE)
            .map(|v| v as u32 & new_subfile_type::REDUCED_RESOLUTION != 0)
            .unwrap_or(false)
    }

    /// Bytes in one decoded row of the striped/chunky layout
    ///
    /// Rows are byte-padded: partial trailing bits occupy a full byte.
    pub fn bytes_per_row(&self) -> u64 {
        let width = self.width().unwrap_or(0);
        (width * self.bits_per_sample() * self.samples_per_pixel() + 7) / 8
    }

    /// Number of strips implied by the geometry
    pub fn strip_count(&self) -> u64 {
        let height = self.height().unwrap_or(0);
        let rows = self.rows_per_strip();
        if rows == 0 {
            return 0;
        }
        (height + rows - 1) / rows
    }

    /// Rows covered by one specific strip (the last may be short)
    pub fn rows_in_strip(&self, strip: u64) -> u64 {
        let height = self.height().unwrap_or(0);
        let rows = self.rows_per_strip();
        let start = strip * rows;
        if start >= height {
            0
        } else {
            rows.min(height - start)
        }
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Directory #{} (offset: {})", self.number, self.offset)?;
        if let Some((width, height)) = self.dimensions() {
            writeln!(f, "  Dimensions: {}x{}", width, height)?;
        }
        writeln!(f, "  Samples per pixel: {}", self.samples_per_pixel())?;
        writeln!(
            f,
            "  Compression: {} ({})",
            self.compression(),
            names::compression_name(self.compression())
        )?;
        writeln!(f, "  Fields:")?;
        for tag in self.set_tags() {
            if let Some(value) = self.get_field(tag) {
                writeln!(f, "    {} [{}] x{}", tag, value.type_name(), value.count())?;
            }
        }
        Ok(())
    }
}
