//! Tag registry
//!
//! A sorted table mapping a numeric tag to its declared wire type,
//! expected count, and whether it is a built-in or extension field.
//! Pure lookup structure; no I/O. The reader consults it to decide
//! whether a file's declared count is plausible, the writer to pick
//! the emission order.

use lazy_static::lazy_static;

use crate::tiff::constants::{field_types, tags};

/// How many values the registry expects a tag to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedCount {
    /// Exactly this many values
    Fixed(u64),
    /// One value per sample (SamplesPerPixel)
    PerSample,
    /// No fixed expectation (strings, offset arrays, palettes)
    Variable,
}

impl ExpectedCount {
    /// Resolves the expectation to a concrete count, if it has one
    pub fn resolve(&self, samples_per_pixel: u64) -> Option<u64> {
        match self {
            ExpectedCount::Fixed(n) => Some(*n),
            ExpectedCount::PerSample => Some(samples_per_pixel),
            ExpectedCount::Variable => None,
        }
    }
}

/// Registry metadata for one tag
#[derive(Debug, Clone)]
pub struct TagInfo {
    /// Tag identifier
    pub tag: u16,
    /// Declared wire type
    pub field_type: u16,
    /// Expected value count
    pub count: ExpectedCount,
    /// Whether this tag ships with the library
    pub builtin: bool,
    /// Display name
    pub name: &'static str,
}

impl TagInfo {
    /// Shorthand constructor for extension tags
    pub fn extension(tag: u16, field_type: u16, count: ExpectedCount, name: &'static str) -> Self {
        TagInfo { tag, field_type, count, builtin: false, name }
    }
}

const fn builtin(tag: u16, field_type: u16, count: ExpectedCount, name: &'static str) -> TagInfo {
    TagInfo { tag, field_type, count, builtin: true, name }
}

lazy_static! {
    /// Built-in tag table, sorted ascending by tag
    static ref BUILTIN_TAGS: Vec<TagInfo> = vec![
        builtin(tags::NEW_SUBFILE_TYPE, field_types::LONG, ExpectedCount::Fixed(1), "NewSubfileType"),
        builtin(tags::SUBFILE_TYPE, field_types::SHORT, ExpectedCount::Fixed(1), "SubfileType"),
        builtin(tags::IMAGE_WIDTH, field_types::LONG, ExpectedCount::Fixed(1), "ImageWidth"),
        builtin(tags::IMAGE_LENGTH, field_types::LONG, ExpectedCount::Fixed(1), "ImageLength"),
        builtin(tags::BITS_PER_SAMPLE, field_types::SHORT, ExpectedCount::PerSample, "BitsPerSample"),
        builtin(tags::COMPRESSION, field_types::SHORT, ExpectedCount::Fixed(1), "Compression"),
        builtin(tags::PHOTOMETRIC_INTERPRETATION, field_types::SHORT, ExpectedCount::Fixed(1), "PhotometricInterpretation"),
        builtin(tags::FILL_ORDER, field_types::SHORT, ExpectedCount::Fixed(1), "FillOrder"),
        builtin(tags::STRIP_OFFSETS, field_types::LONG, ExpectedCount::Variable, "StripOffsets"),
        builtin(tags::ORIENTATION, field_types::SHORT, ExpectedCount::Fixed(1), "Orientation"),
        builtin(tags::SAMPLES_PER_PIXEL, field_types::SHORT, ExpectedCount::Fixed(1), "SamplesPerPixel"),
        builtin(tags::ROWS_PER_STRIP, field_types::LONG, ExpectedCount::Fixed(1), "RowsPerStrip"),
        builtin(tags::STRIP_BYTE_COUNTS, field_types::LONG, ExpectedCount::Variable, "StripByteCounts"),
        builtin(tags::MIN_SAMPLE_VALUE, field_types::SHORT, ExpectedCount::PerSample, "MinSampleValue"),
        builtin(tags::MAX_SAMPLE_VALUE, field_types::SHORT, ExpectedCount::PerSample, "MaxSampleValue"),
        builtin(tags::X_RESOLUTION, field_types::RATIONAL, ExpectedCount::Fixed(1), "XResolution"),
        builtin(tags::Y_RESOLUTION, field_types::RATIONAL, ExpectedCount::Fixed(1), "YResolution"),
        builtin(tags::PLANAR_CONFIGURATION, field_types::SHORT, ExpectedCount::Fixed(1), "PlanarConfiguration"),
        builtin(tags::RESOLUTION_UNIT, field_types::SHORT, ExpectedCount::Fixed(1), "ResolutionUnit"),
        builtin(tags::TRANSFER_FUNCTION, field_types::SHORT, ExpectedCount::Variable, "TransferFunction"),
        builtin(tags::SOFTWARE, field_types::ASCII, ExpectedCount::Variable, "Software"),
        builtin(tags::DATE_TIME, field_types::ASCII, ExpectedCount::Fixed(20), "DateTime"),
        builtin(tags::ARTIST, field_types::ASCII, ExpectedCount::Variable, "Artist"),
        builtin(tags::HOST_COMPUTER, field_types::ASCII, ExpectedCount::Variable, "HostComputer"),
        builtin(tags::PREDICTOR, field_types::SHORT, ExpectedCount::Fixed(1), "Predictor"),
        builtin(tags::COLOR_MAP, field_types::SHORT, ExpectedCount::Variable, "ColorMap"),
        builtin(tags::TILE_WIDTH, field_types::LONG, ExpectedCount::Fixed(1), "TileWidth"),
        builtin(tags::TILE_LENGTH, field_types::LONG, ExpectedCount::Fixed(1), "TileLength"),
        builtin(tags::TILE_OFFSETS, field_types::LONG, ExpectedCount::Variable, "TileOffsets"),
        builtin(tags::TILE_BYTE_COUNTS, field_types::LONG, ExpectedCount::Variable, "TileByteCounts"),
        builtin(tags::EXTRA_SAMPLES, field_types::SHORT, ExpectedCount::Variable, "ExtraSamples"),
        builtin(tags::SAMPLE_FORMAT, field_types::SHORT, ExpectedCount::PerSample, "SampleFormat"),
        builtin(tags::SMIN_SAMPLE_VALUE, field_types::DOUBLE, ExpectedCount::PerSample, "SMinSampleValue"),
        builtin(tags::SMAX_SAMPLE_VALUE, field_types::DOUBLE, ExpectedCount::PerSample, "SMaxSampleValue"),
        builtin(tags::REFERENCE_BLACK_WHITE, field_types::RATIONAL, ExpectedCount::Fixed(6), "ReferenceBlackWhite"),
        builtin(tags::COPYRIGHT, field_types::ASCII, ExpectedCount::Variable, "Copyright"),
        builtin(tags::SUBJECT_DISTANCE, field_types::RATIONAL, ExpectedCount::Fixed(1), "SubjectDistance"),
    ];
}

/// Sorted tag metadata table
///
/// Each session owns its own registry so a tag extender registered on
/// one session never leaks into another.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    entries: Vec<TagInfo>,
}

impl TagRegistry {
    /// Creates a registry holding only the built-in tags
    pub fn builtin() -> Self {
        TagRegistry { entries: BUILTIN_TAGS.clone() }
    }

    /// Creates an empty registry
    pub fn empty() -> Self {
        TagRegistry { entries: Vec::new() }
    }

    /// Looks up a tag by number
    pub fn lookup(&self, tag: u16) -> Option<&TagInfo> {
        self.entries
            .binary_search_by_key(&tag, |info| info.tag)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Returns true if the tag is known to this registry
    pub fn contains(&self, tag: u16) -> bool {
        self.lookup(tag).is_some()
    }

    /// Registers a tag, replacing any previous definition
    ///
    /// Keeps the table sorted so lookups stay a binary search.
    pub fn register(&mut self, info: TagInfo) {
        match self.entries.binary_search_by_key(&info.tag, |e| e.tag) {
            Ok(idx) => self.entries[idx] = info,
            Err(idx) => self.entries.insert(idx, info),
        }
    }

    /// Display name for a tag, "Unknown" when unregistered
    pub fn tag_name(&self, tag: u16) -> &'static str {
        self.lookup(tag).map(|info| info.name).unwrap_or("Unknown")
    }

    /// Number of registered tags
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no tags are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates registered tags in ascending tag order
    pub fn iter(&self) -> impl Iterator<Item = &TagInfo> {
        self.entries.iter()
    }
}

/// Callback that adds application-specific tags to a session registry
///
/// Invoked once per new directory setup, mirroring how private-tag
/// extension hooks work in existing TIFF libraries. The slot lives on
/// the session object, not in process-wide state.
pub type TagExtender = Box<dyn Fn(&mut TagRegistry) + Send + Sync>;
