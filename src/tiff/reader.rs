//! TIFF directory reader
//!
//! This module implements the TIFF/BigTIFF directory reader. It walks
//! the IFD chain, resolves inline-vs-indirect storage per entry,
//! widens typed arrays, defends against directory cycles, and repairs
//! a small set of known-corrupt byte-count patterns.
//!
//! Field-local problems are recovered: a field that cannot be decoded
//! is dropped with a warning so the rest of the directory stays
//! usable. Only structural failures (unreadable header, truncated
//! entry table) abort the whole read.

use log::{debug, info};
use std::collections::HashSet;
use std::io::{ErrorKind, SeekFrom};

use crate::codec::factory::CodecFactory;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{compression, field_types, tags};
use crate::tiff::directory::{Directory, IFD};
use crate::tiff::entry::{field_type_width, IFDEntry};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::format::TiffFormat;
use crate::tiff::header;
use crate::tiff::registry::{TagExtender, TagRegistry};
use crate::tiff::types::Tiff;
use crate::tiff::validation;
use crate::tiff::value::FieldValue;
use crate::tiff::warnings::{WarningSink, LOG_SINK};
use crate::utils::string_utils;

/// Reader for TIFF and BigTIFF directories
///
/// One reader serves one open file: it owns the detected byte order,
/// the format mode, the session tag registry and the cycle-detection
/// state. Concurrency across files is the caller's job, one reader
/// per file.
pub struct TiffReader<'a> {
    /// Byte order handler detected from the header
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Format mode detected from the header
    format: TiffFormat,
    /// Session tag registry: built-ins plus extensions
    registry: TagRegistry,
    /// Extension callback, run once per directory setup
    tag_extender: Option<TagExtender>,
    /// Destination for recoverable diagnostics
    sink: &'a dyn WarningSink,
}

impl<'a> TiffReader<'a> {
    /// Creates a reader that reports warnings through the log facade
    pub fn new() -> TiffReader<'static> {
        TiffReader {
            byte_order_handler: None,
            format: TiffFormat::Classic,
            registry: TagRegistry::builtin(),
            tag_extender: None,
            sink: &LOG_SINK,
        }
    }

    /// Creates a reader with a custom warning sink
    pub fn with_sink(sink: &'a dyn WarningSink) -> Self {
        TiffReader {
            byte_order_handler: None,
            format: TiffFormat::Classic,
            registry: TagRegistry::builtin(),
            tag_extender: None,
            sink,
        }
    }

    /// Installs the custom-tag extension callback
    ///
    /// The callback runs once per new directory setup and may register
    /// private tags on the session registry.
    pub fn set_tag_extender(&mut self, extender: TagExtender) {
        self.tag_extender = Some(extender);
    }

    /// The detected format mode
    pub fn format(&self) -> TiffFormat {
        self.format
    }

    /// The detected byte order, once a header has been read
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order_handler.as_ref().map(|h| h.order())
    }

    /// The session tag registry
    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Reads a whole TIFF file from the given reader
    ///
    /// Detects byte order and format, then reads every directory in
    /// the chain. The chain stops early, without error, at the first
    /// repeated offset: self-referencing files are a known attack and
    /// truncation loses nothing that was not already read.
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<Tiff> {
        debug!("TiffReader::read starting");

        self.byte_order_handler = Some(header::detect_byte_order(reader)?);
        self.format = header::detect_format(reader, self.handler()?)?;

        let first_offset = header::read_first_ifd_offset(reader, self.format, self.handler()?)?;
        debug!("First IFD offset: {}", first_offset);

        let file_size = validation::stream_length(reader)?;
        validation::validate_ifd_offset(first_offset, file_size)?;

        let byte_order = self.handler()?.order();
        let mut tiff = Tiff::new(self.format, byte_order);

        let mut seen_offsets: HashSet<u64> = HashSet::new();
        let mut offset = first_offset;
        let mut number = 0usize;

        while offset != 0 {
            let file_size = validation::stream_length(reader)?;
            if offset >= file_size {
                self.sink.warning(&format!(
                    "IFD offset {} exceeds file size {}, stopping chain",
                    offset, file_size
                ));
                break;
            }

            if !seen_offsets.insert(offset) {
                self.sink.warning(&format!(
                    "IFD offset {} repeats an earlier directory, stopping chain",
                    offset
                ));
                break;
            }

            let ifd = self.read_ifd(reader, offset, number)?;
            let next = ifd.next_offset;
            let directory = self.decode_directory(reader, &ifd)?;
            tiff.directories.push(directory);

            if next != 0 && (next >= file_size || next < 8) {
                self.sink.warning(&format!("Invalid next IFD offset: {}, stopping chain", next));
                break;
            }

            offset = next;
            number += 1;
        }

        info!("Read {} directories", tiff.directories.len());
        Ok(tiff)
    }

    /// Reads one directory: raw entry table plus decoded values
    pub fn read_directory(
        &mut self,
        reader: &mut dyn SeekableReader,
        offset: u64,
        number: usize,
    ) -> TiffResult<Directory> {
        let ifd = self.read_ifd(reader, offset, number)?;
        self.decode_directory(reader, &ifd)
    }

    /// Reads the raw entry table of one IFD
    pub fn read_ifd(
        &self,
        reader: &mut dyn SeekableReader,
        offset: u64,
        number: usize,
    ) -> TiffResult<IFD> {
        read_ifd_at(reader, self.handler()?, self.format, offset, number)
    }

    /// Decodes a raw IFD into typed field values
    ///
    /// Runs the tag extender, resolves each entry against the registry,
    /// applies the special-case fetches, and repairs the strip
    /// byte-count table when the file's own is missing or implausible.
    pub fn decode_directory(
        &mut self,
        reader: &mut dyn SeekableReader,
        ifd: &IFD,
    ) -> TiffResult<Directory> {
        if let Some(extender) = &self.tag_extender {
            extender(&mut self.registry);
        }

        let mut dir = Directory::new(ifd.number);
        dir.offset = ifd.offset;

        // SamplesPerPixel first: per-sample count expectations need it.
        let samples_per_pixel = match ifd.get_entry(tags::SAMPLES_PER_PIXEL) {
            Some(entry) => match self.decode_entry_value(reader, entry, entry.count) {
                Ok(value) => value.first_u64().unwrap_or(1),
                Err(_) => 1,
            },
            None => 1,
        };

        let mut seen_tags: HashSet<u16> = HashSet::new();
        let mut previous_tag: Option<u16> = None;

        for entry in &ifd.entries {
            if !seen_tags.insert(entry.tag) {
                self.sink.tag_warning(entry.tag, "duplicate tag in directory, keeping the first");
                continue;
            }
            if let Some(prev) = previous_tag {
                if entry.tag < prev {
                    self.sink.tag_warning(entry.tag, "directory entries out of tag order");
                }
            }
            previous_tag = Some(entry.tag);

            match entry.tag {
                tags::STRIP_OFFSETS | tags::TILE_OFFSETS => {
                    match self.fetch_u64_array(reader, entry) {
                        Ok(values) => {
                            dir.tiled = entry.tag == tags::TILE_OFFSETS;
                            dir.strip_offsets = values;
                        }
                        Err(e) => self.drop_field(entry.tag, &e),
                    }
                }
                tags::STRIP_BYTE_COUNTS | tags::TILE_BYTE_COUNTS => {
                    match self.fetch_u64_array(reader, entry) {
                        Ok(values) => dir.strip_byte_counts = values,
                        Err(e) => self.drop_field(entry.tag, &e),
                    }
                }
                tags::REFERENCE_BLACK_WHITE => {
                    match self.fetch_reference_black_white(reader, entry) {
                        Ok(value) => dir.set_field(entry.tag, value),
                        Err(e) => self.drop_field(entry.tag, &e),
                    }
                }
                tags::SUBJECT_DISTANCE => match self.fetch_subject_distance(reader, entry) {
                    Ok(value) => dir.set_field(entry.tag, value),
                    Err(e) => self.drop_field(entry.tag, &e),
                },
                tags::MIN_SAMPLE_VALUE | tags::MAX_SAMPLE_VALUE => {
                    match self.fetch_per_sample_scalar(reader, entry) {
                        Ok(value) => dir.set_field(entry.tag, value),
                        Err(e) => self.drop_field(entry.tag, &e),
                    }
                }
                _ => {
                    if let Some((value, tag)) =
                        self.fetch_generic(reader, entry, samples_per_pixel)
                    {
                        dir.set_field(tag, value);
                    }
                }
            }
        }

        if !dir.strip_offsets.is_empty() {
            self.check_strip_byte_counts(reader, ifd, &mut dir)?;
        }

        Ok(dir)
    }

    /// Generic fetch: registry count policy, decode, widening
    ///
    /// Returns None when the field is dropped. Custom tags that fail
    /// to decode downgrade to warnings because readers must tolerate
    /// unknown private data.
    fn fetch_generic(
        &self,
        reader: &mut dyn SeekableReader,
        entry: &IFDEntry,
        samples_per_pixel: u64,
    ) -> Option<(FieldValue, u16)> {
        let info = self.registry.lookup(entry.tag);

        let mut count = entry.count;
        if let Some(info) = info {
            if let Some(expected) = info.count.resolve(samples_per_pixel) {
                if entry.count > expected {
                    self.sink.tag_warning(
                        entry.tag,
                        &format!(
                            "declares {} values, expected {}; extra values discarded",
                            entry.count, expected
                        ),
                    );
                    count = expected;
                } else if entry.count < expected {
                    self.sink.tag_warning(
                        entry.tag,
                        &format!(
                            "declares {} values, expected {}; field rejected",
                            entry.count, expected
                        ),
                    );
                    return None;
                }
            }
        }

        match self.decode_entry_value(reader, entry, count) {
            Ok(value) => {
                let widened = match info {
                    Some(info) => widen_value(value, info.field_type),
                    None => value,
                };
                Some((widened, entry.tag))
            }
            Err(e) => {
                self.drop_field(entry.tag, &e);
                None
            }
        }
    }

    fn drop_field(&self, tag: u16, error: &TiffError) {
        self.sink.tag_warning(tag, &format!("field dropped: {}", error));
    }

    /// Decodes an entry's value, reading `count` values
    ///
    /// `count` may be lower than the entry's declared count when the
    /// registry policy trims the read. Inline values decode from the
    /// slot by order-aware shifting; out-of-line values stream from
    /// the entry's offset through the byte order handler.
    pub fn decode_entry_value(
        &self,
        reader: &mut dyn SeekableReader,
        entry: &IFDEntry,
        count: u64,
    ) -> TiffResult<FieldValue> {
        let width = field_type_width(entry.field_type)
            .ok_or(TiffError::UnsupportedFieldType(entry.field_type))?;
        count
            .checked_mul(width)
            .ok_or_else(|| TiffError::MalformedEntry(entry.tag, "count overflows".to_string()))?;

        let handler = self.handler()?;

        // Placement follows the declared count: a trimmed read of an
        // out-of-line entry still comes from the data region.
        if entry.is_value_inline(self.format) {
            self.decode_inline_value(entry, count)
        } else {
            reader.seek(SeekFrom::Start(entry.value_offset))?;
            self.read_value_array(reader, handler, entry.tag, entry.field_type, count)
        }
    }

    /// Decodes inline values from the slot integer by shifting
    fn decode_inline_value(&self, entry: &IFDEntry, count: u64) -> TiffResult<FieldValue> {
        let order = self.handler()?.order();
        let format = self.format;
        let pick = |i: u64, w: u64| entry.inline_value(i, w, order, format);

        let value = match entry.field_type {
            field_types::BYTE => {
                FieldValue::Byte((0..count).map(|i| pick(i, 1) as u8).collect())
            }
            field_types::UNDEFINED => {
                FieldValue::Undefined((0..count).map(|i| pick(i, 1) as u8).collect())
            }
            field_types::SBYTE => {
                FieldValue::SByte((0..count).map(|i| pick(i, 1) as u8 as i8).collect())
            }
            field_types::ASCII => {
                let mut bytes: Vec<u8> = (0..count).map(|i| pick(i, 1) as u8).collect();
                string_utils::trim_trailing_nulls(&mut bytes);
                FieldValue::Ascii(String::from_utf8_lossy(&bytes).into_owned())
            }
            field_types::SHORT => {
                FieldValue::Short((0..count).map(|i| pick(i, 2) as u16).collect())
            }
            field_types::SSHORT => {
                FieldValue::SShort((0..count).map(|i| pick(i, 2) as u16 as i16).collect())
            }
            field_types::LONG => {
                FieldValue::Long((0..count).map(|i| pick(i, 4) as u32).collect())
            }
            field_types::SLONG => {
                FieldValue::SLong((0..count).map(|i| pick(i, 4) as u32 as i32).collect())
            }
            field_types::IFD => {
                FieldValue::Ifd((0..count).map(|i| pick(i, 4) as u32).collect())
            }
            field_types::FLOAT => {
                FieldValue::Float((0..count).map(|i| f32::from_bits(pick(i, 4) as u32)).collect())
            }
            // The 8-byte types only fit inline in BigTIFF, count 1.
            field_types::RATIONAL => FieldValue::Rational(
                (0..count).map(|i| (pick(2 * i, 4) as u32, pick(2 * i + 1, 4) as u32)).collect(),
            ),
            field_types::SRATIONAL => FieldValue::SRational(
                (0..count)
                    .map(|i| (pick(2 * i, 4) as u32 as i32, pick(2 * i + 1, 4) as u32 as i32))
                    .collect(),
            ),
            field_types::DOUBLE => {
                FieldValue::Double((0..count).map(|i| f64::from_bits(pick(i, 8))).collect())
            }
            field_types::LONG8 => FieldValue::Long8((0..count).map(|i| pick(i, 8)).collect()),
            field_types::SLONG8 => {
                FieldValue::SLong8((0..count).map(|i| pick(i, 8) as i64).collect())
            }
            field_types::IFD8 => FieldValue::Ifd8((0..count).map(|i| pick(i, 8)).collect()),
            other => return Err(TiffError::UnsupportedFieldType(other)),
        };

        Ok(value)
    }

    /// Streams an out-of-line typed array through the handler
    fn read_value_array(
        &self,
        reader: &mut dyn SeekableReader,
        handler: &dyn ByteOrderHandler,
        tag: u16,
        field_type: u16,
        count: u64,
    ) -> TiffResult<FieldValue> {
        let n = count as usize;
        let value = match field_type {
            field_types::BYTE | field_types::UNDEFINED => {
                let mut buffer = vec![0u8; n];
                reader.read_exact(&mut buffer).map_err(truncated(tag))?;
                if field_type == field_types::BYTE {
                    FieldValue::Byte(buffer)
                } else {
                    FieldValue::Undefined(buffer)
                }
            }
            field_types::SBYTE => {
                let mut buffer = vec![0u8; n];
                reader.read_exact(&mut buffer).map_err(truncated(tag))?;
                FieldValue::SByte(buffer.into_iter().map(|b| b as i8).collect())
            }
            field_types::ASCII => {
                let mut buffer = vec![0u8; n];
                reader.read_exact(&mut buffer).map_err(truncated(tag))?;
                string_utils::trim_trailing_nulls(&mut buffer);
                FieldValue::Ascii(String::from_utf8_lossy(&buffer).into_owned())
            }
            field_types::SHORT => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_u16(reader).map_err(truncated(tag))?);
                }
                FieldValue::Short(values)
            }
            field_types::SSHORT => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_u16(reader).map_err(truncated(tag))? as i16);
                }
                FieldValue::SShort(values)
            }
            field_types::LONG => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_u32(reader).map_err(truncated(tag))?);
                }
                FieldValue::Long(values)
            }
            field_types::SLONG => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_u32(reader).map_err(truncated(tag))? as i32);
                }
                FieldValue::SLong(values)
            }
            field_types::IFD => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_u32(reader).map_err(truncated(tag))?);
                }
                FieldValue::Ifd(values)
            }
            field_types::RATIONAL => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_rational(reader).map_err(truncated(tag))?);
                }
                FieldValue::Rational(values)
            }
            field_types::SRATIONAL => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_srational(reader).map_err(truncated(tag))?);
                }
                FieldValue::SRational(values)
            }
            field_types::FLOAT => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_f32(reader).map_err(truncated(tag))?);
                }
                FieldValue::Float(values)
            }
            field_types::DOUBLE => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_f64(reader).map_err(truncated(tag))?);
                }
                FieldValue::Double(values)
            }
            field_types::LONG8 => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_u64(reader).map_err(truncated(tag))?);
                }
                FieldValue::Long8(values)
            }
            field_types::SLONG8 => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_u64(reader).map_err(truncated(tag))? as i64);
                }
                FieldValue::SLong8(values)
            }
            field_types::IFD8 => {
                let mut values = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(handler.read_u64(reader).map_err(truncated(tag))?);
                }
                FieldValue::Ifd8(values)
            }
            other => return Err(TiffError::UnsupportedFieldType(other)),
        };

        Ok(value)
    }

    /// Fetches any integer-typed array widened to u64 values
    ///
    /// Strip/tile offset and byte-count tables appear as SHORT, LONG
    /// or LONG8 in the wild; consumers only ever want u64s.
    fn fetch_u64_array(
        &self,
        reader: &mut dyn SeekableReader,
        entry: &IFDEntry,
    ) -> TiffResult<Vec<u64>> {
        let value = self.decode_entry_value(reader, entry, entry.count)?;
        value.to_u64_vec().ok_or_else(|| {
            TiffError::MalformedEntry(entry.tag, format!("{} is not an integer array", value.type_name()))
        })
    }

    /// Fetches ReferenceBlackWhite, tolerating the LONG vendor bug
    ///
    /// The field is RATIONAL by the book but some writers emitted
    /// LONG. Try the rational reading first: a true black/white
    /// reference always contains values above 1, so if every
    /// rational-decoded value is <= 1 the data must really be LONGs.
    fn fetch_reference_black_white(
        &self,
        reader: &mut dyn SeekableReader,
        entry: &IFDEntry,
    ) -> TiffResult<FieldValue> {
        if entry.field_type != field_types::LONG {
            let value = self.decode_entry_value(reader, entry, entry.count)?;
            let floats = value.to_f64_vec().ok_or_else(|| {
                TiffError::MalformedEntry(entry.tag, format!("{} is not numeric", value.type_name()))
            })?;
            return Ok(FieldValue::Double(floats));
        }

        let longs = self.fetch_u64_array(reader, entry)?;
        let rational_view: Vec<f64> = longs
            .chunks_exact(2)
            .map(|pair| {
                if pair[1] == 0 {
                    f64::NAN
                } else {
                    pair[0] as f64 / pair[1] as f64
                }
            })
            .collect();

        let all_small = !rational_view.is_empty()
            && rational_view.iter().all(|&v| v.is_nan() || v <= 1.0);

        if all_small {
            self.sink.tag_warning(entry.tag, "stored as LONG, reading values directly");
            Ok(FieldValue::Double(longs.into_iter().map(|v| v as f64).collect()))
        } else {
            Ok(FieldValue::Double(rational_view))
        }
    }

    /// Fetches SubjectDistance, tolerating the signed-rational form
    ///
    /// A numerator of 0xFFFFFFFF encodes "unknown distance" and maps
    /// to -1 the way EXIF consumers expect.
    fn fetch_subject_distance(
        &self,
        reader: &mut dyn SeekableReader,
        entry: &IFDEntry,
    ) -> TiffResult<FieldValue> {
        let value = self.decode_entry_value(reader, entry, 1)?;
        let distance = match &value {
            FieldValue::Rational(pairs) => match pairs.first() {
                Some(&(n, _)) if n == u32::MAX => -1.0,
                Some(&(n, d)) if d != 0 => n as f64 / d as f64,
                _ => f64::NAN,
            },
            FieldValue::SRational(pairs) => match pairs.first() {
                Some(&(n, d)) if d != 0 => n as f64 / d as f64,
                _ => f64::NAN,
            },
            other => other.first_f64().unwrap_or(f64::NAN),
        };
        Ok(FieldValue::Double(vec![distance]))
    }

    /// Fetches a per-sample field reduced to one scalar
    ///
    /// Min/Max sample values are declared once per sample but this
    /// library keeps a single value; differing per-sample values
    /// cannot be represented and the first one wins, with a warning.
    fn fetch_per_sample_scalar(
        &self,
        reader: &mut dyn SeekableReader,
        entry: &IFDEntry,
    ) -> TiffResult<FieldValue> {
        let values = self.fetch_u64_array(reader, entry)?;
        let first = *values
            .first()
            .ok_or_else(|| TiffError::MalformedEntry(entry.tag, "empty array".to_string()))?;
        if values.iter().any(|&v| v != first) {
            self.sink.tag_warning(entry.tag, "per-sample values differ, keeping the first");
        }
        Ok(FieldValue::Short(vec![first as u16]))
    }

    /// Validates the strip byte-count table and repairs it if needed
    ///
    /// A missing table, a zero count with a nonzero offset, a count
    /// running past end-of-file, or an uncompressed count below the
    /// geometric minimum all trigger estimation. The heuristic is
    /// deliberately lenient; real files depend on it.
    fn check_strip_byte_counts(
        &self,
        reader: &mut dyn SeekableReader,
        ifd: &IFD,
        dir: &mut Directory,
    ) -> TiffResult<()> {
        let file_size = validation::stream_length(reader)?;

        if !self.strip_byte_counts_implausible(dir, file_size) {
            return Ok(());
        }

        self.sink.tag_warning(
            if dir.tiled { tags::TILE_BYTE_COUNTS } else { tags::STRIP_BYTE_COUNTS },
            "byte-count table missing or inconsistent, estimating",
        );
        self.estimate_strip_byte_counts(ifd, dir, file_size)
    }

    fn strip_byte_counts_implausible(&self, dir: &Directory, file_size: u64) -> bool {
        if dir.strip_byte_counts.len() != dir.strip_offsets.len() {
            return true;
        }

        for (i, (&count, &offset)) in dir
            .strip_byte_counts
            .iter()
            .zip(dir.strip_offsets.iter())
            .enumerate()
        {
            if count == 0 && offset != 0 {
                return true;
            }
            if offset.checked_add(count).map_or(true, |end| end > file_size) {
                return true;
            }
            if dir.compression() == compression::NONE as u64 && !dir.tiled {
                let required = dir.bytes_per_row() * dir.rows_in_strip(i as u64);
                if count < required {
                    return true;
                }
            }
        }

        false
    }

    /// Synthesizes the byte-count table
    ///
    /// Uncompressed data is sized exactly from geometry. Compressed
    /// strips get the file space left after all known tag data split
    /// evenly, with the last strip trimmed to the real end-of-file.
    fn estimate_strip_byte_counts(
        &self,
        ifd: &IFD,
        dir: &mut Directory,
        file_size: u64,
    ) -> TiffResult<()> {
        let strips = dir.strip_offsets.len();
        let codec = CodecFactory::create_raw(dir.compression());
        let row_bytes = dir.bytes_per_row() as usize;

        let mut counts = Vec::with_capacity(strips);

        let exact = !dir.tiled
            && codec
                .estimated_unit_size(row_bytes, dir.rows_per_strip() as usize)
                .is_some();

        if exact {
            for strip in 0..strips {
                let rows = dir.rows_in_strip(strip as u64) as usize;
                let size = codec
                    .estimated_unit_size(row_bytes, rows)
                    .unwrap_or(row_bytes * rows);
                counts.push(size as u64);
            }
        } else {
            // Space consumed by structures we know about: header,
            // this entry table, and every out-of-line value region.
            let mut space = self.format.header_size()
                + self.format.directory_size(ifd.entries.len() as u64);
            for entry in &ifd.entries {
                if !entry.is_value_inline(self.format) {
                    if let Some(size) = entry.data_size() {
                        space = space.saturating_add(size);
                    }
                }
            }

            let remaining = file_size.saturating_sub(space);
            let per_strip = if strips > 0 { remaining / strips as u64 } else { 0 };
            counts = vec![per_strip; strips];

            if let (Some(&last_offset), Some(last_count)) =
                (dir.strip_offsets.last(), counts.last_mut())
            {
                if last_offset.checked_add(*last_count).map_or(true, |end| end > file_size) {
                    *last_count = file_size.saturating_sub(last_offset);
                }
            }
        }

        dir.strip_byte_counts = counts;
        Ok(())
    }
}

impl Default for TiffReader<'static> {
    fn default() -> Self {
        TiffReader::new()
    }
}

/// Maps an unexpected-EOF into the truncated-read error
fn truncated(tag: u16) -> impl Fn(std::io::Error) -> TiffError {
    move |e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            TiffError::MalformedEntry(tag, "value region extends past end of file".to_string())
        } else {
            TiffError::IoError(e)
        }
    }
}

/// Widens a decoded value when the registry expects a wider type
///
/// The classic case: files store SHORT where the field is declared
/// LONG. The reverse direction never widens.
fn widen_value(value: FieldValue, expected_type: u16) -> FieldValue {
    match (value, expected_type) {
        (FieldValue::Short(v), field_types::LONG) => {
            FieldValue::Long(v.into_iter().map(|x| x as u32).collect())
        }
        (FieldValue::Short(v), field_types::LONG8) => {
            FieldValue::Long8(v.into_iter().map(|x| x as u64).collect())
        }
        (FieldValue::Long(v), field_types::LONG8) => {
            FieldValue::Long8(v.into_iter().map(|x| x as u64).collect())
        }
        (value, _) => value,
    }
}

/// Reads the raw entry table of one IFD at the given offset
///
/// Standalone so the writer's BigTIFF upgrade can re-read classic
/// directories without constructing a full reader session.
pub(crate) fn read_ifd_at(
    reader: &mut dyn SeekableReader,
    handler: &dyn ByteOrderHandler,
    format: TiffFormat,
    offset: u64,
    number: usize,
) -> TiffResult<IFD> {
    reader.seek(SeekFrom::Start(offset))?;

    let entry_count = match format {
        TiffFormat::Big => handler.read_u64(reader).map_err(structural(offset))?,
        TiffFormat::Classic => handler.read_u16(reader).map_err(structural(offset))? as u64,
    };
    debug!("IFD at {}: {} entries", offset, entry_count);

    let file_size = validation::stream_length(reader)?;
    let table_size = entry_count
        .checked_mul(format.entry_size())
        .and_then(|t| t.checked_add(format.count_field_size() + format.offset_size()));
    match table_size {
        Some(size) if offset.checked_add(size).map_or(false, |end| end <= file_size) => {}
        _ => return Err(TiffError::TruncatedRead(offset)),
    }

    let mut ifd = IFD::new(number, offset);
    for _ in 0..entry_count {
        let entry = read_ifd_entry(reader, handler, format).map_err(|e| match e {
            TiffError::IoError(io) if io.kind() == ErrorKind::UnexpectedEof => {
                TiffError::TruncatedRead(offset)
            }
            other => other,
        })?;
        ifd.add_entry(entry);
    }

    ifd.next_offset = match format {
        TiffFormat::Big => handler.read_u64(reader).map_err(structural(offset))?,
        TiffFormat::Classic => handler.read_u32(reader).map_err(structural(offset))? as u64,
    };

    Ok(ifd)
}

fn structural(offset: u64) -> impl Fn(std::io::Error) -> TiffError {
    move |e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            TiffError::TruncatedRead(offset)
        } else {
            TiffError::IoError(e)
        }
    }
}

/// Reads a single fixed-size directory entry
fn read_ifd_entry(
    reader: &mut dyn SeekableReader,
    handler: &dyn ByteOrderHandler,
    format: TiffFormat,
) -> TiffResult<IFDEntry> {
    let tag = handler.read_u16(reader)?;
    let field_type = handler.read_u16(reader)?;
    let count = match format {
        TiffFormat::Big => handler.read_u64(reader)?,
        TiffFormat::Classic => handler.read_u32(reader)? as u64,
    };

    let mut slot = [0u8; 8];
    let slot_size = format.inline_size() as usize;
    reader.read_exact(&mut slot[..slot_size])?;

    let value_offset = slot_to_u64(&slot[..slot_size], handler.order());

    Ok(IFDEntry::new(tag, field_type, count, value_offset, slot))
}

/// Decodes an offset slot into its integer value in the given order
pub(crate) fn slot_to_u64(slot: &[u8], order: ByteOrder) -> u64 {
    let mut value = 0u64;
    match order {
        ByteOrder::LittleEndian => {
            for (i, &b) in slot.iter().enumerate() {
                value |= (b as u64) << (8 * i);
            }
        }
        ByteOrder::BigEndian => {
            for &b in slot {
                value = (value << 8) | b as u64;
            }
        }
    }
    value
}
