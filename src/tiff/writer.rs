//! TIFF directory writer
//!
//! The inverse of the reader: given an in-memory directory, choose
//! inline vs indirect placement per field, emit entries in tag-sorted
//! order, and link the directory into the file's chain. When a classic
//! file accumulates offsets past the 32-bit range the writer upgrades
//! the whole file to BigTIFF: every previously written directory is
//! re-read at classic widths and re-emitted widened.
//!
//! Each directory is staged fully in memory before any byte reaches
//! the stream, and the chain pointer is repointed only after the new
//! table exists. That keeps "no reader observes a half-written
//! directory" as true as the format allows; a crash between chain
//! repointings during an upgrade leaves a stale-but-readable file,
//! which is the format's own limitation.

use log::{debug, info};
use std::io::{Read, Seek, SeekFrom, Write};

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableStream;
use crate::tiff::constants::tags;
use crate::tiff::directory::{Directory, IFD};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::format::TiffFormat;
use crate::tiff::header;
use crate::tiff::reader;
use crate::tiff::registry::TagRegistry;
use crate::tiff::value::FieldValue;
use crate::tiff::warnings::{WarningSink, LOG_SINK};
use crate::utils::write_utils;

/// Bookkeeping for one directory already present in the output
#[derive(Debug, Clone, Copy)]
struct WrittenDir {
    /// Offset of the entry table
    offset: u64,
    /// Position of the trailing next-directory pointer
    next_ptr_pos: u64,
}

/// A fully staged directory, not yet written
struct StagedDirectory {
    /// Entry count + entries + zeroed next pointer
    table: Vec<u8>,
    /// Out-of-line value regions and their target offsets
    blobs: Vec<(u64, Vec<u8>)>,
    /// Where the next pointer will sit once the table is written
    next_ptr_pos: u64,
    /// First free byte after the staged data
    end: u64,
}

/// Writer for TIFF and BigTIFF directories
///
/// One writer serves one output file. The byte order and format are
/// fixed at construction, except for the one-way classic-to-BigTIFF
/// upgrade.
pub struct TiffWriter<'a> {
    /// Handler for the declared byte order
    handler: Box<dyn ByteOrderHandler>,
    /// Current format mode
    format: TiffFormat,
    /// Whether the classic->big upgrade may run
    allow_upgrade: bool,
    /// Whether `create` has emitted the header
    header_written: bool,
    /// Directories already in the file, chain order
    written: Vec<WrittenDir>,
    /// First free byte in the output
    next_free: u64,
    /// Session tag registry, used for diagnostics
    registry: TagRegistry,
    /// Destination for recoverable diagnostics
    sink: &'a dyn WarningSink,
}

impl<'a> TiffWriter<'a> {
    /// Creates a writer for the given byte order and format
    pub fn new(byte_order: ByteOrder, format: TiffFormat) -> TiffWriter<'static> {
        TiffWriter {
            handler: byte_order.create_handler(),
            format,
            allow_upgrade: true,
            header_written: false,
            written: Vec::new(),
            next_free: format.header_size(),
            registry: TagRegistry::builtin(),
            sink: &LOG_SINK,
        }
    }

    /// Creates a writer with a custom warning sink
    pub fn with_sink(byte_order: ByteOrder, format: TiffFormat, sink: &'a dyn WarningSink) -> Self {
        TiffWriter {
            handler: byte_order.create_handler(),
            format,
            allow_upgrade: true,
            header_written: false,
            written: Vec::new(),
            next_free: format.header_size(),
            registry: TagRegistry::builtin(),
            sink,
        }
    }

    /// Forbids the automatic BigTIFF upgrade
    ///
    /// With the upgrade disabled, an offset past the 32-bit range
    /// fails the write instead of rewriting the file.
    pub fn disable_big_tiff(&mut self) {
        self.allow_upgrade = false;
    }

    /// The current format mode
    pub fn format(&self) -> TiffFormat {
        self.format
    }

    /// The declared byte order
    pub fn byte_order(&self) -> ByteOrder {
        self.handler.order()
    }

    /// Offsets of the directories written so far
    pub fn directory_offsets(&self) -> Vec<u64> {
        self.written.iter().map(|w| w.offset).collect()
    }

    /// Writes the file header
    ///
    /// Must be called once before any directory or data write. The
    /// first-IFD offset starts at zero and is patched when the first
    /// directory lands.
    pub fn create<S: SeekableStream>(&mut self, stream: &mut S) -> TiffResult<()> {
        header::write_header(stream, self.format, self.handler.as_ref())?;
        self.header_written = true;
        self.next_free = self.format.header_size();
        Ok(())
    }

    /// Appends a data block, returning the offset it was written at
    ///
    /// Strip and tile payloads go through here; the caller records the
    /// returned offset in the directory's descriptor table. Blocks are
    /// aligned to 4 bytes and padded.
    pub fn append_data<S: SeekableStream>(
        &mut self,
        stream: &mut S,
        data: &[u8],
    ) -> TiffResult<u64> {
        self.require_header()?;
        let offset = write_utils::align_to_4_bytes(self.next_free);
        stream.seek(SeekFrom::Start(offset))?;
        stream.write_all(data)?;
        write_utils::write_padding(stream, data.len())?;
        self.next_free = offset + data.len() as u64
            + write_utils::calculate_padding(data.len()) as u64;
        Ok(offset)
    }

    /// Reserves output space without writing it
    ///
    /// Returns the offset of the reserved region. Useful when a
    /// payload is produced by an external pipeline that writes the
    /// stream itself.
    pub fn reserve_region(&mut self, length: u64) -> TiffResult<u64> {
        self.require_header()?;
        let offset = write_utils::align_to_4_bytes(self.next_free);
        self.next_free = offset + length;
        Ok(offset)
    }

    fn require_header(&self) -> TiffResult<()> {
        if !self.header_written {
            return Err(TiffError::GenericError(
                "header not written, call create() first".to_string(),
            ));
        }
        Ok(())
    }

    /// Writes one directory and links it into the chain
    ///
    /// `offset_hint` proposes a placement; the writer aligns it and
    /// falls back to the first free byte when absent. Returns the
    /// offset the entry table landed at.
    ///
    /// An offset past the classic 32-bit range aborts the staging and
    /// runs the BigTIFF upgrade before retrying, unless the caller
    /// disabled BigTIFF output.
    pub fn write_directory<S: SeekableStream>(
        &mut self,
        stream: &mut S,
        dir: &Directory,
        offset_hint: Option<u64>,
    ) -> TiffResult<u64> {
        self.require_header()?;
        match self.try_write_directory(stream, dir, offset_hint) {
            Err(TiffError::OffsetOverflow(offset)) if self.format == TiffFormat::Classic => {
                if !self.allow_upgrade {
                    return Err(TiffError::BigTiffDisabled);
                }
                info!("offset {} exceeds classic range, upgrading to BigTIFF", offset);
                self.upgrade_to_big_tiff(stream)?;
                self.try_write_directory(stream, dir, None)
            }
            other => other,
        }
    }

    /// One staging-and-write attempt at the current format
    ///
    /// Staging happens entirely before the first stream write, so a
    /// failed attempt leaves both the file and the writer untouched.
    fn try_write_directory<S: SeekableStream>(
        &mut self,
        stream: &mut S,
        dir: &Directory,
        offset_hint: Option<u64>,
    ) -> TiffResult<u64> {
        let emission = self.build_emission(dir)?;

        let proposed = offset_hint.unwrap_or(self.next_free).max(self.format.header_size());
        let table_offset = write_utils::align_to_4_bytes(proposed);
        if table_offset > self.format.max_offset() {
            return Err(TiffError::OffsetOverflow(table_offset));
        }

        let staged = self.stage_directory(&emission, table_offset)?;
        debug!(
            "writing directory #{} at {} with {} entries",
            dir.number,
            table_offset,
            emission.len()
        );

        // Data first, table second, chain pointer last.
        for (offset, blob) in &staged.blobs {
            stream.seek(SeekFrom::Start(*offset))?;
            stream.write_all(blob)?;
        }
        stream.seek(SeekFrom::Start(table_offset))?;
        stream.write_all(&staged.table)?;
        self.link_directory(stream, table_offset)?;

        self.written.push(WrittenDir { offset: table_offset, next_ptr_pos: staged.next_ptr_pos });
        self.next_free = self.next_free.max(staged.end);
        Ok(table_offset)
    }

    /// Computes the tag-sorted emission set for a directory
    ///
    /// The field-set bitmap decides membership; the strip/tile
    /// descriptor tables are folded in under the identity chosen by
    /// the directory's tiled mode; conditionally suppressed fields
    /// (ExtraSamples with no extra samples) are left out.
    fn build_emission(&self, dir: &Directory) -> TiffResult<Vec<(u16, FieldValue)>> {
        let mut emission: Vec<(u16, FieldValue)> = Vec::new();

        let (offsets_tag, counts_tag) = if dir.tiled {
            (tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS)
        } else {
            (tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS)
        };

        for tag in dir.set_tags() {
            // Descriptor tables own these identities.
            if tag == tags::STRIP_OFFSETS
                || tag == tags::STRIP_BYTE_COUNTS
                || tag == tags::TILE_OFFSETS
                || tag == tags::TILE_BYTE_COUNTS
            {
                continue;
            }
            let value = match dir.get_field(tag) {
                Some(value) => value.clone(),
                None => continue,
            };
            if tag == tags::EXTRA_SAMPLES && value.count() == 0 {
                continue;
            }
            if value.count() == 0 {
                self.sink
                    .tag_warning(tag, "field has no values and will not be emitted");
                continue;
            }
            emission.push((tag, value));
        }

        if !dir.strip_offsets.is_empty() {
            emission.push((offsets_tag, self.offset_array_value(&dir.strip_offsets)?));
            emission.push((counts_tag, self.offset_array_value(&dir.strip_byte_counts)?));
        }

        emission.sort_by_key(|(tag, _)| *tag);
        Ok(emission)
    }

    /// Encodes a u64 array at the width the format supports
    fn offset_array_value(&self, values: &[u64]) -> TiffResult<FieldValue> {
        match self.format {
            TiffFormat::Big => Ok(FieldValue::Long8(values.to_vec())),
            TiffFormat::Classic => {
                if let Some(&too_big) = values.iter().find(|&&v| v > u32::MAX as u64) {
                    return Err(TiffError::OffsetOverflow(too_big));
                }
                Ok(FieldValue::Long(values.iter().map(|&v| v as u32).collect()))
            }
        }
    }

    /// Serializes a directory into memory
    ///
    /// Inline values are packed from the slot's first byte in file
    /// byte order; everything else lands in the reserved region that
    /// starts right after the entry table.
    fn stage_directory(
        &self,
        emission: &[(u16, FieldValue)],
        table_offset: u64,
    ) -> TiffResult<StagedDirectory> {
        let order = self.handler.order();
        let entry_count = emission.len() as u64;
        let table_size = self.format.directory_size(entry_count);
        let mut data_cursor = write_utils::align_to_4_bytes(table_offset + table_size);

        let mut table: Vec<u8> = Vec::with_capacity(table_size as usize);
        let mut blobs: Vec<(u64, Vec<u8>)> = Vec::new();

        match self.format {
            TiffFormat::Big => self.handler.write_u64(&mut table, entry_count)?,
            TiffFormat::Classic => self.handler.write_u16(&mut table, entry_count as u16)?,
        }

        for (tag, value) in emission {
            let payload = value.to_wire_bytes(order);
            let count = value.count();

            self.handler.write_u16(&mut table, *tag)?;
            self.handler.write_u16(&mut table, value.wire_type())?;
            match self.format {
                TiffFormat::Big => self.handler.write_u64(&mut table, count)?,
                TiffFormat::Classic => {
                    if count > u32::MAX as u64 {
                        return Err(TiffError::MalformedEntry(
                            *tag,
                            "count exceeds the classic 32-bit count field".to_string(),
                        ));
                    }
                    self.handler.write_u32(&mut table, count as u32)?;
                }
            }

            let slot_size = self.format.inline_size() as usize;
            if payload.len() <= slot_size {
                let mut slot = payload;
                slot.resize(slot_size, 0);
                table.extend_from_slice(&slot);
            } else {
                let offset = data_cursor;
                if offset > self.format.max_offset() {
                    return Err(TiffError::OffsetOverflow(offset));
                }
                match self.format {
                    TiffFormat::Big => self.handler.write_u64(&mut table, offset)?,
                    TiffFormat::Classic => self.handler.write_u32(&mut table, offset as u32)?,
                }
                data_cursor = write_utils::align_to_4_bytes(offset + payload.len() as u64);
                blobs.push((offset, payload));
            }
        }

        let next_ptr_pos = table_offset + self.format.count_field_size()
            + entry_count * self.format.entry_size();
        match self.format {
            TiffFormat::Big => self.handler.write_u64(&mut table, 0)?,
            TiffFormat::Classic => self.handler.write_u32(&mut table, 0)?,
        }

        Ok(StagedDirectory { table, blobs, next_ptr_pos, end: data_cursor })
    }

    /// Points the chain at a freshly written directory
    ///
    /// The first directory is linked from the header; later ones from
    /// the previous directory's next pointer.
    fn link_directory<S: SeekableStream>(
        &mut self,
        stream: &mut S,
        new_offset: u64,
    ) -> TiffResult<()> {
        match self.written.last() {
            None => header::patch_first_ifd_offset(
                stream,
                self.format,
                self.handler.as_ref(),
                new_offset,
            ),
            Some(prev) => {
                stream.seek(SeekFrom::Start(prev.next_ptr_pos))?;
                match self.format {
                    TiffFormat::Big => self.handler.write_u64(stream, new_offset)?,
                    TiffFormat::Classic => {
                        self.handler.write_u32(stream, new_offset as u32)?
                    }
                }
                Ok(())
            }
        }
    }

    /// Rewrites the file as BigTIFF
    ///
    /// Re-reads every previously written directory at classic widths,
    /// re-emits each at big widths in fresh space at the end of the
    /// file, rewrites the header, and re-links the chain. Out-of-line
    /// value regions do not move; only the entry tables are rebuilt.
    /// The old classic tables become dead space.
    fn upgrade_to_big_tiff<S: SeekableStream>(&mut self, stream: &mut S) -> TiffResult<()> {
        if self.format.is_big() {
            return Ok(());
        }

        info!("upgrading {} directories to BigTIFF", self.written.len());

        let mut raw_ifds: Vec<IFD> = Vec::with_capacity(self.written.len());
        for (number, w) in self.written.iter().enumerate() {
            let ifd = reader::read_ifd_at(
                stream,
                self.handler.as_ref(),
                TiffFormat::Classic,
                w.offset,
                number,
            )?;
            raw_ifds.push(ifd);
        }

        self.format = TiffFormat::Big;
        header::write_header(stream, TiffFormat::Big, self.handler.as_ref())?;
        self.next_free = self.next_free.max(self.format.header_size());

        // Stage and write every widened table before touching a single
        // chain pointer.
        let mut rewritten: Vec<WrittenDir> = Vec::with_capacity(raw_ifds.len());
        for ifd in &raw_ifds {
            let table_offset = write_utils::align_to_4_bytes(self.next_free);
            let table = self.stage_widened_ifd(stream, ifd)?;
            stream.seek(SeekFrom::Start(table_offset))?;
            stream.write_all(&table)?;

            let next_ptr_pos = table_offset + self.format.count_field_size()
                + ifd.entries.len() as u64 * self.format.entry_size();
            rewritten.push(WrittenDir { offset: table_offset, next_ptr_pos });
            self.next_free = table_offset + table.len() as u64;
        }

        if let Some(first) = rewritten.first() {
            header::patch_first_ifd_offset(
                stream,
                TiffFormat::Big,
                self.handler.as_ref(),
                first.offset,
            )?;
        }
        for i in 0..rewritten.len().saturating_sub(1) {
            stream.seek(SeekFrom::Start(rewritten[i].next_ptr_pos))?;
            self.handler.write_u64(stream, rewritten[i + 1].offset)?;
        }

        self.written = rewritten;
        Ok(())
    }

    /// Re-emits one raw classic entry table at big widths
    ///
    /// Inline slots copy byte-for-byte into the wider slot (inline
    /// data is packed from the slot's first byte in both formats).
    /// Payloads of 5-8 bytes were out-of-line in classic but fit the
    /// wider slot, and must move into it: the reader classifies them
    /// inline at big widths. Larger payloads keep their existing data
    /// offsets.
    fn stage_widened_ifd<S: SeekableStream>(
        &self,
        stream: &mut S,
        ifd: &IFD,
    ) -> TiffResult<Vec<u8>> {
        let mut table: Vec<u8> = Vec::new();
        self.handler.write_u64(&mut table, ifd.entries.len() as u64)?;

        for entry in &ifd.entries {
            self.handler.write_u16(&mut table, entry.tag)?;
            self.handler.write_u16(&mut table, entry.field_type)?;
            self.handler.write_u64(&mut table, entry.count)?;

            match entry.data_size() {
                Some(size) if size <= 4 => {
                    let mut slot = [0u8; 8];
                    slot[..4].copy_from_slice(&entry.slot[..4]);
                    table.extend_from_slice(&slot);
                }
                Some(size) if size <= 8 => {
                    let mut slot = [0u8; 8];
                    stream.seek(SeekFrom::Start(entry.value_offset))?;
                    stream.read_exact(&mut slot[..size as usize])?;
                    table.extend_from_slice(&slot);
                }
                _ => self.handler.write_u64(&mut table, entry.value_offset)?,
            }
        }

        // Next pointer is zeroed here and repointed once every
        // widened table exists.
        self.handler.write_u64(&mut table, 0)?;
        Ok(table)
    }

    /// Display name for a tag, for diagnostics
    pub fn tag_name(&self, tag: u16) -> &'static str {
        self.registry.tag_name(tag)
    }
}
