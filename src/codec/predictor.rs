//! Predictor filter
//!
//! A decorator over any codec that applies horizontal or
//! floating-point differencing. Decoding delegates to the wrapped
//! codec and then accumulates in place; encoding differences a copy of
//! the caller's buffer (the caller's memory is never mutated) and
//! hands the copy to the wrapped codec.
//!
//! For 16- and 32-bit samples the accumulation must happen on
//! host-order values, so the filter performs the file-to-host swab
//! itself and reports `handles_byte_order` so the caller skips its
//! generic post-decode swap. Floating-point prediction works on
//! byte planes in absolute significance order, so byte order never
//! enters that path at all.

use super::contract::{Codec, CodecSetup};
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::predictor;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::utils::swab_utils;

/// The two real predictor schemes
///
/// "None" never constructs a filter; the factory passes the codec
/// through untouched instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictorKind {
    /// Running per-channel sum/difference over integer samples
    Horizontal,
    /// Byte-plane differencing for IEEE floats
    FloatingPoint,
}

/// Codec decorator applying a predictor transform
pub struct PredictorCodec {
    inner: Box<dyn Codec>,
    kind: PredictorKind,
    /// Channels to skip between horizontally adjacent samples
    stride: usize,
    /// Bytes in one row of the current tiling mode
    row_bytes: usize,
    /// Bytes per sample
    sample_bytes: usize,
    /// File byte order, for the 16/32-bit swab step
    byte_order: ByteOrder,
}

impl PredictorCodec {
    /// Wraps a codec according to the directory's predictor tag
    ///
    /// Fails on predictor values this library does not implement and
    /// on sample widths the chosen scheme cannot difference.
    pub fn new(inner: Box<dyn Codec>, setup: &CodecSetup) -> TiffResult<Self> {
        let kind = match setup.predictor {
            predictor::HORIZONTAL_DIFFERENCING => PredictorKind::Horizontal,
            predictor::FLOATING_POINT => PredictorKind::FloatingPoint,
            other => {
                return Err(TiffError::GenericError(format!(
                    "unsupported predictor value: {}",
                    other
                )))
            }
        };

        match kind {
            PredictorKind::Horizontal => {
                if !matches!(setup.bits_per_sample, 8 | 16 | 32) {
                    return Err(TiffError::GenericError(format!(
                        "horizontal differencing requires 8/16/32-bit samples, got {}",
                        setup.bits_per_sample
                    )));
                }
            }
            PredictorKind::FloatingPoint => {
                if !matches!(setup.bits_per_sample, 32 | 64) {
                    return Err(TiffError::GenericError(format!(
                        "floating-point prediction requires 32/64-bit samples, got {}",
                        setup.bits_per_sample
                    )));
                }
            }
        }

        if setup.row_bytes == 0 {
            return Err(TiffError::GenericError("predictor row size is zero".to_string()));
        }

        let sample_bytes = (setup.bits_per_sample / 8) as usize;
        if kind == PredictorKind::FloatingPoint && setup.row_bytes % sample_bytes != 0 {
            return Err(TiffError::GenericError(
                "floating-point predictor row is not a whole number of samples".to_string(),
            ));
        }

        // Interleaved pixels difference against the previous pixel's
        // matching channel; planar data differences adjacent samples.
        let stride = if setup.planar_contiguous {
            setup.samples_per_pixel.max(1)
        } else {
            1
        };

        Ok(PredictorCodec {
            inner,
            kind,
            stride,
            row_bytes: setup.row_bytes,
            sample_bytes,
            byte_order: setup.byte_order,
        })
    }

    fn needs_swab(&self) -> bool {
        self.kind == PredictorKind::Horizontal
            && self.sample_bytes > 1
            && self.byte_order != ByteOrder::native()
    }

    /// Inverse transform of one decoded row, in place
    fn decode_row(&self, row: &mut [u8]) {
        match self.kind {
            PredictorKind::Horizontal => {
                if self.needs_swab() {
                    swab_utils::swab_bytes(row, self.sample_bytes);
                }
                match self.sample_bytes {
                    1 => accumulate8(row, self.stride),
                    2 => accumulate16(row, self.stride),
                    _ => accumulate32(row, self.stride),
                }
            }
            PredictorKind::FloatingPoint => {
                accumulate8(row, self.stride);
                fp_reassemble(row, self.sample_bytes);
            }
        }
    }

    /// Forward transform of one row of the encode copy, in place
    fn encode_row(&self, row: &mut [u8]) {
        match self.kind {
            PredictorKind::Horizontal => {
                match self.sample_bytes {
                    1 => difference8(row, self.stride),
                    2 => difference16(row, self.stride),
                    _ => difference32(row, self.stride),
                }
                if self.needs_swab() {
                    swab_utils::swab_bytes(row, self.sample_bytes);
                }
            }
            PredictorKind::FloatingPoint => {
                fp_split(row, self.sample_bytes);
                difference8(row, self.stride);
            }
        }
    }
}

impl Codec for PredictorCodec {
    fn name(&self) -> &'static str {
        "Predictor"
    }

    fn code(&self) -> u64 {
        self.inner.code()
    }

    fn can_decode(&self) -> bool {
        self.inner.can_decode()
    }

    fn can_encode(&self) -> bool {
        self.inner.can_encode()
    }

    fn handles_byte_order(&self) -> bool {
        true
    }

    fn setup_decode(&mut self, setup: &CodecSetup) -> TiffResult<()> {
        self.inner.setup_decode(setup)
    }

    fn pre_decode(&mut self, plane: u16) -> TiffResult<()> {
        self.inner.pre_decode(plane)
    }

    fn decode_unit(&mut self, input: &[u8], output: &mut Vec<u8>, plane: u16) -> TiffResult<()> {
        self.inner.decode_unit(input, output, plane)?;
        let row_bytes = self.row_bytes;
        for row in output.chunks_mut(row_bytes) {
            self.decode_row(row);
        }
        Ok(())
    }

    fn setup_encode(&mut self, setup: &CodecSetup) -> TiffResult<()> {
        self.inner.setup_encode(setup)
    }

    fn pre_encode(&mut self, plane: u16) -> TiffResult<()> {
        self.inner.pre_encode(plane)
    }

    fn encode_unit(&mut self, input: &[u8], output: &mut Vec<u8>, plane: u16) -> TiffResult<()> {
        let mut scratch = input.to_vec();
        let row_bytes = self.row_bytes;
        for row in scratch.chunks_mut(row_bytes) {
            self.encode_row(row);
        }
        self.inner.encode_unit(&scratch, output, plane)
    }

    fn post_encode(&mut self) -> TiffResult<()> {
        self.inner.post_encode()
    }

    fn seek(&mut self, row: u64) -> TiffResult<()> {
        self.inner.seek(row)
    }

    fn cleanup(&mut self) {
        self.inner.cleanup()
    }

    fn estimated_unit_size(&self, row_bytes: usize, rows: usize) -> Option<usize> {
        self.inner.estimated_unit_size(row_bytes, rows)
    }
}

/// Running byte sum with the given channel stride
///
/// The 3- and 4-channel interleaved cases carry the running values in
/// locals; rows that are not whole pixels fall back to the generic
/// loop, which also covers arbitrary strides.
pub fn accumulate8(row: &mut [u8], stride: usize) {
    if stride == 0 || row.len() <= stride {
        return;
    }
    match stride {
        3 if row.len() % 3 == 0 => {
            let (mut r, mut g, mut b) = (row[0], row[1], row[2]);
            for px in row[3..].chunks_exact_mut(3) {
                r = r.wrapping_add(px[0]);
                g = g.wrapping_add(px[1]);
                b = b.wrapping_add(px[2]);
                px[0] = r;
                px[1] = g;
                px[2] = b;
            }
        }
        4 if row.len() % 4 == 0 => {
            let (mut r, mut g, mut b, mut a) = (row[0], row[1], row[2], row[3]);
            for px in row[4..].chunks_exact_mut(4) {
                r = r.wrapping_add(px[0]);
                g = g.wrapping_add(px[1]);
                b = b.wrapping_add(px[2]);
                a = a.wrapping_add(px[3]);
                px[0] = r;
                px[1] = g;
                px[2] = b;
                px[3] = a;
            }
        }
        _ => {
            for i in stride..row.len() {
                row[i] = row[i].wrapping_add(row[i - stride]);
            }
        }
    }
}

/// Inverse of `accumulate8`
pub fn difference8(row: &mut [u8], stride: usize) {
    if stride == 0 || row.len() <= stride {
        return;
    }
    match stride {
        3 if row.len() % 3 == 0 => {
            let (mut pr, mut pg, mut pb) = (row[0], row[1], row[2]);
            for px in row[3..].chunks_exact_mut(3) {
                let (r, g, b) = (px[0], px[1], px[2]);
                px[0] = r.wrapping_sub(pr);
                px[1] = g.wrapping_sub(pg);
                px[2] = b.wrapping_sub(pb);
                pr = r;
                pg = g;
                pb = b;
            }
        }
        4 if row.len() % 4 == 0 => {
            let (mut pr, mut pg, mut pb, mut pa) = (row[0], row[1], row[2], row[3]);
            for px in row[4..].chunks_exact_mut(4) {
                let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
                px[0] = r.wrapping_sub(pr);
                px[1] = g.wrapping_sub(pg);
                px[2] = b.wrapping_sub(pb);
                px[3] = a.wrapping_sub(pa);
                pr = r;
                pg = g;
                pb = b;
                pa = a;
            }
        }
        _ => {
            for i in (stride..row.len()).rev() {
                row[i] = row[i].wrapping_sub(row[i - stride]);
            }
        }
    }
}

fn get16(row: &[u8], index: usize) -> u16 {
    u16::from_ne_bytes([row[2 * index], row[2 * index + 1]])
}

fn put16(row: &mut [u8], index: usize, value: u16) {
    row[2 * index..2 * index + 2].copy_from_slice(&value.to_ne_bytes());
}

/// Running 16-bit sum over host-order samples
pub fn accumulate16(row: &mut [u8], stride: usize) {
    let samples = row.len() / 2;
    if stride == 0 || samples <= stride {
        return;
    }
    for i in stride..samples {
        let value = get16(row, i).wrapping_add(get16(row, i - stride));
        put16(row, i, value);
    }
}

/// Inverse of `accumulate16`
pub fn difference16(row: &mut [u8], stride: usize) {
    let samples = row.len() / 2;
    if stride == 0 || samples <= stride {
        return;
    }
    for i in (stride..samples).rev() {
        let value = get16(row, i).wrapping_sub(get16(row, i - stride));
        put16(row, i, value);
    }
}

fn get32(row: &[u8], index: usize) -> u32 {
    let at = 4 * index;
    u32::from_ne_bytes([row[at], row[at + 1], row[at + 2], row[at + 3]])
}

fn put32(row: &mut [u8], index: usize, value: u32) {
    row[4 * index..4 * index + 4].copy_from_slice(&value.to_ne_bytes());
}

/// Running 32-bit sum over host-order samples
pub fn accumulate32(row: &mut [u8], stride: usize) {
    let samples = row.len() / 4;
    if stride == 0 || samples <= stride {
        return;
    }
    for i in stride..samples {
        let value = get32(row, i).wrapping_add(get32(row, i - stride));
        put32(row, i, value);
    }
}

/// Inverse of `accumulate32`
pub fn difference32(row: &mut [u8], stride: usize) {
    let samples = row.len() / 4;
    if stride == 0 || samples <= stride {
        return;
    }
    for i in (stride..samples).rev() {
        let value = get32(row, i).wrapping_sub(get32(row, i - stride));
        put32(row, i, value);
    }
}

/// Regroups a row of native-order samples into byte planes
///
/// Plane 0 collects every sample's most significant byte, the last
/// plane the least significant: absolute significance order, so the
/// planes read the same regardless of host or file endianness. IEEE
/// floats are predicted one byte plane at a time because neighboring
/// values share exponent bytes far more often than whole words.
pub fn fp_split(row: &mut [u8], sample_bytes: usize) {
    let samples = row.len() / sample_bytes;
    if samples == 0 {
        return;
    }
    let native = row[..samples * sample_bytes].to_vec();
    for i in 0..samples {
        for b in 0..sample_bytes {
            let src = if cfg!(target_endian = "little") {
                i * sample_bytes + (sample_bytes - 1 - b)
            } else {
                i * sample_bytes + b
            };
            row[b * samples + i] = native[src];
        }
    }
}

/// Inverse of `fp_split`: byte planes back to native-order samples
pub fn fp_reassemble(row: &mut [u8], sample_bytes: usize) {
    let samples = row.len() / sample_bytes;
    if samples == 0 {
        return;
    }
    let planes = row[..samples * sample_bytes].to_vec();
    for i in 0..samples {
        for b in 0..sample_bytes {
            let dst = if cfg!(target_endian = "little") {
                i * sample_bytes + (sample_bytes - 1 - b)
            } else {
                i * sample_bytes + b
            };
            row[dst] = planes[b * samples + i];
        }
    }
}
