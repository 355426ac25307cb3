//! Typed field values
//!
//! A field's decoded value is a tagged union over the wire-type set.
//! Conversions are explicit and fallible: asking a RATIONAL field for
//! integers is an error surfaced to the caller, never a silent
//! truncation.

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::field_types;

/// The decoded value of one directory field
///
/// Multi-value fields hold all their values; scalar fields are arrays
/// of length one. ASCII strings drop their on-disk NUL terminator.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Byte(Vec<u8>),
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<(u32, u32)>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<(i32, i32)>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Ifd(Vec<u32>),
    Long8(Vec<u64>),
    SLong8(Vec<i64>),
    Ifd8(Vec<u64>),
}

fn push_u16(out: &mut Vec<u8>, value: u16, order: ByteOrder) {
    match order {
        ByteOrder::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
    }
}

fn push_u32(out: &mut Vec<u8>, value: u32, order: ByteOrder) {
    match order {
        ByteOrder::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
    }
}

fn push_u64(out: &mut Vec<u8>, value: u64, order: ByteOrder) {
    match order {
        ByteOrder::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
        ByteOrder::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
    }
}

impl FieldValue {
    /// The wire type this value serializes as
    pub fn wire_type(&self) -> u16 {
        match self {
            FieldValue::Byte(_) => field_types::BYTE,
            FieldValue::Ascii(_) => field_types::ASCII,
            FieldValue::Short(_) => field_types::SHORT,
            FieldValue::Long(_) => field_types::LONG,
            FieldValue::Rational(_) => field_types::RATIONAL,
            FieldValue::SByte(_) => field_types::SBYTE,
            FieldValue::Undefined(_) => field_types::UNDEFINED,
            FieldValue::SShort(_) => field_types::SSHORT,
            FieldValue::SLong(_) => field_types::SLONG,
            FieldValue::SRational(_) => field_types::SRATIONAL,
            FieldValue::Float(_) => field_types::FLOAT,
            FieldValue::Double(_) => field_types::DOUBLE,
            FieldValue::Ifd(_) => field_types::IFD,
            FieldValue::Long8(_) => field_types::LONG8,
            FieldValue::SLong8(_) => field_types::SLONG8,
            FieldValue::Ifd8(_) => field_types::IFD8,
        }
    }

    /// The value count this serializes with
    ///
    /// ASCII counts include the NUL terminator the writer appends.
    pub fn count(&self) -> u64 {
        match self {
            FieldValue::Byte(v) => v.len() as u64,
            FieldValue::Ascii(s) => s.len() as u64 + 1,
            FieldValue::Short(v) => v.len() as u64,
            FieldValue::Long(v) => v.len() as u64,
            FieldValue::Rational(v) => v.len() as u64,
            FieldValue::SByte(v) => v.len() as u64,
            FieldValue::Undefined(v) => v.len() as u64,
            FieldValue::SShort(v) => v.len() as u64,
            FieldValue::SLong(v) => v.len() as u64,
            FieldValue::SRational(v) => v.len() as u64,
            FieldValue::Float(v) => v.len() as u64,
            FieldValue::Double(v) => v.len() as u64,
            FieldValue::Ifd(v) => v.len() as u64,
            FieldValue::Long8(v) => v.len() as u64,
            FieldValue::SLong8(v) => v.len() as u64,
            FieldValue::Ifd8(v) => v.len() as u64,
        }
    }

    /// Short name of the held type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        crate::tiff::names::field_type_name(self.wire_type())
    }

    /// Widens any unsigned integer variant to u64 values
    ///
    /// This is the "SHORT widened to LONG-equivalent" path: offset and
    /// count consumers accept BYTE/SHORT/LONG/LONG8 interchangeably.
    /// Returns None for non-integer variants.
    pub fn to_u64_vec(&self) -> Option<Vec<u64>> {
        match self {
            FieldValue::Byte(v) => Some(v.iter().map(|&x| x as u64).collect()),
            FieldValue::Short(v) => Some(v.iter().map(|&x| x as u64).collect()),
            FieldValue::Long(v) => Some(v.iter().map(|&x| x as u64).collect()),
            FieldValue::Ifd(v) => Some(v.iter().map(|&x| x as u64).collect()),
            FieldValue::Long8(v) => Some(v.clone()),
            FieldValue::Ifd8(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Converts any signed or unsigned integer variant to i64 values
    pub fn to_i64_vec(&self) -> Option<Vec<i64>> {
        match self {
            FieldValue::SByte(v) => Some(v.iter().map(|&x| x as i64).collect()),
            FieldValue::SShort(v) => Some(v.iter().map(|&x| x as i64).collect()),
            FieldValue::SLong(v) => Some(v.iter().map(|&x| x as i64).collect()),
            FieldValue::SLong8(v) => Some(v.clone()),
            _ => self.to_u64_vec().map(|v| v.into_iter().map(|x| x as i64).collect()),
        }
    }

    /// Converts any numeric variant to f64 values
    ///
    /// Rationals divide numerator by denominator; a zero denominator
    /// yields NaN rather than a panic, matching how corrupt resolution
    /// fields are usually tolerated.
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            FieldValue::Float(v) => Some(v.iter().map(|&x| x as f64).collect()),
            FieldValue::Double(v) => Some(v.clone()),
            FieldValue::Rational(v) => Some(
                v.iter()
                    .map(|&(n, d)| if d == 0 { f64::NAN } else { n as f64 / d as f64 })
                    .collect(),
            ),
            FieldValue::SRational(v) => Some(
                v.iter()
                    .map(|&(n, d)| if d == 0 { f64::NAN } else { n as f64 / d as f64 })
                    .collect(),
            ),
            _ => self
                .to_i64_vec()
                .map(|v| v.into_iter().map(|x| x as f64).collect()),
        }
    }

    /// First value as u64, for scalar fields
    pub fn first_u64(&self) -> Option<u64> {
        self.to_u64_vec()?.first().copied()
    }

    /// First value as f64, for scalar fields
    pub fn first_f64(&self) -> Option<f64> {
        self.to_f64_vec()?.first().copied()
    }

    /// The string content of an ASCII field
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Ascii(s) => Some(s),
            _ => None,
        }
    }

    /// Raw bytes of BYTE/UNDEFINED fields
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Byte(v) | FieldValue::Undefined(v) => Some(v),
            _ => None,
        }
    }

    /// Serializes all values in the given file byte order
    ///
    /// The result is the entry's payload: it lands in the inline slot
    /// when it fits, in the out-of-line data region otherwise.
    pub fn to_wire_bytes(&self, order: ByteOrder) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        match self {
            FieldValue::Byte(v) | FieldValue::Undefined(v) => out.extend_from_slice(v),
            FieldValue::Ascii(s) => {
                out.extend_from_slice(s.as_bytes());
                out.push(0);
            }
            FieldValue::SByte(v) => out.extend(v.iter().map(|&x| x as u8)),
            FieldValue::Short(v) => v.iter().for_each(|&x| push_u16(&mut out, x, order)),
            FieldValue::SShort(v) => v.iter().for_each(|&x| push_u16(&mut out, x as u16, order)),
            FieldValue::Long(v) | FieldValue::Ifd(v) => {
                v.iter().for_each(|&x| push_u32(&mut out, x, order))
            }
            FieldValue::SLong(v) => v.iter().for_each(|&x| push_u32(&mut out, x as u32, order)),
            FieldValue::Rational(v) => v.iter().for_each(|&(n, d)| {
                push_u32(&mut out, n, order);
                push_u32(&mut out, d, order);
            }),
            FieldValue::SRational(v) => v.iter().for_each(|&(n, d)| {
                push_u32(&mut out, n as u32, order);
                push_u32(&mut out, d as u32, order);
            }),
            FieldValue::Float(v) => v.iter().for_each(|&x| push_u32(&mut out, x.to_bits(), order)),
            FieldValue::Double(v) => v.iter().for_each(|&x| push_u64(&mut out, x.to_bits(), order)),
            FieldValue::Long8(v) | FieldValue::Ifd8(v) => {
                v.iter().for_each(|&x| push_u64(&mut out, x, order))
            }
            FieldValue::SLong8(v) => v.iter().for_each(|&x| push_u64(&mut out, x as u64, order)),
        }
        out
    }
}
