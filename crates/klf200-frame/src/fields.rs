//! Payload field primitives shared by the concrete frame types.

use std::fmt;

use bytes::{Buf, BufMut, BytesMut};

use crate::error::PayloadError;

/// Width of node and scene name fields.
pub const NAME_LEN: usize = 64;

/// Width of password fields.
pub const PASSWORD_LEN: usize = 32;

/// Width of a node bitmap (one bit per system table slot, 200 slots plus padding).
pub const NODE_BITMAP_LEN: usize = 26;

/// Highest node id a node bitmap can address.
pub const MAX_BITMAP_NODE: u8 = (NODE_BITMAP_LEN * 8 - 1) as u8;

/// Bounds-checked cursor over a payload.
///
/// Every accessor names the field it reads so a short payload reports
/// exactly where it ran out.
pub struct PayloadReader<'a> {
    buf: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { buf: payload }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, field: &'static str, needed: usize) -> Result<(), PayloadError> {
        if self.buf.remaining() < needed {
            return Err(PayloadError::Truncated {
                field,
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn u8(&mut self, field: &'static str) -> Result<u8, PayloadError> {
        self.ensure(field, 1)?;
        Ok(self.buf.get_u8())
    }

    pub fn u16(&mut self, field: &'static str) -> Result<u16, PayloadError> {
        self.ensure(field, 2)?;
        Ok(self.buf.get_u16())
    }

    pub fn u32(&mut self, field: &'static str) -> Result<u32, PayloadError> {
        self.ensure(field, 4)?;
        Ok(self.buf.get_u32())
    }

    pub fn bytes(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], PayloadError> {
        self.ensure(field, len)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    pub fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], PayloadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(field, N)?);
        Ok(out)
    }

    pub fn string(&mut self, field: &'static str, len: usize) -> Result<String, PayloadError> {
        let raw = self.bytes(field, len)?;
        read_padded_string(field, raw)
    }

    pub fn parameter(&mut self, field: &'static str) -> Result<Parameter, PayloadError> {
        self.u16(field).map(Parameter::from_raw)
    }

    /// Read a byte and map it through an enumeration's `TryFrom<u8>`.
    pub fn enumeration<T: TryFrom<u8>>(&mut self, field: &'static str) -> Result<T, PayloadError> {
        let value = self.u8(field)?;
        T::try_from(value).map_err(|_| PayloadError::InvalidEnumValue { field, value })
    }
}

/// Write `value` zero-padded to exactly `len` bytes.
pub fn put_padded_string(
    dst: &mut BytesMut,
    field: &'static str,
    value: &str,
    len: usize,
) -> Result<(), PayloadError> {
    let raw = value.as_bytes();
    if raw.contains(&0) {
        return Err(PayloadError::InvalidString { field });
    }
    if raw.len() > len {
        return Err(PayloadError::StringTooLong {
            field,
            len: raw.len(),
            max: len,
        });
    }
    dst.put_slice(raw);
    dst.put_bytes(0, len - raw.len());
    Ok(())
}

/// Decode a zero-padded string field. Everything from the first NUL on is padding.
pub fn read_padded_string(field: &'static str, raw: &[u8]) -> Result<String, PayloadError> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8(raw[..end].to_vec()).map_err(|_| PayloadError::InvalidString { field })
}

/// Expand a node bitmap into the node ids whose bits are set, in ascending order.
pub fn bitmap_to_nodes(bitmap: &[u8; NODE_BITMAP_LEN]) -> Vec<u8> {
    (0..=MAX_BITMAP_NODE)
        .filter(|&node| bitmap[usize::from(node / 8)] & (1 << (node % 8)) != 0)
        .collect()
}

/// Collapse node ids into a bitmap of `NODE_BITMAP_LEN` bytes.
///
/// The bitmap is a set, so `nodes` must be strictly ascending and no larger
/// than [`MAX_BITMAP_NODE`]; anything else would not survive a decode.
pub fn nodes_to_bitmap(
    field: &'static str,
    nodes: &[u8],
) -> Result<[u8; NODE_BITMAP_LEN], PayloadError> {
    if nodes.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(PayloadError::UnsortedEntries { field });
    }
    let mut bitmap = [0u8; NODE_BITMAP_LEN];
    for &node in nodes {
        if node > MAX_BITMAP_NODE {
            return Err(PayloadError::EntryOutOfRange {
                field,
                value: usize::from(node),
                max: usize::from(MAX_BITMAP_NODE),
            });
        }
        bitmap[usize::from(node / 8)] |= 1 << (node % 8);
    }
    Ok(bitmap)
}

/// A 16-bit actuator parameter (main or functional).
///
/// `0x0000..=0xC800` is a relative position where `0xC800` is 100 %. A few
/// values above that range carry special meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Parameter(u16);

impl Parameter {
    /// Highest relative position (100 %).
    pub const MAX: u16 = 0xC800;
    /// Raw units per percent.
    pub const UNITS_PER_PERCENT: u16 = 512;
    pub const TARGET: Parameter = Parameter(0xD100);
    pub const CURRENT: Parameter = Parameter(0xD200);
    pub const DEFAULT: Parameter = Parameter(0xD300);
    pub const IGNORE: Parameter = Parameter(0xD400);
    pub const UNKNOWN: Parameter = Parameter(0xF7FF);

    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Relative position from a percentage, clamped to 100.
    pub fn from_percent(percent: u8) -> Self {
        Self(u16::from(percent.min(100)) * Self::UNITS_PER_PERCENT)
    }

    /// The position in whole percent, or `None` for special values.
    pub fn as_percent(self) -> Option<u8> {
        if self.0 > Self::MAX {
            return None;
        }
        // Rounded to the nearest percent; at most 100 so the cast cannot truncate.
        let half = Self::UNITS_PER_PERCENT / 2;
        Some(((self.0 + half) / Self::UNITS_PER_PERCENT) as u8)
    }

    pub fn is_position(self) -> bool {
        self.0 <= Self::MAX
    }

    pub fn put(self, dst: &mut BytesMut) {
        dst.put_u16(self.0);
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Parameter::TARGET => f.write_str("TARGET"),
            Parameter::CURRENT => f.write_str("CURRENT"),
            Parameter::DEFAULT => f.write_str("DEFAULT"),
            Parameter::IGNORE => f.write_str("IGNORE"),
            Parameter::UNKNOWN => f.write_str("UNKNOWN"),
            other => match other.as_percent() {
                Some(percent) => write!(f, "{percent} %"),
                None => write!(f, "0x{:04x}", other.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_reads_big_endian_fields() {
        let mut reader = PayloadReader::new(&[0x03, 0xe8, 0x01, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(reader.u16("session_id").unwrap(), 1000);
        assert_eq!(reader.u8("status").unwrap(), 1);
        assert_eq!(reader.u32("timestamp").unwrap(), 256);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn reader_reports_truncation_without_panicking() {
        let mut reader = PayloadReader::new(&[0x03]);
        let err = reader.u16("session_id").unwrap_err();
        assert_eq!(
            err,
            PayloadError::Truncated {
                field: "session_id",
                needed: 2,
                remaining: 1
            }
        );
    }

    #[test]
    fn reader_maps_enum_failures() {
        #[derive(Debug)]
        struct OnlyZero;
        impl TryFrom<u8> for OnlyZero {
            type Error = u8;
            fn try_from(value: u8) -> Result<Self, u8> {
                if value == 0 {
                    Ok(OnlyZero)
                } else {
                    Err(value)
                }
            }
        }

        let mut reader = PayloadReader::new(&[0x07]);
        let err = reader.enumeration::<OnlyZero>("kind").unwrap_err();
        assert_eq!(
            err,
            PayloadError::InvalidEnumValue {
                field: "kind",
                value: 7
            }
        );
    }

    #[test]
    fn padded_string_round_trip() {
        let mut buf = BytesMut::new();
        put_padded_string(&mut buf, "name", "Bath", NAME_LEN).unwrap();
        assert_eq!(buf.len(), NAME_LEN);
        assert_eq!(&buf[..4], b"Bath");
        assert!(buf[4..].iter().all(|&b| b == 0));
        assert_eq!(read_padded_string("name", &buf).unwrap(), "Bath");
    }

    #[test]
    fn padded_string_exactly_full_width() {
        let password = "x".repeat(PASSWORD_LEN);
        let mut buf = BytesMut::new();
        put_padded_string(&mut buf, "password", &password, PASSWORD_LEN).unwrap();
        assert_eq!(read_padded_string("password", &buf).unwrap(), password);
    }

    #[test]
    fn padded_string_rejects_overflow() {
        let mut buf = BytesMut::new();
        let err = put_padded_string(&mut buf, "password", &"x".repeat(33), PASSWORD_LEN)
            .unwrap_err();
        assert_eq!(
            err,
            PayloadError::StringTooLong {
                field: "password",
                len: 33,
                max: 32
            }
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn padded_string_rejects_invalid_utf8() {
        let err = read_padded_string("name", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert_eq!(err, PayloadError::InvalidString { field: "name" });
    }

    #[test]
    fn bitmap_conversion() {
        let bitmap = nodes_to_bitmap("nodes", &[0, 9, 23, 199, 207]).unwrap();
        assert_eq!(bitmap[0], 0b0000_0001);
        assert_eq!(bitmap[1], 0b0000_0010);
        assert_eq!(bitmap[2], 0b1000_0000);
        assert_eq!(bitmap[25], 0b1000_0000);
        assert_eq!(bitmap_to_nodes(&bitmap), vec![0, 9, 23, 199, 207]);
    }

    #[test]
    fn bitmap_rejects_unaddressable_node() {
        let err = nodes_to_bitmap("added_nodes", &[250]).unwrap_err();
        assert_eq!(
            err,
            PayloadError::EntryOutOfRange {
                field: "added_nodes",
                value: 250,
                max: 207
            }
        );
    }

    #[test]
    fn bitmap_rejects_duplicate_and_unordered_nodes() {
        assert_eq!(
            nodes_to_bitmap("removed_nodes", &[9, 0]).unwrap_err(),
            PayloadError::UnsortedEntries {
                field: "removed_nodes"
            }
        );
        assert_eq!(
            nodes_to_bitmap("removed_nodes", &[0, 9, 9]).unwrap_err(),
            PayloadError::UnsortedEntries {
                field: "removed_nodes"
            }
        );
    }

    #[test]
    fn padded_string_rejects_interior_nul() {
        let mut buf = BytesMut::new();
        let err = put_padded_string(&mut buf, "name", "a\0b", NAME_LEN).unwrap_err();
        assert_eq!(err, PayloadError::InvalidString { field: "name" });
        assert!(buf.is_empty());
    }

    #[test]
    fn parameter_percent_conversion() {
        assert_eq!(Parameter::from_percent(0).raw(), 0);
        assert_eq!(Parameter::from_percent(45).raw(), 45 * 512);
        assert_eq!(Parameter::from_percent(100).raw(), Parameter::MAX);
        assert_eq!(Parameter::from_percent(250).raw(), Parameter::MAX);
        assert_eq!(Parameter::from_percent(45).as_percent(), Some(45));
        assert_eq!(Parameter::UNKNOWN.as_percent(), None);
    }

    #[test]
    fn parameter_display() {
        assert_eq!(Parameter::from_percent(45).to_string(), "45 %");
        assert_eq!(Parameter::CURRENT.to_string(), "CURRENT");
        assert_eq!(Parameter::from_raw(0xE000).to_string(), "0xe000");
    }
}
