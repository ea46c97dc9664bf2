//! SLIP (RFC 1055) packet framing used on the gateway byte stream.
//!
//! Each frame is sent as `END stuffed-bytes END`. Inside a packet `END` is
//! written as `ESC ESC_END` and `ESC` as `ESC ESC_ESC`.

use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Packet delimiter.
pub const END: u8 = 0xC0;
/// Escape introducer.
pub const ESC: u8 = 0xDB;
/// Follows `ESC` to encode a literal `END`.
pub const ESC_END: u8 = 0xDC;
/// Follows `ESC` to encode a literal `ESC`.
pub const ESC_ESC: u8 = 0xDD;

/// Errors raised while unstuffing a packet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlipError {
    /// `ESC` followed by something other than `ESC_END`/`ESC_ESC`.
    /// A packet ending right after `ESC` reports `END` here.
    #[error("invalid SLIP escape: ESC followed by 0x{0:02x}")]
    InvalidEscape(u8),

    #[error("SLIP packet too large ({size} bytes, max {max})")]
    PacketTooLarge { size: usize, max: usize },
}

/// Append `packet` to `dst` as one SLIP packet.
pub fn encode(packet: &[u8], dst: &mut BytesMut) {
    dst.reserve(packet.len() + 2);
    dst.put_u8(END);
    for &byte in packet {
        match byte {
            END => dst.put_slice(&[ESC, ESC_END]),
            ESC => dst.put_slice(&[ESC, ESC_ESC]),
            other => dst.put_u8(other),
        }
    }
    dst.put_u8(END);
}

/// Take the next complete packet out of `src`.
///
/// Returns `Ok(None)` when `src` does not hold a complete packet yet. Bytes
/// before the first `END` and empty packets are discarded. The closing `END`
/// stays in `src` so it can open the following packet. A malformed or
/// oversized packet is consumed before its error is returned, so the caller
/// can keep reading.
pub fn decode_packet(src: &mut BytesMut, max_packet_size: usize) -> Result<Option<Bytes>, SlipError> {
    loop {
        let Some(start) = src.iter().position(|&b| b == END) else {
            if src.len() > max_packet_size {
                let size = src.len();
                src.clear();
                return Err(SlipError::PacketTooLarge {
                    size,
                    max: max_packet_size,
                });
            }
            return Ok(None);
        };
        if start > 0 {
            tracing::trace!(skipped = start, "discarding bytes outside SLIP packet");
            src.advance(start);
        }

        let Some(len) = src[1..].iter().position(|&b| b == END) else {
            let pending = src.len() - 1;
            if pending > max_packet_size {
                src.clear();
                return Err(SlipError::PacketTooLarge {
                    size: pending,
                    max: max_packet_size,
                });
            }
            return Ok(None);
        };

        // Leave the closing END in place.
        let stuffed = src.split_to(len + 1);
        if len == 0 {
            continue;
        }
        if len > max_packet_size {
            return Err(SlipError::PacketTooLarge {
                size: len,
                max: max_packet_size,
            });
        }
        return unstuff(&stuffed[1..]).map(Some);
    }
}

fn unstuff(stuffed: &[u8]) -> Result<Bytes, SlipError> {
    let mut out = BytesMut::with_capacity(stuffed.len());
    let mut bytes = stuffed.iter();
    while let Some(&byte) = bytes.next() {
        if byte != ESC {
            out.put_u8(byte);
            continue;
        }
        match bytes.next() {
            Some(&ESC_END) => out.put_u8(END),
            Some(&ESC_ESC) => out.put_u8(ESC),
            Some(&other) => return Err(SlipError::InvalidEscape(other)),
            None => return Err(SlipError::InvalidEscape(END)),
        }
    }
    Ok(out.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 514;

    fn encoded(packet: &[u8]) -> BytesMut {
        let mut buf = BytesMut::new();
        encode(packet, &mut buf);
        buf
    }

    #[test]
    fn plain_packet_is_wrapped() {
        let buf = encoded(&[0x00, 0x03, 0x00, 0x08, 0x0b]);
        assert_eq!(buf.as_ref(), &[END, 0x00, 0x03, 0x00, 0x08, 0x0b, END]);
    }

    #[test]
    fn special_bytes_are_escaped() {
        let buf = encoded(&[0x01, END, 0x02, ESC, 0x03]);
        assert_eq!(
            buf.as_ref(),
            &[END, 0x01, ESC, ESC_END, 0x02, ESC, ESC_ESC, 0x03, END]
        );

        let mut src = buf;
        let packet = decode_packet(&mut src, MAX).unwrap().unwrap();
        assert_eq!(packet.as_ref(), &[0x01, END, 0x02, ESC, 0x03]);
    }

    #[test]
    fn partial_packet_needs_more_data() {
        let full = encoded(&[0x10, 0x20, 0x30]);
        let mut src = BytesMut::from(&full[..3]);
        assert_eq!(decode_packet(&mut src, MAX).unwrap(), None);

        src.extend_from_slice(&full[3..]);
        let packet = decode_packet(&mut src, MAX).unwrap().unwrap();
        assert_eq!(packet.as_ref(), &[0x10, 0x20, 0x30]);
        assert_eq!(decode_packet(&mut src, MAX).unwrap(), None);
    }

    #[test]
    fn consecutive_packets_and_shared_delimiters() {
        let mut src = BytesMut::new();
        src.extend_from_slice(&[END, 0x01, END, 0x02, END]);
        src.extend_from_slice(&encoded(&[0x03]));

        let mut packets = Vec::new();
        while let Some(packet) = decode_packet(&mut src, MAX).unwrap() {
            packets.push(packet.to_vec());
        }
        assert_eq!(packets, vec![vec![0x01], vec![0x02], vec![0x03]]);
    }

    #[test]
    fn leading_garbage_and_empty_packets_are_skipped() {
        let mut src = BytesMut::from(&[0x55, 0x66, END, END, END, 0x07, END][..]);
        let packet = decode_packet(&mut src, MAX).unwrap().unwrap();
        assert_eq!(packet.as_ref(), &[0x07]);
    }

    #[test]
    fn invalid_escape_is_consumed() {
        let mut src = BytesMut::from(&[END, 0x01, ESC, 0x42, END][..]);
        src.extend_from_slice(&encoded(&[0x09]));

        assert_eq!(
            decode_packet(&mut src, MAX),
            Err(SlipError::InvalidEscape(0x42))
        );
        let packet = decode_packet(&mut src, MAX).unwrap().unwrap();
        assert_eq!(packet.as_ref(), &[0x09]);
    }

    #[test]
    fn escape_before_end_is_invalid() {
        let mut src = BytesMut::from(&[END, 0x01, ESC, END][..]);
        assert_eq!(
            decode_packet(&mut src, MAX),
            Err(SlipError::InvalidEscape(END))
        );
    }

    #[test]
    fn oversized_packets_are_rejected() {
        let mut src = BytesMut::new();
        src.put_u8(END);
        src.put_bytes(0x11, 9);
        assert_eq!(
            decode_packet(&mut src, 8),
            Err(SlipError::PacketTooLarge { size: 9, max: 8 })
        );
        assert!(src.is_empty());

        let mut src = encoded(&[0x11; 9]);
        assert_eq!(
            decode_packet(&mut src, 8),
            Err(SlipError::PacketTooLarge { size: 9, max: 8 })
        );
        assert_eq!(src.as_ref(), &[END]);
    }
}
