//! Frame checksum: XOR over every byte preceding the checksum.

/// Compute the checksum of `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, byte| acc ^ byte)
}

/// Returns true if `frame` ends with a checksum consistent with its contents.
///
/// XORing a frame together with its own checksum yields zero.
pub fn verify(frame: &[u8]) -> bool {
    !frame.is_empty() && checksum(frame) == 0
}
