use crate::command::Command;
use crate::slip::SlipError;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Fewer bytes than the smallest possible frame (marker, length, command, checksum).
    #[error("frame truncated ({len} bytes, min {min})", min = crate::codec::MIN_FRAME_SIZE)]
    Truncated { len: usize },

    /// The length byte disagrees with the number of bytes received.
    #[error("frame length mismatch (declared {declared}, actual {actual})")]
    LengthMismatch { declared: usize, actual: usize },

    /// The trailing checksum does not match the frame contents.
    #[error("checksum mismatch (expected 0x{expected:02x}, got 0x{actual:02x})")]
    ChecksumMismatch { expected: u8, actual: u8 },

    /// No frame type is registered for the command id.
    #[error("unknown command 0x{0:04x}")]
    UnknownCommand(u16),

    /// A fixed-length frame type received or produced a payload of the wrong size.
    #[error("invalid payload length for {command} (expected {expected}, got {actual})")]
    InvalidPayloadLength {
        command: Command,
        expected: usize,
        actual: usize,
    },

    /// The payload could not be parsed or serialized by its frame type.
    #[error("invalid payload for {command}: {source}")]
    InvalidPayload {
        command: Command,
        #[source]
        source: PayloadError,
    },

    /// The payload does not fit into the one-byte length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The byte stream carried a malformed SLIP packet.
    #[error("SLIP framing error: {0}")]
    Slip(#[from] SlipError),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

impl FrameError {
    /// True for failures of the underlying stream rather than of the bytes on it.
    ///
    /// Data errors (bad checksum, unknown command, malformed payload) will not
    /// succeed on retry; encode-side errors indicate a caller bug.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FrameError::Io(_) | FrameError::ConnectionClosed)
    }
}

/// Errors raised by a frame type while reading or writing its payload fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// The payload ended before a field could be read.
    #[error("payload truncated reading {field} (needed {needed} bytes, {remaining} remaining)")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// A byte does not map to any variant of the field's enumeration.
    #[error("invalid value 0x{value:02x} for {field}")]
    InvalidEnumValue { field: &'static str, value: u8 },

    /// A variable-length payload does not match the size implied by its own counters.
    #[error("invalid length for {field} (expected {expected}, got {actual})")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A string does not fit into its fixed-width field.
    #[error("{field} too long ({len} bytes, max {max})")]
    StringTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A string field is not valid UTF-8, or holds a NUL that padding would swallow.
    #[error("{field} is not a valid NUL-free UTF-8 string")]
    InvalidString { field: &'static str },

    /// A list entry does not fit the field's range.
    #[error("entry {value} out of range for {field} (max {max})")]
    EntryOutOfRange {
        field: &'static str,
        value: usize,
        max: usize,
    },

    /// A set-like list is not strictly ascending (duplicates included).
    #[error("entries in {field} must be strictly ascending")]
    UnsortedEntries { field: &'static str },

    /// More entries than a fixed-size list can carry.
    #[error("too many entries in {field} ({count}, max {max})")]
    TooManyEntries {
        field: &'static str,
        count: usize,
        max: usize,
    },
}

pub type Result<T> = std::result::Result<T, FrameError>;
