//! FoE transfer error types.

pub use crate::foe::FoeErrorCode;

/// A transfer error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Something timed out.
    ///
    /// During a transfer this means the SubDevice produced no mailbox within the caller's
    /// per-cycle timeout.
    Timeout,
    /// The FoE session was terminated by a protocol error or by the SubDevice.
    Foe(FoeError),
    /// A mailbox error was encountered.
    Mailbox(MailboxError),
    /// An error occurred encoding or decoding an item.
    Wire(ethercrab_wire::WireError),
    /// The transport failed to place a mailbox in the SubDevice.
    SendFrame,
    /// The transport failed to read a mailbox from the SubDevice.
    ReceiveFrame,
    /// A string was too long to fit in a fixed size buffer.
    StringTooLong {
        /// The length of the fixed size buffer.
        max_length: usize,
        /// The length of the input string.
        string_length: usize,
    },
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Timeout => f.write_str("timeout"),
            Error::Foe(e) => write!(f, "foe: {}", e),
            Error::Mailbox(e) => write!(f, "mailbox: {}", e),
            Error::Wire(e) => write!(f, "wire encode/decode error: {}", e),
            Error::SendFrame => f.write_str("failed to send mailbox frame"),
            Error::ReceiveFrame => f.write_str("failed to receive mailbox frame"),
            Error::StringTooLong {
                max_length,
                string_length,
            } => write!(
                f,
                "string of {} bytes is too long to fit in max storage of {} bytes",
                string_length, max_length
            ),
        }
    }
}

/// An FoE session error.
///
/// These map onto the failure modes of the FoE state machines; any of them terminates the
/// transfer immediately.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FoeError {
    /// An incoming data segment would overflow the caller's buffer, or arrived out of sequence.
    ///
    /// Both conditions are checked before any data is copied, so the caller's buffer holds
    /// exactly the segments accepted so far.
    BufferTooSmall,
    /// An acknowledgement carried a packet number other than that of the last sent data segment.
    UnexpectedPacketNumber {
        /// The packet number of the last data segment sent.
        expected: u32,
        /// The packet number the SubDevice acknowledged.
        received: u32,
    },
    /// The SubDevice has no file with the requested name.
    FileNotFound,
    /// The SubDevice aborted the transfer.
    Aborted {
        /// FoE error code sent by the SubDevice.
        code: FoeErrorCode,
    },
    /// The SubDevice sent an op code or mailbox type that is invalid at this point in the
    /// session.
    UnexpectedResponse,
}

impl core::fmt::Display for FoeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FoeError::BufferTooSmall => {
                f.write_str("data segment overflows buffer or is out of sequence")
            }
            FoeError::UnexpectedPacketNumber { expected, received } => {
                write!(
                    f,
                    "ack for packet {}, expected packet {}",
                    received, expected
                )
            }
            FoeError::FileNotFound => f.write_str("file not found"),
            FoeError::Aborted { code } => write!(f, "aborted by device: {}", code),
            FoeError::UnexpectedResponse => f.write_str("unexpected response"),
        }
    }
}

/// Mailbox error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MailboxError {
    /// The SubDevice's advertised mailbox is missing or too small to carry FoE.
    NoMailbox,
    /// A frame is too long to fit in a mailbox buffer.
    TooLong {
        /// Frame length in bytes.
        len: usize,
        /// Mailbox buffer capacity in bytes.
        max: usize,
    },
}

impl core::fmt::Display for MailboxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MailboxError::NoMailbox => f.write_str("device has no usable mailbox"),
            MailboxError::TooLong { len, max } => {
                write!(f, "frame of {} bytes exceeds mailbox length {}", len, max)
            }
        }
    }
}

impl From<FoeError> for Error {
    fn from(e: FoeError) -> Self {
        Self::Foe(e)
    }
}

impl From<MailboxError> for Error {
    fn from(e: MailboxError) -> Self {
        Self::Mailbox(e)
    }
}

impl From<ethercrab_wire::WireError> for Error {
    fn from(value: ethercrab_wire::WireError) -> Self {
        Self::Wire(value)
    }
}
