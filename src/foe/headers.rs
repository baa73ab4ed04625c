//! FoE frame headers, defined in ETG1000.6 under "FoE Services".

use crate::mailbox::MailboxHeader;

/// FoE op code.
///
/// The first octet of every FoE frame, selecting how the rest of the frame is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ethercrab_wire::EtherCrabWireReadWrite)]
#[cfg_attr(test, derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum FoeOpCode {
    /// Read request: the master asks the SubDevice to send it a file.
    Read = 0x01,
    /// Write request: the master announces it will send a file.
    Write = 0x02,
    /// A file data segment.
    Data = 0x03,
    /// Acknowledgement of a data segment.
    Ack = 0x04,
    /// The transfer was aborted.
    Error = 0x05,
    /// The SubDevice cannot accept the previous data segment yet and asks for a resend.
    Busy = 0x06,
}

/// The fixed 6 byte FoE header following the mailbox header.
///
/// On the wire the four byte [`argument`](FoeHeader::argument) field is a password for
/// read/write requests, a packet number for data/ack frames and an error code for error frames.
/// [`FoeFrame`](crate::FoeFrame) gives those interpretations names; this struct is the raw
/// layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ethercrab_wire::EtherCrabWireReadWrite)]
#[cfg_attr(test, derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[wire(bytes = 6)]
pub struct FoeHeader {
    // One reserved byte follows the op code
    #[wire(bytes = 1, post_skip = 8)]
    pub op_code: FoeOpCode,
    /// Password, packet number or error code depending on `op_code`.
    #[wire(bytes = 4)]
    pub argument: u32,
}

/// The full fixed preamble of an FoE frame: mailbox header plus FoE header.
///
/// Payload bytes (file name, file data or error text) follow directly after this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ethercrab_wire::EtherCrabWireReadWrite)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[wire(bytes = 12)]
pub struct FoeService {
    #[wire(bytes = 6)]
    pub header: MailboxHeader,
    #[wire(bytes = 6)]
    pub foe_header: FoeHeader,
}

/// FoE error codes, defined in ETG1000.6 under "FoE Error Codes".
#[derive(Debug, Copy, Clone, PartialEq, Eq, ethercrab_wire::EtherCrabWireRead)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u32)]
pub enum FoeErrorCode {
    /// Not defined
    NotDefined = 0x8000,
    /// The file requested by a read, or targeted by a write, does not exist
    NotFound = 0x8001,
    /// Access denied
    AccessDenied = 0x8002,
    /// Not enough space left on the device to store the file
    DiskFull = 0x8003,
    /// Illegal operation
    Illegal = 0x8004,
    /// Packet number did not match the expected sequence
    PacketNumberWrong = 0x8005,
    /// The file already exists
    AlreadyExists = 0x8006,
    /// No user
    NoUser = 0x8007,
    /// The operation is only allowed while the device is in bootstrap mode
    BootstrapOnly = 0x8008,
    /// The requested file is not available in bootstrap mode
    NotInBootstrap = 0x8009,
    /// No access rights
    NoRights = 0x800a,
    /// A program error occurred on the device
    ProgramError = 0x800b,
    /// Vendor or profile specific error code.
    #[wire(catch_all)]
    Unknown(u32),
}

impl core::fmt::Display for FoeErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let num = u32::from(*self);

        f.write_fmt(format_args!("{:#06x}", num))?;
        f.write_str(": ")?;

        match self {
            Self::NotDefined => f.write_str("Not defined"),
            Self::NotFound => f.write_str("File not found"),
            Self::AccessDenied => f.write_str("Access denied"),
            Self::DiskFull => f.write_str("Disk full"),
            Self::Illegal => f.write_str("Illegal operation"),
            Self::PacketNumberWrong => f.write_str("Packet number wrong"),
            Self::AlreadyExists => f.write_str("File already exists"),
            Self::NoUser => f.write_str("No user"),
            Self::BootstrapOnly => f.write_str("Bootstrap mode only"),
            Self::NotInBootstrap => f.write_str("File not available in bootstrap mode"),
            Self::NoRights => f.write_str("No access rights"),
            Self::ProgramError => f.write_str("Program error"),
            Self::Unknown(_) => f.write_str("(unknown)"),
        }
    }
}
