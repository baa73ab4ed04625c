//! FoE service frame builders and the frame codec.

use crate::{
    error::{Error, FoeError, MailboxError},
    foe::headers::{FoeErrorCode, FoeHeader, FoeOpCode, FoeService},
    mailbox::{MailboxHeader, MailboxType, Priority},
};
use ethercrab_wire::{EtherCrabWireRead, EtherCrabWireSized, EtherCrabWireWrite};

fn service(counter: u8, op_code: FoeOpCode, argument: u32, payload_len: u16) -> FoeService {
    FoeService {
        header: MailboxHeader {
            // The length field counts the FoE header as well as the payload
            length: FoeHeader::PACKED_LEN as u16 + payload_len,
            address: 0x0000,
            priority: Priority::Lowest,
            mailbox_type: MailboxType::Foe,
            counter,
        },
        foe_header: FoeHeader { op_code, argument },
    }
}

/// A read request. The payload is the file name.
pub fn read_request(counter: u8, password: u32, filename_len: u16) -> FoeService {
    service(counter, FoeOpCode::Read, password, filename_len)
}

/// A write request. The payload is the file name.
pub fn write_request(counter: u8, password: u32, filename_len: u16) -> FoeService {
    service(counter, FoeOpCode::Write, password, filename_len)
}

/// A file data segment.
pub fn data(counter: u8, packet_number: u32, segment_len: u16) -> FoeService {
    service(counter, FoeOpCode::Data, packet_number, segment_len)
}

/// An acknowledgement of the given data packet.
pub fn ack(counter: u8, packet_number: u32) -> FoeService {
    service(counter, FoeOpCode::Ack, packet_number, 0)
}

/// Pack a service header and its payload into a mailbox buffer, returning the total frame
/// length.
pub(crate) fn encode_frame(
    service: &FoeService,
    payload: &[u8],
    buf: &mut [u8],
) -> Result<usize, Error> {
    let total = FoeService::PACKED_LEN + payload.len();

    if buf.len() < total {
        return Err(Error::Mailbox(MailboxError::TooLong {
            len: total,
            max: buf.len(),
        }));
    }

    service.pack_to_slice(buf)?;

    buf[FoeService::PACKED_LEN..total].copy_from_slice(payload);

    Ok(total)
}

/// A decoded FoE frame, borrowing its payload from the mailbox buffer it was parsed out of.
#[derive(Debug, PartialEq, Eq)]
pub enum FoeFrame<'buf> {
    /// A request to read the named file from the responding device.
    Read {
        /// Opaque password forwarded to the device.
        password: u32,
        /// Raw file name bytes.
        filename: &'buf [u8],
    },
    /// A request to write the named file to the responding device.
    Write {
        /// Opaque password forwarded to the device.
        password: u32,
        /// Raw file name bytes.
        filename: &'buf [u8],
    },
    /// A file data segment.
    ///
    /// A segment shorter than the negotiated maximum signals end of file.
    Data {
        /// One-based sequence number of this segment.
        packet_number: u32,
        /// Segment payload.
        data: &'buf [u8],
    },
    /// Acknowledgement of the data segment with the given packet number.
    Ack {
        /// The acknowledged packet number.
        packet_number: u32,
    },
    /// The sending side aborted the transfer.
    Error {
        /// FoE error code.
        code: FoeErrorCode,
        /// Optional human readable error description.
        text: &'buf [u8],
    },
    /// The device cannot keep up and asks for the previous data segment to be sent again.
    Busy,
}

impl<'buf> FoeFrame<'buf> {
    /// Parse a raw mailbox frame into an FoE frame.
    ///
    /// Any frame that does not carry the FoE mailbox type, or whose headers are malformed or
    /// inconsistent with the buffer length, is rejected with
    /// [`FoeError::UnexpectedResponse`] — mid-session that is a protocol violation whatever
    /// the cause.
    pub fn parse(raw: &'buf [u8]) -> Result<Self, Error> {
        let mailbox = MailboxHeader::unpack_from_slice(raw)
            .map_err(|_| FoeError::UnexpectedResponse)?;

        if mailbox.mailbox_type != MailboxType::Foe {
            return Err(FoeError::UnexpectedResponse.into());
        }

        let body_len = usize::from(mailbox.length);

        if body_len < FoeHeader::PACKED_LEN
            || MailboxHeader::PACKED_LEN + body_len > raw.len()
        {
            return Err(FoeError::UnexpectedResponse.into());
        }

        let foe_header = FoeHeader::unpack_from_slice(&raw[MailboxHeader::PACKED_LEN..])
            .map_err(|_| FoeError::UnexpectedResponse)?;

        let payload = &raw[FoeService::PACKED_LEN..][..body_len - FoeHeader::PACKED_LEN];

        Ok(match foe_header.op_code {
            FoeOpCode::Read => Self::Read {
                password: foe_header.argument,
                filename: payload,
            },
            FoeOpCode::Write => Self::Write {
                password: foe_header.argument,
                filename: payload,
            },
            FoeOpCode::Data => Self::Data {
                packet_number: foe_header.argument,
                data: payload,
            },
            FoeOpCode::Ack => Self::Ack {
                packet_number: foe_header.argument,
            },
            FoeOpCode::Error => Self::Error {
                code: decode_error_code(foe_header.argument),
                text: payload,
            },
            FoeOpCode::Busy => Self::Busy,
        })
    }
}

fn decode_error_code(raw: u32) -> FoeErrorCode {
    // The catch all variant makes this decode total
    crate::fmt::unwrap!(FoeErrorCode::unpack_from_slice(&raw.to_le_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn read_request_layout() {
        let headers = read_request(1, 0, 4);

        let mut buf = [0xaau8; 24];

        let len = encode_frame(&headers, b"boot", &mut buf).unwrap();

        assert_eq!(len, 16);
        assert_eq!(
            &buf[0..16],
            &[
                // Mailbox header: length 10, address 0, FoE type, counter 1
                0x0a, 0x00, 0x00, 0x00, 0x00, 0x14, //
                // FoE header: READ, password 0
                0x01, 0x00, 0x00, 0x00, 0x00, 0x00, //
                // File name
                b'b', b'o', b'o', b't',
            ]
        );
    }

    #[test]
    fn data_frame_layout() {
        let headers = data(7, 2, 3);

        let mut buf = [0u8; 16];

        let len = encode_frame(&headers, &[0xde, 0xad, 0xbe], &mut buf).unwrap();

        assert_eq!(len, 15);
        assert_eq!(
            &buf[0..15],
            &[
                0x09, 0x00, 0x00, 0x00, 0x00, 0x74, //
                0x03, 0x00, 0x02, 0x00, 0x00, 0x00, //
                0xde, 0xad, 0xbe,
            ]
        );
    }

    #[test]
    fn ack_has_no_payload() {
        let headers = ack(2, 1);

        let mut buf = [0u8; 16];

        let len = encode_frame(&headers, &[], &mut buf).unwrap();

        assert_eq!(len, 12);
        assert_eq!(
            &buf[0..12],
            &[
                0x06, 0x00, 0x00, 0x00, 0x00, 0x24, //
                0x04, 0x00, 0x01, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn frame_too_long_for_buffer() {
        let headers = data(1, 1, 8);

        let mut buf = [0u8; 16];

        assert_eq!(
            encode_frame(&headers, &[0u8; 8], &mut buf),
            Err(Error::Mailbox(MailboxError::TooLong { len: 20, max: 16 }))
        );
    }

    #[test]
    fn parse_data() {
        let raw = [
            0x0b, 0x00, 0x00, 0x00, 0x00, 0x34, //
            0x03, 0x00, 0x01, 0x00, 0x00, 0x00, //
            b'h', b'e', b'l', b'l', b'o', //
            // Trailing mailbox slack must be ignored
            0x00, 0x00, 0x00,
        ];

        assert_eq!(
            FoeFrame::parse(&raw),
            Ok(FoeFrame::Data {
                packet_number: 1,
                data: b"hello",
            })
        );
    }

    #[test]
    fn parse_error_frame() {
        let raw = [
            0x0a, 0x00, 0x00, 0x00, 0x00, 0x14, //
            0x05, 0x00, 0x01, 0x80, 0x00, 0x00, //
            b'g', b'o', b'n', b'e',
        ];

        assert_eq!(
            FoeFrame::parse(&raw),
            Ok(FoeFrame::Error {
                code: FoeErrorCode::NotFound,
                text: b"gone",
            })
        );
    }

    #[test]
    fn parse_rejects_non_foe_mailbox() {
        // A CoE mailbox must not be accepted mid FoE session
        let raw = [
            0x0a, 0x00, 0x00, 0x00, 0x00, 0x13, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        assert_eq!(
            FoeFrame::parse(&raw),
            Err(Error::Foe(FoeError::UnexpectedResponse))
        );
    }

    #[test]
    fn parse_rejects_truncated_frame() {
        // Header claims 32 bytes of body but the buffer holds 10
        let raw = [
            0x20, 0x00, 0x00, 0x00, 0x00, 0x14, //
            0x03, 0x00, 0x01, 0x00, 0x00, 0x00, //
            0x01, 0x02, 0x03, 0x04,
        ];

        assert_eq!(
            FoeFrame::parse(&raw),
            Err(Error::Foe(FoeError::UnexpectedResponse))
        );
    }

    #[test]
    fn parse_rejects_unknown_op_code() {
        let raw = [
            0x06, 0x00, 0x00, 0x00, 0x00, 0x14, //
            0x07, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        assert_eq!(
            FoeFrame::parse(&raw),
            Err(Error::Foe(FoeError::UnexpectedResponse))
        );
    }
}
