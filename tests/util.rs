//! A scripted mailbox transport so FoE transfers can be exercised without any hardware.
#![allow(dead_code)]

use foecrab::{error::Error, MailboxTransport, SendError, SubDevice};
use std::collections::VecDeque;
use std::time::Duration;

/// FoE op codes as raw wire values, for building simulated SubDevice replies.
pub mod op {
    pub const READ: u8 = 1;
    pub const WRITE: u8 = 2;
    pub const DATA: u8 = 3;
    pub const ACK: u8 = 4;
    pub const ERROR: u8 = 5;
    pub const BUSY: u8 = 6;
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A mailbox transport that records everything the driver sends and replays a pre-scripted
/// sequence of SubDevice replies.
///
/// The pool bookkeeping counts every buffer handed to the driver (acquired or received) and
/// every buffer handed back (released or successfully sent), so tests can assert the drivers
/// never leak or double-free a mailbox buffer.
pub struct ScriptedTransport {
    pub mailbox_len: usize,
    /// Frames the simulated SubDevice will produce, in order.
    pub inbound: VecDeque<Vec<u8>>,
    /// A frame already sitting in the SubDevice's read mailbox before the transfer starts,
    /// visible only to a zero timeout poll.
    pub stale: Option<Vec<u8>>,
    /// Raw frames the driver sent, in order.
    pub sent: Vec<Vec<u8>>,
    /// Fail the nth send attempt (zero based) with [`Error::SendFrame`].
    pub fail_send: Option<usize>,
    sends_attempted: usize,
    handed_out: usize,
    handed_back: usize,
}

impl ScriptedTransport {
    pub fn new(mailbox_len: usize, replies: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            mailbox_len,
            inbound: replies.into_iter().collect(),
            stale: None,
            sent: Vec::new(),
            fail_send: None,
            sends_attempted: 0,
            handed_out: 0,
            handed_back: 0,
        }
    }

    /// Every buffer handed to the driver must come back, either through `release` or by being
    /// consumed by a successful `send`.
    pub fn assert_pool_balanced(&self) {
        assert_eq!(
            self.handed_out,
            self.handed_back + self.sent.len(),
            "mailbox buffer pool is unbalanced"
        );
    }

    /// The op code, argument and payload of the nth sent frame.
    pub fn sent_frame(&self, index: usize) -> (u8, u32, Vec<u8>) {
        parse_frame(&self.sent[index])
    }

    /// Payloads of all sent DATA frames, in order.
    pub fn sent_data_payloads(&self) -> Vec<Vec<u8>> {
        self.sent
            .iter()
            .map(|raw| parse_frame(raw))
            .filter(|(op_code, _, _)| *op_code == op::DATA)
            .map(|(_, _, payload)| payload)
            .collect()
    }

    /// Session counters of all sent frames, in order.
    pub fn sent_counters(&self) -> Vec<u8> {
        self.sent.iter().map(|raw| raw[5] >> 4).collect()
    }
}

impl MailboxTransport for ScriptedTransport {
    type Buffer = Vec<u8>;

    fn acquire(&mut self) -> Vec<u8> {
        self.handed_out += 1;

        vec![0; self.mailbox_len]
    }

    fn release(&mut self, _buffer: Vec<u8>) {
        self.handed_back += 1;
    }

    fn send(
        &mut self,
        _subdevice: &SubDevice,
        buffer: Vec<u8>,
        _timeout: Duration,
    ) -> Result<(), SendError<Vec<u8>>> {
        let attempt = self.sends_attempted;

        self.sends_attempted += 1;

        if self.fail_send == Some(attempt) {
            return Err(SendError {
                buffer,
                error: Error::SendFrame,
            });
        }

        self.sent.push(buffer);

        Ok(())
    }

    fn receive(
        &mut self,
        _subdevice: &SubDevice,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>, Error> {
        // A zero timeout polls the mailbox as it is right now; scripted replies are only
        // produced in response to a request
        let frame = if timeout.is_zero() {
            self.stale.take()
        } else {
            self.inbound.pop_front()
        };

        Ok(frame.map(|frame| {
            self.handed_out += 1;

            frame
        }))
    }
}

/// Build a raw mailbox frame with an arbitrary mailbox type nibble.
pub fn mailbox_frame(
    mailbox_len: usize,
    mailbox_type: u8,
    op_code: u8,
    argument: u32,
    payload: &[u8],
) -> Vec<u8> {
    let mut frame = vec![0u8; mailbox_len];

    let length = 6 + payload.len() as u16;

    frame[0..2].copy_from_slice(&length.to_le_bytes());
    // Address and priority stay zero
    frame[5] = mailbox_type | (1 << 4);
    frame[6] = op_code;
    frame[8..12].copy_from_slice(&argument.to_le_bytes());
    frame[12..12 + payload.len()].copy_from_slice(payload);

    frame
}

/// Build an FoE frame as a simulated SubDevice would emit it.
pub fn foe_frame(mailbox_len: usize, op_code: u8, argument: u32, payload: &[u8]) -> Vec<u8> {
    mailbox_frame(mailbox_len, 0x04, op_code, argument, payload)
}

pub fn data_frame(mailbox_len: usize, packet_number: u32, payload: &[u8]) -> Vec<u8> {
    foe_frame(mailbox_len, op::DATA, packet_number, payload)
}

pub fn ack_frame(mailbox_len: usize, packet_number: u32) -> Vec<u8> {
    foe_frame(mailbox_len, op::ACK, packet_number, &[])
}

pub fn busy_frame(mailbox_len: usize) -> Vec<u8> {
    foe_frame(mailbox_len, op::BUSY, 0, &[])
}

pub fn error_frame(mailbox_len: usize, code: u32, text: &[u8]) -> Vec<u8> {
    foe_frame(mailbox_len, op::ERROR, code, text)
}

/// Split a raw frame into its op code, argument and payload.
pub fn parse_frame(raw: &[u8]) -> (u8, u32, Vec<u8>) {
    let length = u16::from_le_bytes([raw[0], raw[1]]) as usize;

    assert_eq!(raw[5] & 0x0f, 0x04, "driver sent a non-FoE mailbox");
    assert!(length >= 6, "driver sent a malformed FoE frame");

    (
        raw[6],
        u32::from_le_bytes(raw[8..12].try_into().unwrap()),
        raw[12..6 + length].to_vec(),
    )
}
