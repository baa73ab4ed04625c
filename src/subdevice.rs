use crate::{error::Error, fmt};
use core::sync::atomic::{AtomicU8, Ordering};

/// Length of the mailbox header plus the FoE header, in bytes.
///
/// Everything past this in a mailbox buffer is FoE payload.
pub(crate) const FOE_PREAMBLE: u16 = 12;

/// Per-device state needed to run FoE transfers against a single device on the network.
///
/// The FoE session drivers only need a device's configured station address, its advertised
/// mailbox capacity and the rolling mailbox counter, so this is deliberately a much smaller
/// record than a full master's SubDevice entry. Create one per device and keep it for as long
/// as the device stays configured — the mailbox counter must not be reset between transfers.
#[doc(alias = "Slave")]
#[derive(Debug)]
pub struct SubDevice {
    /// Configured station address.
    configured_address: u16,

    name: heapless::String<64>,

    /// Advertised mailbox capacity in octets.
    mailbox_len: u16,

    /// The 1-7 cyclic counter used when working with mailbox requests.
    mailbox_counter: AtomicU8,
}

impl SubDevice {
    /// Create a SubDevice record from its configured station address and advertised mailbox
    /// length.
    pub fn new(configured_address: u16, mailbox_len: u16) -> Self {
        Self {
            configured_address,
            name: heapless::String::new(),
            mailbox_len,
            mailbox_counter: AtomicU8::new(1),
        }
    }

    /// Set a human readable name for this SubDevice.
    pub fn set_name(&mut self, name: &str) -> Result<(), Error> {
        self.name.clear();

        self.name
            .push_str(name)
            .map_err(|_| Error::StringTooLong {
                max_length: self.name.capacity(),
                string_length: name.len(),
            })
    }

    /// Get the human readable name of the SubDevice.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get the configured station address of the SubDevice.
    pub fn configured_address(&self) -> u16 {
        self.configured_address
    }

    /// Get the SubDevice's advertised mailbox capacity in octets.
    pub fn mailbox_len(&self) -> u16 {
        self.mailbox_len
    }

    /// The largest FoE data segment this SubDevice will accept: the advertised mailbox length
    /// minus the fixed 12 byte mailbox + FoE preamble.
    ///
    /// Returns zero if the mailbox is too small to carry any FoE payload at all.
    pub fn max_segment_len(&self) -> u16 {
        self.mailbox_len.saturating_sub(FOE_PREAMBLE)
    }

    /// Return the current cyclic mailbox counter value, from 1-7.
    ///
    /// Calling this method internally increments the counter, so subequent calls will produce a
    /// new value.
    pub(crate) fn mailbox_counter(&self) -> u8 {
        fmt::unwrap!(
            self.mailbox_counter
                .fetch_update(Ordering::Release, Ordering::Acquire, |n| {
                    if n >= 7 {
                        Some(1)
                    } else {
                        Some(n + 1)
                    }
                })
        )
    }
}
