//! The FoE session drivers and frame codec.

mod exchange;
mod headers;
mod read;
mod services;
mod write;

use crate::{fmt, transport::MailboxTransport};
use core::time::Duration;

pub use headers::{FoeErrorCode, FoeHeader, FoeOpCode, FoeService};
pub use services::FoeFrame;

/// Progress callback, invoked after every successfully exchanged data segment.
///
/// Arguments are the SubDevice's configured address, the packet number of the segment, and a
/// byte count: cumulative bytes received for reads, bytes still to be sent for writes. The
/// callback is advisory only.
pub type ProgressHook = fn(configured_address: u16, packet_number: u32, bytes: usize);

/// Configuration for a [`FoeClient`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FoeConfig {
    /// Timeout for placing a single outbound frame in a SubDevice's write mailbox.
    ///
    /// This bounds the `send` side of each mailbox cycle; the receive side is bounded by the
    /// timeout passed to each transfer. Defaults to 2 ms.
    pub send_timeout: Duration,
}

impl Default for FoeConfig {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_micros(2000),
        }
    }
}

/// Drives FoE transfers over a [`MailboxTransport`].
///
/// One client can serve transfers to any number of SubDevices, but transfers are strictly
/// sequential — the protocol is blocking and half-duplex, and each [`SubDevice`] carries
/// session state (the mailbox counter) that concurrent transfers would corrupt.
///
/// [`SubDevice`]: crate::SubDevice
pub struct FoeClient<M> {
    pub(crate) transport: M,
    pub(crate) config: FoeConfig,
    pub(crate) hook: Option<ProgressHook>,
}

impl<M> FoeClient<M>
where
    M: MailboxTransport,
{
    /// Create a client over the given transport with default configuration.
    pub fn new(transport: M) -> Self {
        Self::with_config(transport, FoeConfig::default())
    }

    /// Create a client over the given transport.
    pub const fn with_config(transport: M, config: FoeConfig) -> Self {
        Self {
            transport,
            config,
            hook: None,
        }
    }

    /// Install a progress callback, replacing any previous one.
    pub fn set_progress_hook(&mut self, hook: ProgressHook) {
        self.hook = Some(hook);
    }

    /// Remove the progress callback.
    pub fn clear_progress_hook(&mut self) {
        self.hook = None;
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &M {
        &self.transport
    }

    /// Mutably borrow the underlying transport.
    pub fn transport_mut(&mut self) -> &mut M {
        &mut self.transport
    }

    /// Consume the client, returning the underlying transport.
    pub fn into_transport(self) -> M {
        self.transport
    }
}

/// Truncate a file name to what fits in a single request frame.
///
/// Truncation is silent on the wire, so log it to keep it observable.
pub(crate) fn clamp_filename(filename: &str, max_segment: usize) -> &[u8] {
    let raw = filename.as_bytes();

    if raw.len() > max_segment {
        fmt::warn!(
            "file name truncated from {} to {} bytes",
            raw.len(),
            max_segment
        );

        &raw[..max_segment]
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_sanity_check() {
        assert_eq!(
            FoeConfig::default().send_timeout,
            Duration::from_micros(2000)
        );
    }

    #[test]
    fn clamp_filename_truncates() {
        assert_eq!(clamp_filename("firmware.bin", 116), b"firmware.bin");
        assert_eq!(clamp_filename("firmware.bin", 8), b"firmware");
        assert_eq!(clamp_filename("", 116), b"");
    }
}
