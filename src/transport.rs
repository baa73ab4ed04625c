//! The mailbox transport consumed by the FoE session drivers.

use crate::{error::Error, subdevice::SubDevice};
use core::time::Duration;

/// A failed [`MailboxTransport::send`].
///
/// Sending a mailbox buffer transfers its ownership to the transport, but only on success. A
/// failed send hands the buffer back so the caller can release it, keeping the buffer pool
/// balanced on every path.
pub struct SendError<B> {
    /// The buffer that could not be sent.
    pub buffer: B,

    /// Why the send failed.
    pub error: Error,
}

impl<B> core::fmt::Debug for SendError<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SendError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// A blocking mailbox channel between the master and its SubDevices.
///
/// The FoE drivers are transport-agnostic: implement this trait over raw EtherCAT datagrams, a
/// vendor master stack, or a test double. Implementations manage their own buffer pool; the
/// drivers guarantee that every buffer obtained from [`acquire`](MailboxTransport::acquire) or
/// returned by [`receive`](MailboxTransport::receive) is either passed to
/// [`send`](MailboxTransport::send) or handed back through
/// [`release`](MailboxTransport::release) exactly once, on every path.
pub trait MailboxTransport {
    /// A mailbox-sized buffer from the transport's pool.
    type Buffer: AsRef<[u8]> + AsMut<[u8]>;

    /// Acquire a zeroed buffer at least as long as the target SubDevice's advertised mailbox.
    fn acquire(&mut self) -> Self::Buffer;

    /// Return a buffer to the pool.
    fn release(&mut self, buffer: Self::Buffer);

    /// Place a filled mailbox buffer into the SubDevice's write mailbox, blocking for up to
    /// `timeout`.
    ///
    /// On success the buffer is consumed by the transport. On failure it is returned inside the
    /// [`SendError`] and remains the caller's responsibility.
    fn send(
        &mut self,
        subdevice: &SubDevice,
        buffer: Self::Buffer,
        timeout: Duration,
    ) -> Result<(), SendError<Self::Buffer>>;

    /// Read the next frame from the SubDevice's read mailbox, blocking for up to `timeout`.
    ///
    /// Returns `Ok(None)` if the SubDevice produced nothing within the timeout. A zero timeout
    /// polls: it returns whatever is already pending, or `None`, without blocking.
    fn receive(
        &mut self,
        subdevice: &SubDevice,
        timeout: Duration,
    ) -> Result<Option<Self::Buffer>, Error>;
}
