//! Mailbox buffer handling shared by the FoE session drivers.

use crate::{
    error::Error,
    foe::{headers::FoeService, services},
    subdevice::SubDevice,
    transport::{MailboxTransport, SendError},
};
use core::time::Duration;

/// Owns the in-flight mailbox buffers for one transfer.
///
/// At most one inbound buffer is held at a time; outbound buffers only exist inside
/// [`send_frame`](MailboxExchange::send_frame). Dropping the exchange releases anything still
/// held, so every exit path out of a session driver — success, protocol error or transport
/// failure — returns all buffers to the transport's pool exactly once.
pub(crate) struct MailboxExchange<'t, M>
where
    M: MailboxTransport,
{
    transport: &'t mut M,
    inbound: Option<M::Buffer>,
}

impl<'t, M> MailboxExchange<'t, M>
where
    M: MailboxTransport,
{
    pub(crate) fn new(transport: &'t mut M) -> Self {
        Self {
            transport,
            inbound: None,
        }
    }

    /// Discard anything left over in the SubDevice's read mailbox from a previous session.
    ///
    /// Failures are ignored: a stale frame that can't be fetched now will be rejected by the
    /// session loop instead.
    pub(crate) fn drain(&mut self, subdevice: &SubDevice) {
        if let Ok(Some(stale)) = self.transport.receive(subdevice, Duration::ZERO) {
            self.transport.release(stale);
        }
    }

    /// Encode `headers` + `payload` into a fresh buffer and send it.
    ///
    /// The buffer is consumed by the transport on success and returned to the pool on failure.
    pub(crate) fn send_frame(
        &mut self,
        subdevice: &SubDevice,
        headers: FoeService,
        payload: &[u8],
        timeout: Duration,
    ) -> Result<(), Error> {
        let mut buffer = self.transport.acquire();

        if let Err(e) = services::encode_frame(&headers, payload, buffer.as_mut()) {
            self.transport.release(buffer);

            return Err(e);
        }

        match self.transport.send(subdevice, buffer, timeout) {
            Ok(()) => Ok(()),
            Err(SendError { buffer, error }) => {
                self.transport.release(buffer);

                Err(error)
            }
        }
    }

    /// Block until the SubDevice produces its next mailbox, releasing the previously received
    /// one.
    ///
    /// An empty mailbox after `timeout` is an [`Error::Timeout`]: mid-session the SubDevice is
    /// always expected to respond.
    pub(crate) fn receive(
        &mut self,
        subdevice: &SubDevice,
        timeout: Duration,
    ) -> Result<&[u8], Error> {
        if let Some(previous) = self.inbound.take() {
            self.transport.release(previous);
        }

        let buffer = self
            .transport
            .receive(subdevice, timeout)?
            .ok_or(Error::Timeout)?;

        Ok((*self.inbound.insert(buffer)).as_ref())
    }
}

impl<M> Drop for MailboxExchange<'_, M>
where
    M: MailboxTransport,
{
    fn drop(&mut self) {
        if let Some(buffer) = self.inbound.take() {
            self.transport.release(buffer);
        }
    }
}
