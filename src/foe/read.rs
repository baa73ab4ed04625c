use crate::{
    error::{Error, FoeError, MailboxError},
    fmt,
    foe::{exchange::MailboxExchange, services, FoeClient, FoeFrame},
    subdevice::SubDevice,
    transport::MailboxTransport,
};
use core::time::Duration;

impl<M> FoeClient<M>
where
    M: MailboxTransport,
{
    /// Read the file `filename` from the SubDevice into `buf`, blocking until the transfer
    /// completes.
    ///
    /// `timeout` bounds each individual mailbox cycle, not the transfer as a whole. `password`
    /// is forwarded opaquely; pass `0` if the device doesn't use one.
    ///
    /// On success, returns the number of bytes read. On failure, segments accepted before the
    /// error remain in `buf`; a segment that would overflow `buf` or break the packet sequence
    /// is rejected *before* it is copied.
    pub fn read(
        &mut self,
        subdevice: &SubDevice,
        filename: &str,
        password: u32,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, Error> {
        let max_segment = usize::from(subdevice.max_segment_len());

        if max_segment == 0 {
            return Err(Error::Mailbox(MailboxError::NoMailbox));
        }

        let hook = self.hook;
        let send_timeout = self.config.send_timeout;

        let mut exchange = MailboxExchange::new(&mut self.transport);

        exchange.drain(subdevice);

        let name = super::clamp_filename(filename, max_segment);

        fmt::debug!(
            "FoE read from {:#06x}, file name {} bytes",
            subdevice.configured_address(),
            name.len()
        );

        let request = services::read_request(subdevice.mailbox_counter(), password, name.len() as u16);

        exchange.send_frame(subdevice, request, name, send_timeout)?;

        let mut prev_packet = 0u32;
        let mut bytes_read = 0usize;

        loop {
            let (packet_number, segment_len) = {
                match FoeFrame::parse(exchange.receive(subdevice, timeout)?)? {
                    FoeFrame::Data {
                        packet_number,
                        data,
                    } => {
                        // Sequence and fit are checked before the copy so a bad segment never
                        // lands in the caller's buffer
                        if packet_number != prev_packet + 1
                            || bytes_read + data.len() > buf.len()
                        {
                            fmt::error!(
                                "FoE data packet {} (expected {}) of {} bytes rejected at offset {}",
                                packet_number,
                                prev_packet + 1,
                                data.len(),
                                bytes_read
                            );

                            return Err(FoeError::BufferTooSmall.into());
                        }

                        buf[bytes_read..bytes_read + data.len()].copy_from_slice(data);

                        bytes_read += data.len();
                        prev_packet = packet_number;

                        (packet_number, data.len())
                    }
                    FoeFrame::Error { code, .. } => {
                        fmt::error!("FoE read aborted by device");

                        return Err(FoeError::Aborted { code }.into());
                    }
                    _ => return Err(FoeError::UnexpectedResponse.into()),
                }
            };

            let ack = services::ack(subdevice.mailbox_counter(), packet_number);

            exchange.send_frame(subdevice, ack, &[], send_timeout)?;

            if let Some(hook) = hook {
                hook(subdevice.configured_address(), packet_number, bytes_read);
            }

            fmt::trace!(
                "FoE read packet {}, {} bytes, {} total",
                packet_number,
                segment_len,
                bytes_read
            );

            // EOF is a segment shorter than the negotiated maximum
            if segment_len != max_segment {
                break;
            }
        }

        fmt::debug!("FoE read complete, {} bytes", bytes_read);

        Ok(bytes_read)
    }
}
