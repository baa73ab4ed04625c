use crate::{
    error::{Error, FoeError, MailboxError},
    fmt,
    foe::{exchange::MailboxExchange, services, FoeClient, FoeErrorCode, FoeFrame},
    subdevice::SubDevice,
    transport::MailboxTransport,
};
use core::time::Duration;

impl<M> FoeClient<M>
where
    M: MailboxTransport,
{
    /// Write `data` to the SubDevice as the file `filename`, blocking until the transfer
    /// completes.
    ///
    /// `timeout` bounds each individual mailbox cycle, not the transfer as a whole. `password`
    /// is forwarded opaquely; pass `0` if the device doesn't use one.
    ///
    /// The input is segmented to the SubDevice's negotiated maximum. End of file is a segment
    /// strictly shorter than that maximum, so an input that divides evenly into full segments
    /// (including an empty input) is terminated with an extra zero length segment. A `Busy`
    /// reply rewinds the transfer by exactly one segment and resends it; everything else the
    /// SubDevice can reply with either advances the transfer or aborts it.
    pub fn write(
        &mut self,
        subdevice: &SubDevice,
        filename: &str,
        password: u32,
        data: &[u8],
        timeout: Duration,
    ) -> Result<(), Error> {
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
            "FoE write to {:#06x}, {} bytes in segments of {}",
            subdevice.configured_address(),
            data.len(),
            max_segment
        );

        let request =
            services::write_request(subdevice.mailbox_counter(), password, name.len() as u16);

        exchange.send_frame(subdevice, request, name, send_timeout)?;

        // Last data packet number put on the wire. The write request itself is acknowledged
        // with packet number 0.
        let mut send_packet = 0u32;
        // Bytes of `data` consumed so far
        let mut cursor = 0usize;
        // Length of the segment behind `cursor`, needed to rewind on a busy reply
        let mut segment_len = 0usize;
        // An empty file must still be announced with a single zero length segment
        let mut do_final_zero = true;

        loop {
            let proceed = {
                match FoeFrame::parse(exchange.receive(subdevice, timeout)?)? {
                    FoeFrame::Ack { packet_number } => {
                        if packet_number != send_packet {
                            fmt::error!(
                                "FoE ack for packet {}, expected {}",
                                packet_number,
                                send_packet
                            );

                            return Err(FoeError::UnexpectedPacketNumber {
                                expected: send_packet,
                                received: packet_number,
                            }
                            .into());
                        }

                        if let Some(hook) = hook {
                            hook(
                                subdevice.configured_address(),
                                packet_number,
                                data.len() - cursor,
                            );
                        }

                        true
                    }
                    FoeFrame::Busy => {
                        if send_packet == 0 {
                            // Nothing sent yet, nothing to resend
                            false
                        } else {
                            fmt::debug!("FoE device busy, resending packet {}", send_packet);

                            cursor -= segment_len;
                            send_packet -= 1;

                            true
                        }
                    }
                    FoeFrame::Error { code, .. } => {
                        fmt::error!("FoE write aborted by device");

                        return Err(if code == FoeErrorCode::NotFound {
                            FoeError::FileNotFound.into()
                        } else {
                            FoeError::Aborted { code }.into()
                        });
                    }
                    _ => return Err(FoeError::UnexpectedResponse.into()),
                }
            };

            if !proceed {
                continue;
            }

            let remaining = data.len() - cursor;
            let segment = remaining.min(max_segment);

            if segment == 0 && !do_final_zero {
                break;
            }

            do_final_zero = false;
            segment_len = segment;

            let payload = &data[cursor..cursor + segment];

            cursor += segment;
            send_packet += 1;

            // A file that ends on a full segment needs an explicit zero length EOF packet
            if cursor == data.len() && segment_len == max_segment {
                do_final_zero = true;
            }

            let frame = services::data(subdevice.mailbox_counter(), send_packet, segment as u16);

            exchange.send_frame(subdevice, frame, payload, send_timeout)?;

            fmt::trace!(
                "FoE write packet {}, {} bytes, {} remaining",
                send_packet,
                segment,
                data.len() - cursor
            );
        }

        fmt::debug!("FoE write complete, {} bytes", data.len());

        Ok(())
    }
}
