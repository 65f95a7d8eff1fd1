//! Feature report command channel.
//!
//! Commands and their responses travel in a single feature report sized by
//! the device's descriptor, plus one leading report-id byte (always zero).
//!
//! Request framing:  `[report_id, command, data_len, data...]`
//! Response framing: `[report_id, result_code, data_len, data...]`

use tracing::trace;

use hid_magtek_protocol::ids::result_code;
use hid_magtek_protocol::ReportLayout;

use crate::error::{Error, Result};
use crate::hex::hex_dump;
use crate::transport::HidTransport;

/// Bytes of framing shared by requests and responses: report id, command or
/// result code, data length.
const HEADER_LEN: usize = 3;

/// Reusable request/response buffer for the feature report channel.
///
/// One instance per session; the buffer is sized once from the parsed
/// descriptor and recycled across commands.
pub(crate) struct FeatureReport {
    buf: Vec<u8>,
}

impl FeatureReport {
    pub(crate) fn new(layout: &ReportLayout) -> Self {
        Self {
            buf: vec![0; 1 + layout.size_bytes()],
        }
    }

    fn reset(&mut self) {
        self.buf.fill(0);
    }

    /// Frames a request into the buffer.
    ///
    /// A descriptor may legally declare a feature report too small to carry
    /// the command header; such a device cannot speak this command protocol.
    pub(crate) fn set_request(&mut self, command: u8, data: &[u8]) -> Result<()> {
        if self.buf.len() < HEADER_LEN {
            return Err(Error::UnexpectedFormat(format!(
                "feature report of {} bytes cannot carry a {HEADER_LEN} byte command header",
                self.buf.len()
            )));
        }
        let capacity = self.buf.len() - HEADER_LEN;
        if data.len() > capacity {
            return Err(Error::InvalidInput(format!(
                "command payload of {} bytes exceeds the {capacity} byte report capacity",
                data.len()
            )));
        }

        self.reset();
        self.buf[1] = command;
        self.buf[2] = data.len() as u8;
        self.buf[HEADER_LEN..HEADER_LEN + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Sends the framed request and replaces the buffer contents with the
    /// device's response, mapping its result code to `Ok` or an error.
    pub(crate) fn send_receive(&mut self, transport: &mut dyn HidTransport) -> Result<()> {
        trace!("command request:  {}", hex_dump(&self.buf));
        transport.send_feature_report(&self.buf)?;

        self.reset();
        let n = transport.get_feature_report(&mut self.buf)?;
        trace!("command response: {}", hex_dump(&self.buf[..n]));

        if n != self.buf.len() {
            return Err(Error::ReadFailed(format!(
                "feature response of {n} bytes, expected {}",
                self.buf.len()
            )));
        }

        match self.buf[1] {
            result_code::SUCCESS => Ok(()),
            result_code::BAD_PARAMETER => Err(Error::Internal(
                "device rejected a request parameter".to_string(),
            )),
            result_code::DELAYED => Err(Error::Delayed),
            result_code::INVALID_OPERATION => Err(Error::InvalidOperation),
            code => Err(Error::Failed(code)),
        }
    }

    /// Response payload, bounded by both the declared length byte and the
    /// report size.
    pub(crate) fn response_data(&self) -> &[u8] {
        let declared = usize::from(self.buf[2]);
        let available = self.buf.len() - HEADER_LEN;
        &self.buf[HEADER_LEN..HEADER_LEN + declared.min(available)]
    }
}
