//! Input (swipe) report reception.

use tracing::trace;

use hid_magtek_protocol::ReportLayout;

use crate::error::{Error, Result};
use crate::hex::hex_dump;
use crate::transport::HidTransport;

/// Wait applied to follow-up reads once the first chunk of a report has
/// arrived. The remainder of an in-flight report follows promptly; a stall
/// here means the transfer broke.
const IN_PROGRESS_TIMEOUT_MS: i32 = 500;

/// Receive buffer for one swipe report, sized from the parsed descriptor.
/// Input reports carry no report-id byte.
pub(crate) struct InputReport {
    buf: Vec<u8>,
}

impl InputReport {
    pub(crate) fn new(layout: &ReportLayout) -> Self {
        Self {
            buf: vec![0; layout.size_bytes()],
        }
    }

    /// Reads one full report, accumulating partial transfers.
    ///
    /// The caller's `timeout_ms` covers only the wait for the first chunk;
    /// once data starts arriving each follow-up read gets a short fixed
    /// timeout. A zero-length read ends accumulation early.
    pub(crate) fn receive(
        &mut self,
        transport: &mut dyn HidTransport,
        timeout_ms: i32,
    ) -> Result<()> {
        let mut total = 0;
        let mut timeout = timeout_ms;

        while total < self.buf.len() {
            let n = transport.read_input_report(&mut self.buf[total..], timeout)?;
            if n == 0 {
                break;
            }
            trace!("input chunk ({n} bytes): {}", hex_dump(&self.buf[total..total + n]));
            total += n;
            timeout = IN_PROGRESS_TIMEOUT_MS;
        }

        if timeout_ms >= 0 && total == 0 {
            return Err(Error::TimedOut);
        }
        if total != self.buf.len() {
            return Err(Error::UnexpectedFormat(format!(
                "input report ended after {total} of {} bytes",
                self.buf.len()
            )));
        }
        Ok(())
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
