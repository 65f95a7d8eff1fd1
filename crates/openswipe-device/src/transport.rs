//! HID transport traits.
//!
//! [`HidTransport`] is the seam between the session layer and the OS HID
//! stack: four operations, each mapping onto one HID transfer type. The
//! hidapi-backed implementation lives in [`crate::hid`]; [`mock`] provides a
//! scripted in-memory implementation for tests.

use crate::device::DeviceInfo;
use crate::error::Result;

/// One open HID connection to a reader.
///
/// Feature report buffers passed through this trait carry a leading
/// report-id byte; input report buffers do not.
pub trait HidTransport: Send {
    /// Sends a feature report. `data[0]` is the report id.
    fn send_feature_report(&mut self, data: &[u8]) -> Result<()>;

    /// Reads a feature report into `buf` and returns the number of bytes
    /// the device produced. `buf[0]` selects the report id on entry.
    fn get_feature_report(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Reads an interrupt (input) transfer into `buf`, waiting at most
    /// `timeout_ms` milliseconds. Negative timeout blocks indefinitely.
    /// Returns the number of bytes read; zero means the wait expired.
    fn read_input_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize>;

    /// Reads the device's HID report descriptor into `buf` and returns its
    /// length.
    fn read_report_descriptor(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// Factory for transports: device discovery plus connection setup.
pub trait HidPort: Send + Sync {
    /// Lists attached readers.
    fn enumerate(&self) -> Result<Vec<DeviceInfo>>;

    /// Opens a transport to the device at `info.path`.
    fn open(&self, info: &DeviceInfo) -> Result<Box<dyn HidTransport>>;
}

pub mod mock {
    //! Scripted transport for tests. No hardware, no OS HID stack.

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::{DeviceInfo, HidPort, HidTransport};
    use crate::error::{Error, Result};

    /// One scripted outcome for a `read_input_report` call.
    pub enum InputStep {
        /// Bytes arrive.
        Data(Vec<u8>),
        /// The wait expires with nothing read.
        Nothing,
        /// The read fails at the transport level.
        Error(String),
    }

    #[derive(Default)]
    struct Inner {
        descriptor: Vec<u8>,
        feature_responses: VecDeque<Vec<u8>>,
        sent_features: Vec<Vec<u8>>,
        input_steps: VecDeque<InputStep>,
    }

    /// Clonable scripted transport. Clones share state, so a test can keep
    /// one handle for scripting while the device under test owns another.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        inner: Arc<Mutex<Inner>>,
    }

    impl MockTransport {
        pub fn new(descriptor: &[u8]) -> Self {
            let transport = Self::default();
            {
                let mut inner = transport.inner.lock().unwrap_or_else(|e| e.into_inner());
                inner.descriptor = descriptor.to_vec();
            }
            transport
        }

        /// Queues the full response buffer for one future feature report
        /// exchange.
        pub fn queue_feature_response(&self, response: Vec<u8>) {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.feature_responses.push_back(response);
        }

        /// Queues the outcome of one future input report read.
        pub fn queue_input(&self, step: InputStep) {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.input_steps.push_back(step);
        }

        /// Every feature report sent so far, in order.
        pub fn sent_feature_reports(&self) -> Vec<Vec<u8>> {
            let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.sent_features.clone()
        }
    }

    impl HidTransport for MockTransport {
        fn send_feature_report(&mut self, data: &[u8]) -> Result<()> {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.sent_features.push(data.to_vec());
            Ok(())
        }

        fn get_feature_report(&mut self, buf: &mut [u8]) -> Result<usize> {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            let response = inner
                .feature_responses
                .pop_front()
                .ok_or_else(|| Error::ReadFailed("no scripted feature response".to_string()))?;
            let n = response.len().min(buf.len());
            buf[..n].copy_from_slice(&response[..n]);
            Ok(n)
        }

        fn read_input_report(&mut self, buf: &mut [u8], _timeout_ms: i32) -> Result<usize> {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            match inner.input_steps.pop_front() {
                Some(InputStep::Data(data)) => {
                    let n = data.len().min(buf.len());
                    buf[..n].copy_from_slice(&data[..n]);
                    Ok(n)
                }
                Some(InputStep::Nothing) | None => Ok(0),
                Some(InputStep::Error(message)) => Err(Error::ReportFailed(message)),
            }
        }

        fn read_report_descriptor(&mut self, buf: &mut [u8]) -> Result<usize> {
            let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            let n = inner.descriptor.len().min(buf.len());
            buf[..n].copy_from_slice(&inner.descriptor[..n]);
            Ok(n)
        }
    }

    /// Port serving a fixed set of scripted devices, matched by path.
    #[derive(Default)]
    pub struct MockPort {
        devices: Vec<(DeviceInfo, MockTransport)>,
    }

    impl MockPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_device(&mut self, info: DeviceInfo, transport: MockTransport) {
            self.devices.push((info, transport));
        }
    }

    impl HidPort for MockPort {
        fn enumerate(&self) -> Result<Vec<DeviceInfo>> {
            Ok(self.devices.iter().map(|(info, _)| info.clone()).collect())
        }

        fn open(&self, info: &DeviceInfo) -> Result<Box<dyn HidTransport>> {
            self.devices
                .iter()
                .find(|(candidate, _)| candidate.path == info.path)
                .map(|(_, transport)| Box::new(transport.clone()) as Box<dyn HidTransport>)
                .ok_or_else(|| Error::NotFound(info.path.clone()))
        }
    }
}
