//! hidapi-backed transport.

use std::ffi::CString;
use std::sync::{Arc, Mutex};

use hidapi::{HidApi, HidDevice};
use tracing::debug;

use hid_magtek_protocol::MAGTEK_VENDOR_ID;

use crate::device::DeviceInfo;
use crate::error::{Error, Result};
use crate::transport::{HidPort, HidTransport};

/// Port over the process-wide hidapi context.
///
/// hidapi requires enumeration and open to go through one context; the
/// context is not thread safe, so it sits behind a mutex. Opened devices are
/// independent of the context and need no further locking.
pub struct HidApiPort {
    api: Arc<Mutex<HidApi>>,
}

impl HidApiPort {
    pub fn new() -> Result<Self> {
        let api = HidApi::new().map_err(|e| Error::Internal(e.to_string()))?;
        Ok(Self {
            api: Arc::new(Mutex::new(api)),
        })
    }
}

impl HidPort for HidApiPort {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>> {
        let mut api = self.api.lock().unwrap_or_else(|e| e.into_inner());
        api.refresh_devices()
            .map_err(|e| Error::Internal(e.to_string()))?;

        let devices: Vec<DeviceInfo> = api
            .device_list()
            .filter(|info| info.vendor_id() == MAGTEK_VENDOR_ID)
            .map(|info| DeviceInfo {
                vendor_id: info.vendor_id(),
                product_id: info.product_id(),
                path: info.path().to_string_lossy().into_owned(),
                serial_number: info.serial_number().map(str::to_owned),
                manufacturer: info.manufacturer_string().map(str::to_owned),
                product: info.product_string().map(str::to_owned),
            })
            .collect();

        debug!("found {} MagTek reader(s)", devices.len());
        Ok(devices)
    }

    fn open(&self, info: &DeviceInfo) -> Result<Box<dyn HidTransport>> {
        let path = CString::new(info.path.as_str())
            .map_err(|_| Error::InvalidInput(format!("device path {:?}", info.path)))?;

        let api = self.api.lock().unwrap_or_else(|e| e.into_inner());
        let device = api
            .open_path(&path)
            .map_err(|e| Error::NotFound(format!("{}: {e}", info.path)))?;

        debug!("opened {}", info.path);
        Ok(Box::new(HidApiTransport { device }))
    }
}

struct HidApiTransport {
    device: HidDevice,
}

impl HidTransport for HidApiTransport {
    fn send_feature_report(&mut self, data: &[u8]) -> Result<()> {
        self.device
            .send_feature_report(data)
            .map_err(|e| Error::WriteFailed(e.to_string()))
    }

    fn get_feature_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.device
            .get_feature_report(buf)
            .map_err(|e| Error::ReadFailed(e.to_string()))
    }

    fn read_input_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize> {
        self.device
            .read_timeout(buf, timeout_ms)
            .map_err(|e| Error::ReportFailed(e.to_string()))
    }

    fn read_report_descriptor(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.device
            .get_report_descriptor(buf)
            .map_err(|e| Error::ReadFailed(e.to_string()))
    }
}
