//! Device sessions and vendor commands.

use std::sync::Arc;

use tracing::{debug, trace};

use hid_magtek_protocol::ids::{command, property};
use hid_magtek_protocol::{
    parse_report_descriptor, DescriptorContext, ReaderState, ReaderStateAntecedent, SecurityLevel,
    TrackIdEnable,
};

use crate::error::{Error, Result};
use crate::feature::FeatureReport;
use crate::input::InputReport;
use crate::swipe::SwipeReport;
use crate::transport::{HidPort, HidTransport};

/// Upper bound hidapi places on a report descriptor.
const DESCRIPTOR_BUF_SIZE: usize = 4096;

/// Identity of an attached reader, as reported by enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Platform-specific path used to open the device.
    pub path: String,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

/// DUKPT serial number and transaction counter reported by the encryption
/// counter command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionCounter {
    pub serial_number: String,
    pub counter: u32,
}

struct Session {
    transport: Box<dyn HidTransport>,
    descriptor: Arc<DescriptorContext>,
    feature: FeatureReport,
}

/// One MagTek reader.
///
/// Opening is refcounted: nested `open` calls are cheap and the underlying
/// HID connection closes only when the last `close` lands. A `Device` is not
/// `Sync`; callers serialize access themselves.
pub struct Device {
    port: Arc<dyn HidPort>,
    info: DeviceInfo,
    session: Option<Session>,
    open_count: u32,
}

impl Device {
    pub fn new(port: Arc<dyn HidPort>, info: DeviceInfo) -> Self {
        Self {
            port,
            info,
            session: None,
            open_count: 0,
        }
    }

    /// Lists attached readers on `port` as unopened devices.
    pub fn enumerate(port: Arc<dyn HidPort>) -> Result<Vec<Device>> {
        let devices = port
            .enumerate()?
            .into_iter()
            .map(|info| Device::new(Arc::clone(&port), info))
            .collect();
        Ok(devices)
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn is_open(&self) -> bool {
        self.open_count > 0
    }

    /// Opens the device: connects the transport, fetches and parses the
    /// report descriptor, and sets up the command channel. Idempotent; each
    /// call must be paired with a [`close`](Self::close).
    pub fn open(&mut self) -> Result<()> {
        if self.open_count > 0 {
            self.open_count += 1;
            return Ok(());
        }

        let mut transport = self.port.open(&self.info)?;

        let mut buf = vec![0u8; DESCRIPTOR_BUF_SIZE];
        let n = transport.read_report_descriptor(&mut buf)?;
        trace!("report descriptor: {} bytes", n);
        let descriptor = Arc::new(parse_report_descriptor(&buf[..n])?);

        let feature = FeatureReport::new(descriptor.feature());
        self.session = Some(Session {
            transport,
            descriptor,
            feature,
        });
        self.open_count = 1;
        debug!(
            "opened {} (input {} bytes, feature {} bytes)",
            self.info.path,
            self.session()?.descriptor.input().size_bytes(),
            self.session()?.descriptor.feature().size_bytes(),
        );
        Ok(())
    }

    /// Drops one open reference; the connection closes when the count hits
    /// zero. Extra calls on a closed device are ignored.
    pub fn close(&mut self) {
        match self.open_count {
            0 => {}
            1 => {
                self.session = None;
                self.open_count = 0;
                debug!("closed {}", self.info.path);
            }
            _ => self.open_count -= 1,
        }
    }

    /// Layout tables parsed from the device's report descriptor.
    pub fn descriptor(&self) -> Result<&DescriptorContext> {
        Ok(&self.session()?.descriptor)
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(Error::NotOpen)
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        self.session.as_mut().ok_or(Error::NotOpen)
    }

    /// Runs one feature report command and returns its response payload.
    fn command(&mut self, command_id: u8, data: &[u8]) -> Result<&[u8]> {
        let session = self.session_mut()?;
        session.feature.set_request(command_id, data)?;
        session.feature.send_receive(session.transport.as_mut())?;
        Ok(session.feature.response_data())
    }

    /// Runs an arbitrary vendor command. Escape hatch for commands without a
    /// typed wrapper, such as the key update sequences issued by key
    /// injection tooling.
    pub fn run_command(&mut self, command_id: u8, data: &[u8]) -> Result<Vec<u8>> {
        Ok(self.command(command_id, data)?.to_vec())
    }

    fn read_property(&mut self, property_id: u8) -> Result<Vec<u8>> {
        Ok(self.command(command::GET_PROPERTY, &[property_id])?.to_vec())
    }

    /// Reads a string-valued property.
    pub fn read_property_string(&mut self, property_id: u8) -> Result<String> {
        let raw = self.read_property(property_id)?;
        Ok(String::from_utf8_lossy(&raw)
            .trim_end_matches('\0')
            .to_string())
    }

    /// Reads a single-byte property.
    pub fn read_property_byte(&mut self, property_id: u8) -> Result<u8> {
        let raw = self.read_property(property_id)?;
        let &[value] = raw.as_slice() else {
            return Err(Error::UnexpectedFormat(format!(
                "property {property_id:#04x} returned {} bytes, expected 1",
                raw.len()
            )));
        };
        Ok(value)
    }

    /// Writes a property value. Most properties require security level 2
    /// and persist across power cycles.
    pub fn write_property(&mut self, property_id: u8, value: &[u8]) -> Result<()> {
        let mut payload = Vec::with_capacity(1 + value.len());
        payload.push(property_id);
        payload.extend_from_slice(value);
        self.command(command::SET_PROPERTY, &payload)?;
        Ok(())
    }

    pub fn software_id(&mut self) -> Result<String> {
        self.read_property_string(property::SOFTWARE_ID)
    }

    pub fn usb_serial_number(&mut self) -> Result<String> {
        self.read_property_string(property::USB_SERIAL_NUMBER)
    }

    pub fn polling_interval(&mut self) -> Result<u8> {
        self.read_property_byte(property::POLLING_INTERVAL)
    }

    pub fn device_serial_number(&mut self) -> Result<String> {
        self.read_property_string(property::DEVICE_SERIAL_NUMBER)
    }

    pub fn magnesafe_version(&mut self) -> Result<String> {
        self.read_property_string(property::MAGNESAFE_VERSION_NUMBER)
    }

    pub fn track_id_enable(&mut self) -> Result<TrackIdEnable> {
        Ok(TrackIdEnable::from_byte(
            self.read_property_byte(property::TRACK_ID_ENABLE)?,
        ))
    }

    pub fn iso_track_mask(&mut self) -> Result<String> {
        self.read_property_string(property::ISO_TRACK_MASK)
    }

    pub fn aamva_track_mask(&mut self) -> Result<String> {
        self.read_property_string(property::AAMVA_TRACK_MASK)
    }

    pub fn max_packet_size(&mut self) -> Result<u8> {
        self.read_property_byte(property::MAX_PACKET_SIZE)
    }

    /// Power-cycles the reader. The device drops off the bus and
    /// re-enumerates; the current session is left for the caller to close.
    pub fn reset(&mut self) -> Result<()> {
        self.command(command::RESET_DEVICE, &[])?;
        Ok(())
    }

    /// Reads the DUKPT key serial number and transaction counter: 59 bits of
    /// KSN followed by a 21 bit counter, packed into 10 bytes.
    pub fn dukpt_ksn_and_counter(&mut self) -> Result<[u8; 10]> {
        let data = self.command(command::GET_DUKPT_KSN_AND_COUNTER, &[])?;
        let ksn: [u8; 10] = data.try_into().map_err(|_| {
            Error::UnexpectedFormat(format!("KSN response of {} bytes, expected 10", data.len()))
        })?;
        Ok(ksn)
    }

    /// Sets the session id included in subsequent encrypted swipe reports,
    /// big-endian. Takes effect on the next authenticated swipe.
    pub fn set_session_id(&mut self, session_id: u64) -> Result<()> {
        self.command(command::SET_SESSION_ID, &session_id.to_be_bytes())?;
        Ok(())
    }

    /// Reads the reader's state machine position and the event that led
    /// there.
    pub fn reader_state(&mut self) -> Result<(ReaderState, ReaderStateAntecedent)> {
        let data = self.command(command::GET_READER_STATE, &[])?;
        let &[state, antecedent] = data else {
            return Err(Error::UnexpectedFormat(format!(
                "reader state response of {} bytes, expected 2",
                data.len()
            )));
        };
        Ok((
            ReaderState::from_u8(state),
            ReaderStateAntecedent::from_u8(antecedent),
        ))
    }

    pub fn security_level(&mut self) -> Result<SecurityLevel> {
        let data = self.command(command::GET_SECURITY_LEVEL, &[])?;
        let &[level] = data else {
            return Err(Error::UnexpectedFormat(format!(
                "security level response of {} bytes, expected 1",
                data.len()
            )));
        };
        Ok(SecurityLevel::from_u8(level))
    }

    /// Reads the device serial number and encryption counter: 16 bytes of
    /// ASCII serial followed by a 3 byte little-endian counter.
    pub fn encryption_counter(&mut self) -> Result<EncryptionCounter> {
        let data = self.command(command::GET_ENCRYPTION_COUNTER, &[])?;
        if data.len() != 19 {
            return Err(Error::UnexpectedFormat(format!(
                "encryption counter response of {} bytes, expected 19",
                data.len()
            )));
        }
        let serial_number = String::from_utf8_lossy(&data[..16])
            .trim_end_matches('\0')
            .to_string();
        let counter =
            u32::from(data[16]) | (u32::from(data[17]) << 8) | (u32::from(data[18]) << 16);
        Ok(EncryptionCounter {
            serial_number,
            counter,
        })
    }

    /// Reads the 36 byte update token consumed by MagTek's key management
    /// services when remotely rekeying a reader.
    pub fn magtek_update_token(&mut self) -> Result<[u8; 36]> {
        let data = self.command(command::GET_MAGTEK_UPDATE_TOKEN, &[])?;
        let token: [u8; 36] = data.try_into().map_err(|_| {
            Error::UnexpectedFormat(format!(
                "update token response of {} bytes, expected 36",
                data.len()
            ))
        })?;
        Ok(token)
    }

    /// Waits up to `timeout_ms` milliseconds for a card swipe and returns
    /// the decoded report. Negative timeout blocks until a swipe arrives.
    pub fn wait_swipe_report(&mut self, timeout_ms: i32) -> Result<SwipeReport> {
        let session = self.session_mut()?;
        let descriptor = Arc::clone(&session.descriptor);

        let mut input = InputReport::new(descriptor.input());
        input.receive(session.transport.as_mut(), timeout_ms)?;
        Ok(SwipeReport::new(descriptor, input.into_bytes()))
    }
}
