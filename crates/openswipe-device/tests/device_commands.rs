//! End-to-end device command and swipe tests over the scripted transport.

use std::sync::Arc;

use openswipe_device::protocol::ids::{command, input_usage, result_code};
use openswipe_device::transport::mock::{InputStep, MockPort, MockTransport};
use openswipe_device::{Device, DeviceInfo, Error, Track};

// Input: track 1 status (1), track 1 length (1), track 1 data (8),
// card encode type (1). Feature: 24 byte command channel.
const FEATURE_SIZE: usize = 24;
const INPUT_SIZE: usize = 11;

fn descriptor() -> Vec<u8> {
    vec![
        0x06, 0x00, 0xFF, // Usage page (vendor)
        0x09, 0x01, // Usage (application)
        0xA1, 0x01, // Collection (Application)
        0x75, 0x08, // Report size (8)
        0x09, input_usage::TRACK_1_DECODE_STATUS, 0x95, 0x01, 0x81, 0x02,
        0x09, input_usage::TRACK_1_ENCRYPTED_DATA_LENGTH, 0x95, 0x01, 0x81, 0x02,
        0x09, input_usage::TRACK_1_ENCRYPTED_DATA, 0x95, 0x08, 0x81, 0x02,
        0x09, input_usage::CARD_ENCODE_TYPE, 0x95, 0x01, 0x81, 0x02,
        0x09, 0x20, 0x95, FEATURE_SIZE as u8, 0xB1, 0x02,
        0xC0,
    ]
}

fn device_info() -> DeviceInfo {
    DeviceInfo {
        vendor_id: 0x0801,
        product_id: 0x0002,
        path: "/dev/hidraw7".to_string(),
        serial_number: Some("B123456".to_string()),
        manufacturer: Some("Mag-Tek".to_string()),
        product: Some("MagTek SCRA".to_string()),
    }
}

/// Device wired to a scripted transport, plus the scripting handle.
fn scripted_device() -> (Device, MockTransport) {
    let transport = MockTransport::new(&descriptor());
    let mut port = MockPort::new();
    port.add_device(device_info(), transport.clone());
    (Device::new(Arc::new(port), device_info()), transport)
}

/// Full feature response buffer carrying `data` under `result`.
fn response(result: u8, data: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; 1 + FEATURE_SIZE];
    buf[1] = result;
    buf[2] = data.len() as u8;
    buf[3..3 + data.len()].copy_from_slice(data);
    buf
}

#[test]
fn test_enumerate_lists_attached_readers() {
    let transport = MockTransport::new(&descriptor());
    let mut port = MockPort::new();
    port.add_device(device_info(), transport);

    let devices = Device::enumerate(Arc::new(port)).expect("enumeration succeeds");
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].info(), &device_info());
    assert!(!devices[0].is_open());
}

#[test]
fn test_open_parses_descriptor_and_refcounts() {
    let (mut device, _transport) = scripted_device();

    device.open().expect("device opens");
    assert!(device.is_open());
    assert_eq!(
        device.descriptor().expect("open").input().size_bytes(),
        INPUT_SIZE
    );
    assert_eq!(
        device.descriptor().expect("open").feature().size_bytes(),
        FEATURE_SIZE
    );

    // Nested open; the first close must not tear the session down.
    device.open().expect("nested open succeeds");
    device.close();
    assert!(device.is_open());
    device.close();
    assert!(!device.is_open());
    assert!(matches!(device.descriptor(), Err(Error::NotOpen)));

    // Extra close on a closed device is ignored.
    device.close();
    assert!(!device.is_open());
}

#[test]
fn test_open_rejects_bad_descriptor() {
    // Generic desktop usage page: the parse fails and the session rolls
    // back.
    let transport = MockTransport::new(&[0x05, 0x01]);
    let mut port = MockPort::new();
    port.add_device(device_info(), transport);
    let mut device = Device::new(Arc::new(port), device_info());

    assert!(matches!(device.open(), Err(Error::Descriptor(_))));
    assert!(!device.is_open());
}

#[test]
fn test_commands_on_undersized_feature_report_fail_cleanly() {
    // A single feature usage with count 1 parses fine, but the resulting
    // 1-byte report cannot frame a command. Commands must error, not panic.
    let desc = [
        0x06, 0x00, 0xFF, // Usage page (vendor)
        0x09, 0x01, // Usage (application)
        0xA1, 0x01, // Collection (Application)
        0x75, 0x08, // Report size (8)
        0x09, input_usage::TRACK_1_DECODE_STATUS, 0x95, 0x01, 0x81, 0x02,
        0x09, 0x20, 0x95, 0x01, 0xB1, 0x02, // feature: usage 0x20, count 1
        0xC0,
    ];
    let transport = MockTransport::new(&desc);
    let mut port = MockPort::new();
    port.add_device(device_info(), transport);
    let mut device = Device::new(Arc::new(port), device_info());

    device.open().expect("device opens");
    assert!(matches!(
        device.run_command(0x00, &[]),
        Err(Error::UnexpectedFormat(_))
    ));
    assert!(matches!(
        device.software_id(),
        Err(Error::UnexpectedFormat(_))
    ));
}

#[test]
fn test_commands_require_open_session() {
    let (mut device, _transport) = scripted_device();
    assert!(matches!(device.software_id(), Err(Error::NotOpen)));
    assert!(matches!(device.wait_swipe_report(100), Err(Error::NotOpen)));
}

#[test]
fn test_read_property_string() {
    let (mut device, transport) = scripted_device();
    device.open().expect("device opens");

    transport.queue_feature_response(response(result_code::SUCCESS, b"21042812B01"));
    assert_eq!(
        device.software_id().expect("device responds"),
        "21042812B01"
    );

    // Request framing: get property 0x00 with a one byte payload.
    let sent = transport.sent_feature_reports();
    assert_eq!(sent.len(), 1);
    assert_eq!(&sent[0][..4], &[0x00, command::GET_PROPERTY, 0x01, 0x00]);
    assert_eq!(sent[0].len(), 1 + FEATURE_SIZE);
}

#[test]
fn test_read_property_byte_checks_length() {
    let (mut device, transport) = scripted_device();
    device.open().expect("device opens");

    transport.queue_feature_response(response(result_code::SUCCESS, &[0x01]));
    assert_eq!(device.polling_interval().expect("device responds"), 1);

    transport.queue_feature_response(response(result_code::SUCCESS, &[0x01, 0x02]));
    assert!(matches!(
        device.polling_interval(),
        Err(Error::UnexpectedFormat(_))
    ));
}

#[test]
fn test_dukpt_ksn_requires_ten_bytes() {
    let (mut device, transport) = scripted_device();
    device.open().expect("device opens");

    let ksn = [0x90, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x04];
    transport.queue_feature_response(response(result_code::SUCCESS, &ksn));
    assert_eq!(device.dukpt_ksn_and_counter().expect("device responds"), ksn);

    transport.queue_feature_response(response(result_code::SUCCESS, &ksn[..9]));
    assert!(matches!(
        device.dukpt_ksn_and_counter(),
        Err(Error::UnexpectedFormat(_))
    ));
}

#[test]
fn test_set_session_id_sends_big_endian() {
    let (mut device, transport) = scripted_device();
    device.open().expect("device opens");

    transport.queue_feature_response(response(result_code::SUCCESS, &[]));
    device
        .set_session_id(0x0102030405060708)
        .expect("device responds");

    let sent = transport.sent_feature_reports();
    assert_eq!(
        &sent[0][..11],
        &[
            0x00,
            command::SET_SESSION_ID,
            0x08,
            0x01,
            0x02,
            0x03,
            0x04,
            0x05,
            0x06,
            0x07,
            0x08
        ]
    );
}

#[test]
fn test_encryption_counter_decoding() {
    let (mut device, transport) = scripted_device();
    device.open().expect("device opens");

    let mut data = Vec::new();
    data.extend_from_slice(b"ABCDEFGHIJKLMNOP");
    data.extend_from_slice(&[0x01, 0x00, 0x00]); // counter 1, little-endian
    transport.queue_feature_response(response(result_code::SUCCESS, &data));

    let counter = device.encryption_counter().expect("device responds");
    assert_eq!(counter.serial_number, "ABCDEFGHIJKLMNOP");
    assert_eq!(counter.counter, 1);

    transport.queue_feature_response(response(result_code::SUCCESS, b"short"));
    assert!(matches!(
        device.encryption_counter(),
        Err(Error::UnexpectedFormat(_))
    ));
}

#[test]
fn test_result_codes_map_to_errors() {
    let (mut device, transport) = scripted_device();
    device.open().expect("device opens");

    transport.queue_feature_response(response(result_code::DELAYED, &[]));
    assert!(matches!(device.security_level(), Err(Error::Delayed)));

    transport.queue_feature_response(response(result_code::INVALID_OPERATION, &[]));
    assert!(matches!(
        device.magtek_update_token(),
        Err(Error::InvalidOperation)
    ));

    transport.queue_feature_response(response(result_code::FAILURE, &[]));
    assert!(matches!(device.reset(), Err(Error::Failed(0x01))));
}

#[test]
fn test_run_command_passthrough() {
    let (mut device, transport) = scripted_device();
    device.open().expect("device opens");

    transport.queue_feature_response(response(result_code::SUCCESS, &[0xAB]));
    let data = device
        .run_command(command::UPDATE_ENCRYPTION_KEY, &[0x01, 0x02])
        .expect("device responds");
    assert_eq!(data, vec![0xAB]);

    let sent = transport.sent_feature_reports();
    assert_eq!(
        &sent[0][..5],
        &[0x00, command::UPDATE_ENCRYPTION_KEY, 0x02, 0x01, 0x02]
    );
}

#[test]
fn test_swipe_report_received_in_chunks() {
    let (mut device, transport) = scripted_device();
    device.open().expect("device opens");

    let mut swipe_bytes = vec![
        0x00, // track 1 status
        0x03, // track 1 length
    ];
    swipe_bytes.extend_from_slice(b"abc\0\0\0\0\0"); // track 1 data region
    swipe_bytes.push(0x00); // encode type
    assert_eq!(swipe_bytes.len(), INPUT_SIZE);

    transport.queue_input(InputStep::Data(swipe_bytes[..8].to_vec()));
    transport.queue_input(InputStep::Data(swipe_bytes[8..].to_vec()));

    let swipe = device.wait_swipe_report(1000).expect("swipe arrives");
    assert_eq!(swipe.bytes(), &swipe_bytes[..]);
    assert_eq!(
        swipe.track_encrypted_data(Track::One).expect("declared"),
        b"abc"
    );
}

#[test]
fn test_swipe_timeout_and_truncation() {
    let (mut device, transport) = scripted_device();
    device.open().expect("device opens");

    assert!(matches!(
        device.wait_swipe_report(100),
        Err(Error::TimedOut)
    ));

    transport.queue_input(InputStep::Data(vec![0u8; 4]));
    transport.queue_input(InputStep::Nothing);
    assert!(matches!(
        device.wait_swipe_report(100),
        Err(Error::UnexpectedFormat(_))
    ));
}
