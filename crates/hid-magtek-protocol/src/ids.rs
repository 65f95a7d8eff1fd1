//! Protocol constants: vendor ids, usage ids, command ids and result codes.
//!
//! Usage ids identify named fields inside the input and feature reports; the
//! report descriptor declares where each one lives. Command and property ids
//! travel inside the feature report command channel.

/// MagTek USB vendor id (`0x0801`).
pub const MAGTEK_VENDOR_ID: u16 = 0x0801;

/// Vendor-defined usage page used by all supported readers.
///
/// Any other usage page in a report descriptor is a parse failure: the
/// protocol implemented here is only defined for this page.
pub const MAGTEK_USAGE_PAGE: u32 = 0xFF00;

/// The single application usage the top-level collection must be declared on.
pub const APPLICATION_USAGE: u32 = 0x01;

/// Collection type value for an `Application` collection.
pub const APPLICATION_COLLECTION: u32 = 0x01;

/// Per-field report size the devices are known to declare. Other values are
/// tolerated but logged as suspicious.
pub const REPORT_SIZE_BITS: u32 = 8;

/// Input (swipe) report usage ids.
pub mod input_usage {
    pub const TRACK_1_DECODE_STATUS: u8 = 0x20;
    pub const TRACK_2_DECODE_STATUS: u8 = 0x21;
    pub const TRACK_3_DECODE_STATUS: u8 = 0x22;
    pub const MAGNEPRINT_STATUS: u8 = 0x23;
    pub const TRACK_1_ENCRYPTED_DATA_LENGTH: u8 = 0x28;
    pub const TRACK_2_ENCRYPTED_DATA_LENGTH: u8 = 0x29;
    pub const TRACK_3_ENCRYPTED_DATA_LENGTH: u8 = 0x2A;
    pub const MAGNEPRINT_DATA_LENGTH: u8 = 0x2B;
    pub const TRACK_1_ENCRYPTED_DATA: u8 = 0x30;
    pub const TRACK_2_ENCRYPTED_DATA: u8 = 0x31;
    pub const TRACK_3_ENCRYPTED_DATA: u8 = 0x32;
    pub const MAGNEPRINT_DATA: u8 = 0x33;
    pub const CARD_ENCODE_TYPE: u8 = 0x38;
    pub const CARD_STATUS: u8 = 0x39;
    pub const DEVICE_SERIAL_NUMBER: u8 = 0x40;
    pub const READER_ENCRYPTION_STATUS: u8 = 0x42;
    pub const DUKPT_SERIAL_NUMBER_COUNTER: u8 = 0x46;
    pub const TRACK_1_MASKED_DATA_LENGTH: u8 = 0x47;
    pub const TRACK_2_MASKED_DATA_LENGTH: u8 = 0x48;
    pub const TRACK_3_MASKED_DATA_LENGTH: u8 = 0x49;
    pub const TRACK_1_MASKED_DATA: u8 = 0x4A;
    pub const TRACK_2_MASKED_DATA: u8 = 0x4B;
    pub const TRACK_3_MASKED_DATA: u8 = 0x4C;
    pub const ENCRYPTED_SESSION_ID: u8 = 0x50;
    pub const TRACK_1_ABSOLUTE_DATA_LENGTH: u8 = 0x51;
    pub const TRACK_2_ABSOLUTE_DATA_LENGTH: u8 = 0x52;
    pub const TRACK_3_ABSOLUTE_DATA_LENGTH: u8 = 0x53;
    pub const MAGNEPRINT_ABSOLUTE_DATA_LENGTH: u8 = 0x54;
    pub const ENCRYPTION_COUNTER: u8 = 0x55;
    pub const MAGNESAFE_VERSION_NUMBER: u8 = 0x56;
    pub const HASHED_TRACK_2_DATA: u8 = 0x57;

    /// Human-readable name for a usage id, for trace output.
    pub fn name(usage_id: u8) -> &'static str {
        match usage_id {
            TRACK_1_DECODE_STATUS => "track 1 decode status",
            TRACK_2_DECODE_STATUS => "track 2 decode status",
            TRACK_3_DECODE_STATUS => "track 3 decode status",
            MAGNEPRINT_STATUS => "magneprint status",
            TRACK_1_ENCRYPTED_DATA_LENGTH => "track 1 encrypted data length",
            TRACK_2_ENCRYPTED_DATA_LENGTH => "track 2 encrypted data length",
            TRACK_3_ENCRYPTED_DATA_LENGTH => "track 3 encrypted data length",
            MAGNEPRINT_DATA_LENGTH => "magneprint data length",
            TRACK_1_ENCRYPTED_DATA => "track 1 encrypted data",
            TRACK_2_ENCRYPTED_DATA => "track 2 encrypted data",
            TRACK_3_ENCRYPTED_DATA => "track 3 encrypted data",
            MAGNEPRINT_DATA => "magneprint data",
            CARD_ENCODE_TYPE => "card encode type",
            CARD_STATUS => "card status",
            DEVICE_SERIAL_NUMBER => "device serial number",
            READER_ENCRYPTION_STATUS => "reader encryption status",
            DUKPT_SERIAL_NUMBER_COUNTER => "DUKPT serial number/counter",
            TRACK_1_MASKED_DATA_LENGTH => "track 1 masked data length",
            TRACK_2_MASKED_DATA_LENGTH => "track 2 masked data length",
            TRACK_3_MASKED_DATA_LENGTH => "track 3 masked data length",
            TRACK_1_MASKED_DATA => "track 1 masked data",
            TRACK_2_MASKED_DATA => "track 2 masked data",
            TRACK_3_MASKED_DATA => "track 3 masked data",
            ENCRYPTED_SESSION_ID => "encrypted session id",
            TRACK_1_ABSOLUTE_DATA_LENGTH => "track 1 data absolute length",
            TRACK_2_ABSOLUTE_DATA_LENGTH => "track 2 data absolute length",
            TRACK_3_ABSOLUTE_DATA_LENGTH => "track 3 data absolute length",
            MAGNEPRINT_ABSOLUTE_DATA_LENGTH => "magneprint data absolute length",
            ENCRYPTION_COUNTER => "encryption counter",
            MAGNESAFE_VERSION_NUMBER => "MagneSafe version number",
            HASHED_TRACK_2_DATA => "hashed track 2 data",
            _ => "unknown",
        }
    }
}

/// Feature report usage ids.
pub mod feature_usage {
    pub const COMMAND_MESSAGE: u8 = 0x20;

    pub fn name(usage_id: u8) -> &'static str {
        match usage_id {
            COMMAND_MESSAGE => "command message",
            _ => "unknown",
        }
    }
}

/// Vendor command ids carried in the feature report command byte.
pub mod command {
    pub const GET_PROPERTY: u8 = 0x00;
    pub const SET_PROPERTY: u8 = 0x01;
    pub const RESET_DEVICE: u8 = 0x02;
    pub const GET_DUKPT_KSN_AND_COUNTER: u8 = 0x09;
    pub const SET_SESSION_ID: u8 = 0x0A;
    pub const GET_READER_STATE: u8 = 0x14;
    pub const GET_SECURITY_LEVEL: u8 = 0x15;
    pub const GET_MAGTEK_UPDATE_TOKEN: u8 = 0x19;
    pub const GET_ENCRYPTION_COUNTER: u8 = 0x1C;
    pub const UPDATE_ENCRYPTION_KEY: u8 = 0x22;
}

/// Property ids for the get/set property commands.
pub mod property {
    pub const SOFTWARE_ID: u8 = 0x00;
    pub const USB_SERIAL_NUMBER: u8 = 0x01;
    pub const POLLING_INTERVAL: u8 = 0x02;
    pub const DEVICE_SERIAL_NUMBER: u8 = 0x03;
    pub const MAGNESAFE_VERSION_NUMBER: u8 = 0x04;
    pub const TRACK_ID_ENABLE: u8 = 0x05;
    pub const ISO_TRACK_MASK: u8 = 0x07;
    pub const AAMVA_TRACK_MASK: u8 = 0x08;
    pub const MAX_PACKET_SIZE: u8 = 0x0A;
}

/// Result codes reported in the feature report response.
pub mod result_code {
    pub const SUCCESS: u8 = 0x00;
    pub const FAILURE: u8 = 0x01;
    pub const BAD_PARAMETER: u8 = 0x02;
    pub const DELAYED: u8 = 0x05;
    pub const INVALID_OPERATION: u8 = 0x07;
}
