//! Swipe report field access.
//!
//! A swipe report is a flat byte buffer whose field positions come from the
//! device's report descriptor, not from any fixed offsets. [`SwipeReport`]
//! pairs the received bytes with the parsed layout and resolves fields on
//! demand.
//!
//! Variable-length fields come in pairs: a fixed-size data region and a
//! separate length byte saying how much of the region the swipe actually
//! filled. The typed accessors return the filled prefix.

use std::sync::Arc;

use hid_magtek_protocol::ids::input_usage;
use hid_magtek_protocol::{CardEncodeType, DescriptorContext};

use crate::error::{Error, Result};

/// Magnetic stripe track selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    One,
    Two,
    Three,
}

impl Track {
    fn pick(self, ids: [u8; 3]) -> u8 {
        match self {
            Self::One => ids[0],
            Self::Two => ids[1],
            Self::Three => ids[2],
        }
    }
}

/// One received swipe report.
pub struct SwipeReport {
    descriptor: Arc<DescriptorContext>,
    data: Vec<u8>,
}

impl SwipeReport {
    pub(crate) fn new(descriptor: Arc<DescriptorContext>, data: Vec<u8>) -> Self {
        Self { descriptor, data }
    }

    /// The raw report bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Resolves a usage to its slice of the report.
    ///
    /// `expected_byte_size` of zero accepts whatever size the descriptor
    /// declares; any other value must match the declared size exactly.
    pub fn usage(&self, usage_id: u8, expected_byte_size: usize) -> Result<&[u8]> {
        let field = self.descriptor.input().usage(usage_id).ok_or_else(|| {
            Error::NotFound(format!(
                "usage {usage_id:#04x} ({}) not declared by this device",
                input_usage::name(usage_id)
            ))
        })?;

        // The parser only guarantees byte alignment for the report total.
        if field.bit_offset % 8 != 0 || field.bit_size % 8 != 0 {
            return Err(Error::Internal(format!(
                "usage {usage_id:#04x} is not byte aligned"
            )));
        }
        let offset = (field.bit_offset / 8) as usize;
        let size = (field.bit_size / 8) as usize;

        if expected_byte_size != 0 && size != expected_byte_size {
            return Err(Error::UnexpectedFormat(format!(
                "usage {usage_id:#04x} is {size} bytes, expected {expected_byte_size}"
            )));
        }
        if offset + size > self.data.len() {
            return Err(Error::UnexpectedFormat(format!(
                "usage {usage_id:#04x} extends past the {} byte report",
                self.data.len()
            )));
        }
        Ok(&self.data[offset..offset + size])
    }

    fn byte(&self, usage_id: u8) -> Result<u8> {
        Ok(self.usage(usage_id, 1)?[0])
    }

    /// A variable-length field: the prefix of the data region selected by
    /// its companion length byte.
    fn sized_data(&self, data_usage: u8, length_usage: u8) -> Result<&[u8]> {
        let length = usize::from(self.byte(length_usage)?);
        let region = self.usage(data_usage, 0)?;
        if length > region.len() {
            return Err(Error::UnexpectedFormat(format!(
                "usage {data_usage:#04x} declares {length} bytes in a {} byte region",
                region.len()
            )));
        }
        Ok(&region[..length])
    }

    fn string(&self, usage_id: u8) -> Result<String> {
        let raw = self.usage(usage_id, 0)?;
        Ok(String::from_utf8_lossy(raw)
            .trim_end_matches('\0')
            .to_string())
    }

    /// Track decode status byte; zero means the track decoded cleanly.
    pub fn track_decode_status(&self, track: Track) -> Result<u8> {
        self.byte(track.pick([
            input_usage::TRACK_1_DECODE_STATUS,
            input_usage::TRACK_2_DECODE_STATUS,
            input_usage::TRACK_3_DECODE_STATUS,
        ]))
    }

    /// Bytes of encrypted data the swipe produced for a track.
    pub fn track_encrypted_data_length(&self, track: Track) -> Result<u8> {
        self.byte(track.pick([
            input_usage::TRACK_1_ENCRYPTED_DATA_LENGTH,
            input_usage::TRACK_2_ENCRYPTED_DATA_LENGTH,
            input_usage::TRACK_3_ENCRYPTED_DATA_LENGTH,
        ]))
    }

    /// Bytes of masked data the swipe produced for a track.
    pub fn track_masked_data_length(&self, track: Track) -> Result<u8> {
        self.byte(track.pick([
            input_usage::TRACK_1_MASKED_DATA_LENGTH,
            input_usage::TRACK_2_MASKED_DATA_LENGTH,
            input_usage::TRACK_3_MASKED_DATA_LENGTH,
        ]))
    }

    /// Encrypted track data, trimmed to the length the swipe produced.
    pub fn track_encrypted_data(&self, track: Track) -> Result<&[u8]> {
        self.sized_data(
            track.pick([
                input_usage::TRACK_1_ENCRYPTED_DATA,
                input_usage::TRACK_2_ENCRYPTED_DATA,
                input_usage::TRACK_3_ENCRYPTED_DATA,
            ]),
            track.pick([
                input_usage::TRACK_1_ENCRYPTED_DATA_LENGTH,
                input_usage::TRACK_2_ENCRYPTED_DATA_LENGTH,
                input_usage::TRACK_3_ENCRYPTED_DATA_LENGTH,
            ]),
        )
    }

    /// Masked track data: the cleartext track with PAN digits replaced.
    pub fn track_masked_data(&self, track: Track) -> Result<&[u8]> {
        self.sized_data(
            track.pick([
                input_usage::TRACK_1_MASKED_DATA,
                input_usage::TRACK_2_MASKED_DATA,
                input_usage::TRACK_3_MASKED_DATA,
            ]),
            track.pick([
                input_usage::TRACK_1_MASKED_DATA_LENGTH,
                input_usage::TRACK_2_MASKED_DATA_LENGTH,
                input_usage::TRACK_3_MASKED_DATA_LENGTH,
            ]),
        )
    }

    /// Length of the track before encryption padding, in bytes.
    pub fn track_absolute_data_length(&self, track: Track) -> Result<u8> {
        self.byte(track.pick([
            input_usage::TRACK_1_ABSOLUTE_DATA_LENGTH,
            input_usage::TRACK_2_ABSOLUTE_DATA_LENGTH,
            input_usage::TRACK_3_ABSOLUTE_DATA_LENGTH,
        ]))
    }

    pub fn magneprint_status(&self) -> Result<&[u8]> {
        self.usage(input_usage::MAGNEPRINT_STATUS, 0)
    }

    pub fn magneprint_data_length(&self) -> Result<u8> {
        self.byte(input_usage::MAGNEPRINT_DATA_LENGTH)
    }

    pub fn magneprint_data(&self) -> Result<&[u8]> {
        self.sized_data(
            input_usage::MAGNEPRINT_DATA,
            input_usage::MAGNEPRINT_DATA_LENGTH,
        )
    }

    pub fn magneprint_absolute_data_length(&self) -> Result<u8> {
        self.byte(input_usage::MAGNEPRINT_ABSOLUTE_DATA_LENGTH)
    }

    pub fn card_encode_type(&self) -> Result<CardEncodeType> {
        Ok(CardEncodeType::from_u8(
            self.byte(input_usage::CARD_ENCODE_TYPE)?,
        ))
    }

    pub fn card_status(&self) -> Result<u8> {
        self.byte(input_usage::CARD_STATUS)
    }

    pub fn device_serial_number(&self) -> Result<String> {
        self.string(input_usage::DEVICE_SERIAL_NUMBER)
    }

    pub fn magnesafe_version(&self) -> Result<String> {
        self.string(input_usage::MAGNESAFE_VERSION_NUMBER)
    }

    pub fn reader_encryption_status(&self) -> Result<&[u8]> {
        self.usage(input_usage::READER_ENCRYPTION_STATUS, 0)
    }

    /// DUKPT key serial number and counter in effect for this swipe.
    pub fn dukpt_serial_number_counter(&self) -> Result<&[u8]> {
        self.usage(input_usage::DUKPT_SERIAL_NUMBER_COUNTER, 0)
    }

    /// Session id set before the swipe, encrypted under the swipe's key.
    pub fn encrypted_session_id(&self) -> Result<&[u8]> {
        self.usage(input_usage::ENCRYPTED_SESSION_ID, 0)
    }

    pub fn encryption_counter(&self) -> Result<&[u8]> {
        self.usage(input_usage::ENCRYPTION_COUNTER, 0)
    }

    pub fn hashed_track_2_data(&self) -> Result<&[u8]> {
        self.usage(input_usage::HASHED_TRACK_2_DATA, 0)
    }
}
