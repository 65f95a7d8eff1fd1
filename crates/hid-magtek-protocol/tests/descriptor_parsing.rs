//! End-to-end report descriptor parsing against realistic descriptors.

use hid_magtek_protocol::ids::{feature_usage, input_usage};
use hid_magtek_protocol::{parse_report_descriptor, ParseError};

/// Small builder emitting descriptor items in the encoding the readers use.
#[derive(Default)]
struct DescriptorBuilder {
    bytes: Vec<u8>,
}

impl DescriptorBuilder {
    fn usage_page_vendor(mut self) -> Self {
        self.bytes.extend_from_slice(&[0x06, 0x00, 0xFF]);
        self
    }

    fn usage(mut self, id: u8) -> Self {
        self.bytes.extend_from_slice(&[0x09, id]);
        self
    }

    fn collection_application(mut self) -> Self {
        self.bytes.extend_from_slice(&[0xA1, 0x01]);
        self
    }

    fn report_size(mut self, bits: u8) -> Self {
        self.bytes.extend_from_slice(&[0x75, bits]);
        self
    }

    fn report_count(mut self, count: u8) -> Self {
        self.bytes.extend_from_slice(&[0x95, count]);
        self
    }

    fn input(mut self) -> Self {
        self.bytes.extend_from_slice(&[0x81, 0x02]);
        self
    }

    fn feature(mut self) -> Self {
        self.bytes.extend_from_slice(&[0xB1, 0x02]);
        self
    }

    fn end_collection(mut self) -> Self {
        self.bytes.push(0xC0);
        self
    }

    fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Descriptor modeled on a MagSafe swipe reader: a handful of one-byte status
/// fields, variable-length data blobs, and a 24-byte feature command channel.
fn reader_descriptor() -> Vec<u8> {
    DescriptorBuilder::default()
        .usage_page_vendor()
        .usage(0x01)
        .collection_application()
        .report_size(8)
        // Four status bytes declared together, sized by one report count.
        .usage(input_usage::TRACK_1_DECODE_STATUS)
        .usage(input_usage::TRACK_2_DECODE_STATUS)
        .usage(input_usage::TRACK_3_DECODE_STATUS)
        .usage(input_usage::MAGNEPRINT_STATUS)
        .report_count(4)
        .input()
        .usage(input_usage::TRACK_1_ENCRYPTED_DATA_LENGTH)
        .report_count(1)
        .input()
        .usage(input_usage::TRACK_1_ENCRYPTED_DATA)
        .report_count(112)
        .input()
        .usage(input_usage::CARD_ENCODE_TYPE)
        .report_count(1)
        .input()
        .usage(input_usage::DEVICE_SERIAL_NUMBER)
        .report_count(16)
        .input()
        .usage(feature_usage::COMMAND_MESSAGE)
        .report_count(24)
        .feature()
        .end_collection()
        .build()
}

#[test]
fn test_parses_reader_descriptor() {
    let ctx = parse_report_descriptor(&reader_descriptor()).expect("descriptor parses");

    assert_eq!(ctx.input().size_bytes(), 4 + 1 + 112 + 1 + 16);
    assert_eq!(ctx.feature().size_bytes(), 24);

    let cmd = ctx
        .feature()
        .usage(feature_usage::COMMAND_MESSAGE)
        .expect("feature channel declared");
    assert_eq!(cmd.bit_offset, 0);
    assert_eq!(cmd.bit_size, 24 * 8);
}

#[test]
fn test_grouped_usages_share_report_count_evenly() {
    let ctx = parse_report_descriptor(&reader_descriptor()).expect("descriptor parses");

    // 4 usages x 8 bits each from the shared count of 4.
    for (i, id) in [
        input_usage::TRACK_1_DECODE_STATUS,
        input_usage::TRACK_2_DECODE_STATUS,
        input_usage::TRACK_3_DECODE_STATUS,
        input_usage::MAGNEPRINT_STATUS,
    ]
    .into_iter()
    .enumerate()
    {
        let field = ctx.input().usage(id).expect("status field declared");
        assert_eq!(field.bit_size, 8);
        assert_eq!(field.bit_offset, 8 * i as u32);
    }

    let blob = ctx
        .input()
        .usage(input_usage::TRACK_1_ENCRYPTED_DATA)
        .expect("data field declared");
    assert_eq!(blob.bit_offset, 5 * 8);
    assert_eq!(blob.bit_size, 112 * 8);
}

#[test]
fn test_rejects_non_vendor_usage_page() {
    // Usage page 0x0001 (generic desktop).
    let desc = [0x05, 0x01, 0x09, 0x01, 0xA1, 0x01, 0xC0];
    assert_eq!(
        parse_report_descriptor(&desc).err(),
        Some(ParseError::UnsupportedUsagePage(0x01))
    );
}

#[test]
fn test_rejects_zero_report_count_for_single_usage() {
    let desc = DescriptorBuilder::default()
        .usage_page_vendor()
        .usage(0x01)
        .collection_application()
        .report_size(8)
        .usage(input_usage::TRACK_1_DECODE_STATUS)
        .report_count(0)
        .build();
    assert_eq!(
        parse_report_descriptor(&desc).err(),
        Some(ParseError::ZeroSizedUsage)
    );
}

#[test]
fn test_rejects_uneven_distribution() {
    // Count 5 at 8 bits per field gives 40 bits, which does not divide
    // across 3 usages.
    let desc = DescriptorBuilder::default()
        .usage_page_vendor()
        .usage(0x01)
        .collection_application()
        .report_size(8)
        .usage(input_usage::TRACK_1_DECODE_STATUS)
        .usage(input_usage::TRACK_2_DECODE_STATUS)
        .usage(input_usage::TRACK_3_DECODE_STATUS)
        .report_count(5)
        .build();
    assert_eq!(
        parse_report_descriptor(&desc).err(),
        Some(ParseError::UnevenDistribution {
            size_bits: 40,
            count: 3
        })
    );
}

#[test]
fn test_even_distribution_across_three_usages() {
    // 24 bits across 3 usages divides to 8 bits each.
    let desc = DescriptorBuilder::default()
        .usage_page_vendor()
        .usage(0x01)
        .collection_application()
        .report_size(8)
        .usage(input_usage::TRACK_1_DECODE_STATUS)
        .usage(input_usage::TRACK_2_DECODE_STATUS)
        .usage(input_usage::TRACK_3_DECODE_STATUS)
        .report_count(3)
        .input()
        .usage(feature_usage::COMMAND_MESSAGE)
        .report_count(24)
        .feature()
        .end_collection()
        .build();

    let ctx = parse_report_descriptor(&desc).expect("descriptor parses");
    for id in [
        input_usage::TRACK_1_DECODE_STATUS,
        input_usage::TRACK_2_DECODE_STATUS,
        input_usage::TRACK_3_DECODE_STATUS,
    ] {
        assert_eq!(ctx.input().usage(id).expect("declared").bit_size, 8);
    }
}

#[test]
fn test_report_count_without_usage_is_tolerated() {
    // A stray report count before any usage is logged, not fatal.
    let desc = DescriptorBuilder::default()
        .usage_page_vendor()
        .usage(0x01)
        .collection_application()
        .report_size(8)
        .report_count(4)
        .usage(input_usage::TRACK_1_DECODE_STATUS)
        .report_count(1)
        .input()
        .usage(feature_usage::COMMAND_MESSAGE)
        .report_count(24)
        .feature()
        .end_collection()
        .build();

    let ctx = parse_report_descriptor(&desc).expect("descriptor parses");
    assert_eq!(ctx.input().size_bytes(), 1);
}

#[test]
fn test_rejects_empty_reports() {
    // Feature channel only: the input layout ends up empty.
    let desc = DescriptorBuilder::default()
        .usage_page_vendor()
        .usage(0x01)
        .collection_application()
        .report_size(8)
        .usage(feature_usage::COMMAND_MESSAGE)
        .report_count(24)
        .feature()
        .end_collection()
        .build();
    assert_eq!(
        parse_report_descriptor(&desc).err(),
        Some(ParseError::EmptyReport("input"))
    );

    // Swipe fields only: the feature layout ends up empty.
    let desc = DescriptorBuilder::default()
        .usage_page_vendor()
        .usage(0x01)
        .collection_application()
        .report_size(8)
        .usage(input_usage::TRACK_1_DECODE_STATUS)
        .report_count(1)
        .input()
        .end_collection()
        .build();
    assert_eq!(
        parse_report_descriptor(&desc).err(),
        Some(ParseError::EmptyReport("feature"))
    );
}

#[test]
fn test_empty_descriptor_fails_on_empty_input_report() {
    assert_eq!(
        parse_report_descriptor(&[]).err(),
        Some(ParseError::EmptyReport("input"))
    );
}
