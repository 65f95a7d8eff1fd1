//! HID report descriptor parser.
//!
//! A report descriptor is a stream of byte-coded items. Global items
//! accumulate shared state (usage page, report size, report count), local
//! items declare field identities (usages), and main items commit the
//! declared usages into the input or feature report, or delimit the
//! top-level collection.
//!
//! The parser is deliberately narrow: it understands exactly the descriptor
//! shape the supported readers produce (one vendor usage page, one flat
//! `Application` collection, byte-aligned fields) and fails fast on anything
//! else. A truncated item is the single non-fatal anomaly: it is skipped,
//! because it reflects a damaged descriptor rather than an unsupported one.

use tracing::{trace, warn};

use crate::error::{ParseError, ParseResult};
use crate::ids::{APPLICATION_COLLECTION, APPLICATION_USAGE, MAGTEK_USAGE_PAGE, REPORT_SIZE_BITS};
use crate::layout::{DescriptorContext, UsageField};

/// Prefix byte marking a long item. Long items are opaque to this protocol
/// and are skipped without interpretation.
const LONG_ITEM_PREFIX: u8 = 0b1111_1110;

mod item_type {
    pub const MAIN: u8 = 0b00;
    pub const GLOBAL: u8 = 0b01;
    pub const LOCAL: u8 = 0b10;
}

mod main_tag {
    pub const INPUT: u8 = 0b1000;
    pub const OUTPUT: u8 = 0b1001;
    pub const COLLECTION: u8 = 0b1010;
    pub const FEATURE: u8 = 0b1011;
    pub const END_COLLECTION: u8 = 0b1100;
}

mod global_tag {
    pub const USAGE_PAGE: u8 = 0b0000;
    pub const REPORT_SIZE: u8 = 0b0111;
    pub const REPORT_COUNT: u8 = 0b1001;
}

mod local_tag {
    pub const USAGE: u8 = 0b0000;
}

fn type_name(item_type: u8) -> &'static str {
    match item_type {
        item_type::MAIN => "main",
        item_type::GLOBAL => "global",
        item_type::LOCAL => "local",
        _ => "reserved",
    }
}

fn main_tag_name(tag: u8) -> &'static str {
    match tag {
        main_tag::INPUT => "Input",
        main_tag::OUTPUT => "Output",
        main_tag::COLLECTION => "Collection",
        main_tag::FEATURE => "Feature",
        main_tag::END_COLLECTION => "End Collection",
        _ => "Reserved",
    }
}

fn global_tag_name(tag: u8) -> &'static str {
    match tag {
        global_tag::USAGE_PAGE => "Usage page",
        0b0001 => "Logical minimum",
        0b0010 => "Logical maximum",
        0b0011 => "Physical minimum",
        0b0100 => "Physical maximum",
        0b0101 => "Unit exponent",
        0b0110 => "Unit",
        global_tag::REPORT_SIZE => "Report size",
        0b1000 => "Report ID",
        global_tag::REPORT_COUNT => "Report count",
        0b1010 => "Push",
        0b1011 => "Pop",
        _ => "Reserved",
    }
}

fn local_tag_name(tag: u8) -> &'static str {
    match tag {
        local_tag::USAGE => "Usage",
        0b0001 => "Usage minimum",
        0b0010 => "Usage maximum",
        0b0011 => "Designator index",
        0b0100 => "Designator minimum",
        0b0101 => "Designator maximum",
        0b0111 => "String index",
        0b1000 => "String minimum",
        0b1001 => "String maximum",
        0b1010 => "Delimiter",
        _ => "Reserved",
    }
}

fn collection_type_name(value: u32) -> &'static str {
    match value {
        0x00 => "Physical",
        0x01 => "Application",
        0x02 => "Logical",
        0x03 => "Report",
        0x04 => "Named array",
        0x05 => "Usage switch",
        0x06 => "Usage modifier",
        0x07..=0x7F => "reserved",
        0x80..=0xFF => "vendor-defined",
        _ => "invalid",
    }
}

/// Transient parse state, discarded when `parse_report_descriptor` returns.
#[derive(Default)]
struct ParseState {
    context: DescriptorContext,
    usage_page: u32,
    report_size_bits: u32,
    /// Usages declared but not yet committed to a report.
    pending: Vec<UsageField>,
}

impl ParseState {
    fn main_item(&mut self, tag: u8, value: u32) -> ParseResult<()> {
        match tag {
            main_tag::INPUT | main_tag::OUTPUT | main_tag::FEATURE => {
                trace!("{} ({:#x})", main_tag_name(tag), value);
                match tag {
                    main_tag::INPUT => self.context.input.append(&mut self.pending),
                    main_tag::FEATURE => self.context.feature.append(&mut self.pending),
                    // Output reports are not modeled by this protocol.
                    _ => self.pending.clear(),
                }
                Ok(())
            }
            main_tag::COLLECTION => self.collection(value),
            main_tag::END_COLLECTION => self.end_collection(),
            _ => {
                trace!("{} ({:#x})", main_tag_name(tag), value);
                self.pending.clear();
                Ok(())
            }
        }
    }

    fn collection(&mut self, value: u32) -> ParseResult<()> {
        trace!("Collection ({:#x}: {})", value, collection_type_name(value));

        // A single flat Application collection on the application usage is
        // the only supported shape.
        match self.pending.len() {
            0 => return Err(ParseError::CollectionWithoutUsage),
            1 => {}
            n => return Err(ParseError::CollectionMultipleUsages(n)),
        }
        let usage_id = self.pending[0].id;
        if usage_id != APPLICATION_USAGE {
            return Err(ParseError::CollectionWrongUsage(usage_id));
        }
        if value != APPLICATION_COLLECTION {
            return Err(ParseError::CollectionWrongType(value));
        }

        self.pending.clear();
        Ok(())
    }

    fn end_collection(&mut self) -> ParseResult<()> {
        trace!("End Collection");

        // A usage declared but never committed to an input/output/feature
        // item is a descriptor-authoring error.
        if !self.pending.is_empty() {
            return Err(ParseError::DanglingUsages(self.pending.len()));
        }
        Ok(())
    }

    fn global_item(&mut self, tag: u8, value: u32) -> ParseResult<()> {
        trace!("{} ({:#x}: {})", global_tag_name(tag), value, value);

        // Report id is ignored: the supported readers do not use it.
        match tag {
            global_tag::USAGE_PAGE => {
                self.usage_page = value;
                if self.usage_page != MAGTEK_USAGE_PAGE {
                    return Err(ParseError::UnsupportedUsagePage(value));
                }
                Ok(())
            }
            global_tag::REPORT_SIZE => {
                self.report_size_bits = value;
                if self.report_size_bits != REPORT_SIZE_BITS {
                    warn!("unexpected report size: {} bits", self.report_size_bits);
                }
                Ok(())
            }
            global_tag::REPORT_COUNT => self.report_count(value),
            _ => Ok(()),
        }
    }

    /// Applies a report count to the pending usages.
    ///
    /// With a single pending usage the count sizes that field; with several,
    /// the total is distributed evenly across all of them.
    fn report_count(&mut self, count: u32) -> ParseResult<()> {
        let size_bits = count
            .checked_mul(self.report_size_bits)
            .ok_or(ParseError::BitCountOverflow)?;

        match self.pending.len() {
            0 => {
                warn!("report count given but no previous usage defined");
                Ok(())
            }
            1 => {
                if size_bits == 0 {
                    return Err(ParseError::ZeroSizedUsage);
                }
                self.pending[0].bit_size = size_bits;
                Ok(())
            }
            n => {
                if size_bits % n as u32 != 0 {
                    return Err(ParseError::UnevenDistribution {
                        size_bits,
                        count: n,
                    });
                }
                let each = size_bits / n as u32;
                for usage in &mut self.pending {
                    usage.bit_size = each;
                }
                Ok(())
            }
        }
    }

    fn local_item(&mut self, tag: u8, value: u32) {
        trace!("{} ({:#x}: {})", local_tag_name(tag), value, value);

        if tag == local_tag::USAGE {
            self.pending.push(UsageField::new(value));
        }
    }
}

/// Parses a raw HID report descriptor into a [`DescriptorContext`].
///
/// Fails fast: the first structural violation aborts the scan and no partial
/// context is returned.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first violation: an unsupported
/// usage page, a malformed collection, a report count that does not
/// distribute evenly, an empty report, or a report whose total length is not
/// byte-aligned.
pub fn parse_report_descriptor(desc: &[u8]) -> ParseResult<DescriptorContext> {
    let mut state = ParseState::default();
    let mut i = 0usize;

    while i < desc.len() {
        let prefix = desc[i];

        if prefix == LONG_ITEM_PREFIX {
            let Some(&data_len) = desc.get(i + 1) else {
                warn!("invalid long item in report descriptor");
                break;
            };
            trace!("long item, {} data bytes, skipped", data_len);
            i += usize::from(data_len) + 1;
            continue;
        }

        let tag = prefix >> 4;
        let item = (prefix >> 2) & 0b11;
        let mut data_len = usize::from(prefix & 0b11);
        if data_len == 0b11 {
            data_len = 4;
        }

        // A declared length running past the buffer means a truncated or
        // damaged descriptor; skip the item and keep scanning.
        if i + data_len >= desc.len() {
            trace!(
                "short item type '{}', tag {:#04x}, size {}: <invalid data>",
                type_name(item),
                tag,
                data_len
            );
            i += data_len + 1;
            continue;
        }

        let mut value: u32 = 0;
        for (k, &byte) in desc[i + 1..=i + data_len].iter().enumerate() {
            value |= u32::from(byte) << (8 * k);
        }

        match item {
            item_type::MAIN => state.main_item(tag, value)?,
            item_type::GLOBAL => state.global_item(tag, value)?,
            item_type::LOCAL => state.local_item(tag, value),
            _ => trace!(
                "short item type '{}', tag {:#04x}, size {}: {:#x}",
                type_name(item),
                tag,
                data_len,
                value
            ),
        }

        i += data_len + 1;
    }

    trace!("processing input report:");
    state.context.input.finalize("input")?;
    trace!("processing feature report:");
    state.context.feature.finalize("feature")?;

    Ok(state.context)
}
