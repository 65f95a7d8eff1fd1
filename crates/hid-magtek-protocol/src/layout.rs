//! Report layouts computed from a parsed report descriptor.

use crate::error::{ParseError, ParseResult};

/// One named field inside a report.
///
/// Offsets and sizes are kept in bits, exactly as the descriptor declares
/// them. All known MagTek readers declare byte-aligned fields; consumers that
/// need byte ranges check alignment before converting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageField {
    /// Usage id as declared in the descriptor.
    pub id: u32,
    /// Offset from the start of the report, in bits.
    pub bit_offset: u32,
    /// Field size in bits.
    pub bit_size: u32,
}

impl UsageField {
    pub(crate) fn new(id: u32) -> Self {
        Self {
            id,
            bit_offset: 0,
            bit_size: 0,
        }
    }
}

/// Field table for one report type, in descriptor declaration order.
#[derive(Debug, Clone, Default)]
pub struct ReportLayout {
    fields: Vec<UsageField>,
    size_bytes: usize,
}

impl ReportLayout {
    /// Looks up a usage by id. Duplicate ids are not rejected by the parser;
    /// lookup returns the first declaration, which is what the devices
    /// expect.
    pub fn usage(&self, usage_id: u8) -> Option<&UsageField> {
        self.fields.iter().find(|f| f.id == u32::from(usage_id))
    }

    /// Total report size in bytes, excluding any report-id framing byte.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[UsageField] {
        &self.fields
    }

    pub(crate) fn append(&mut self, pending: &mut Vec<UsageField>) {
        self.fields.append(pending);
    }

    /// Assigns each field its running bit offset and computes the total byte
    /// size. Fails if the layout is empty or not byte-aligned overall.
    pub(crate) fn finalize(&mut self, report_name: &'static str) -> ParseResult<()> {
        if self.fields.is_empty() {
            return Err(ParseError::EmptyReport(report_name));
        }

        let mut offset_bits: u32 = 0;
        for field in &mut self.fields {
            field.bit_offset = offset_bits;
            tracing::trace!(
                "  usage {:#04x} in {} report: offset {} bytes (+{} bits), size {} bytes (+{} bits)",
                field.id,
                report_name,
                field.bit_offset / 8,
                field.bit_offset % 8,
                field.bit_size / 8,
                field.bit_size % 8
            );
            offset_bits = offset_bits
                .checked_add(field.bit_size)
                .ok_or(ParseError::BitCountOverflow)?;
        }

        if offset_bits % 8 != 0 {
            return Err(ParseError::UnalignedReport {
                report: report_name,
                bits: offset_bits,
            });
        }

        self.size_bytes = (offset_bits / 8) as usize;
        tracing::trace!("total {} report size: {} bytes", report_name, self.size_bytes);
        Ok(())
    }
}

/// Parsed report descriptor: one layout per report type.
///
/// Immutable once built. Sessions share a single instance behind an
/// `Arc`; with no post-construction mutation, concurrent readers need no
/// locking.
#[derive(Debug, Default)]
pub struct DescriptorContext {
    pub(crate) input: ReportLayout,
    pub(crate) feature: ReportLayout,
}

impl DescriptorContext {
    /// Layout of the unsolicited swipe (input) report.
    pub fn input(&self) -> &ReportLayout {
        &self.input
    }

    /// Layout of the command-channel (feature) report.
    pub fn feature(&self) -> &ReportLayout {
        &self.feature
    }
}
