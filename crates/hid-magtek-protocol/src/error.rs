//! Report descriptor parse errors.
//!
//! Parsing is all-or-nothing: any structural violation aborts the parse and
//! no partial [`DescriptorContext`](crate::DescriptorContext) is ever
//! returned. The variants describe the first violation encountered.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unsupported usage page {0:#06x}, only the vendor usage page is handled")]
    UnsupportedUsagePage(u32),

    #[error("collection declared with no pending usage")]
    CollectionWithoutUsage,

    #[error("collection declared with {0} pending usages, expected exactly one")]
    CollectionMultipleUsages(usize),

    #[error("collection declared on usage {0:#04x}, expected the application usage")]
    CollectionWrongUsage(u32),

    #[error("unexpected collection type {0:#04x}, expected Application (0x01)")]
    CollectionWrongType(u32),

    #[error("{0} usages declared outside of an input/output/feature item")]
    DanglingUsages(usize),

    #[error("report count yields a zero-sized usage field")]
    ZeroSizedUsage,

    #[error("{size_bits} bits from report count not evenly divisible across {count} usages")]
    UnevenDistribution { size_bits: u32, count: usize },

    #[error("report dimensions overflow a 32-bit bit count")]
    BitCountOverflow,

    #[error("no usages defined in {0} report")]
    EmptyReport(&'static str),

    #[error("{report} report length of {bits} bits is not a multiple of 8")]
    UnalignedReport { report: &'static str, bits: u32 },
}

pub type ParseResult<T> = Result<T, ParseError>;
