//! HID protocol implementation for MagTek magnetic-stripe card readers.
//!
//! MagTek secure card reader authenticators (SCRA) expose two vendor-defined
//! HID reports on usage page `0xFF00`:
//!
//! - an **input report** carrying unsolicited swipe data (track statuses,
//!   encrypted/masked track data, magneprint data, counters), and
//! - a **feature report** used as a request/response command channel.
//!
//! Neither report has a fixed layout across firmware revisions. The device's
//! HID report descriptor is the single source of truth: it declares, usage by
//! usage, where each named field lives inside each report. This crate parses
//! that descriptor into a [`DescriptorContext`] holding one [`ReportLayout`]
//! per report type, which the transport layer then uses to size its buffers
//! and resolve field offsets.
//!
//! This crate is intentionally I/O-free: it provides pure functions and types
//! that can be tested without hardware or OS-level HID plumbing. Device
//! sessions, report transfer and swipe handling live in `openswipe-device`.
//!
//! ## Protocol notes
//!
//! - Only the vendor usage page `0xFF00` and a single flat `Application`
//!   collection are supported; descriptors deviating from that shape fail to
//!   parse rather than being half-interpreted.
//! - Feature report buffers carry a leading report-id byte (always zero);
//!   input report buffers do not. This asymmetry is how the device frames the
//!   two report types on the bus and is preserved throughout the stack.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod descriptor;
pub mod error;
pub mod ids;
pub mod layout;
pub mod types;

pub use descriptor::parse_report_descriptor;
pub use error::{ParseError, ParseResult};
pub use ids::{
    APPLICATION_COLLECTION, APPLICATION_USAGE, MAGTEK_USAGE_PAGE, MAGTEK_VENDOR_ID, REPORT_SIZE_BITS,
};
pub use layout::{DescriptorContext, ReportLayout, UsageField};
pub use types::{
    CardEncodeType, ReaderState, ReaderStateAntecedent, SecurityLevel, TrackIdEnable, TrackState,
};
