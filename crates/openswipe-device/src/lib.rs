//! Device access for MagTek secure card reader authenticators (SCRA).
//!
//! Builds on [`hid_magtek_protocol`] to drive actual readers: enumeration,
//! refcounted sessions, the feature report command channel, and swipe
//! capture.
//!
//! ```no_run
//! use openswipe_device::{hid::HidApiPort, Device};
//! use std::sync::Arc;
//!
//! # fn main() -> openswipe_device::Result<()> {
//! let port = Arc::new(HidApiPort::new()?);
//! for mut device in Device::enumerate(port)? {
//!     device.open()?;
//!     println!("software id: {}", device.software_id()?);
//!     let swipe = device.wait_swipe_report(30_000)?;
//!     println!("card encode type: {:?}", swipe.card_encode_type()?);
//!     device.close();
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Device`] is not `Sync`; share one between threads behind a mutex if
//! needed. Transports are pluggable through [`HidTransport`]/[`HidPort`],
//! with a scripted implementation in [`transport::mock`] for tests.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod device;
pub mod error;
pub mod hid;
pub mod swipe;
pub mod transport;

mod feature;
mod hex;
mod input;

pub use device::{Device, DeviceInfo, EncryptionCounter};
pub use error::{Error, Result};
pub use swipe::{SwipeReport, Track};
pub use transport::{HidPort, HidTransport};

pub use hid_magtek_protocol as protocol;
