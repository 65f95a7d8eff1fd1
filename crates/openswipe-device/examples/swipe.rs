//! Waits for one card swipe on the first attached reader and prints the
//! decoded fields.

use std::error::Error;
use std::sync::Arc;

use openswipe_device::hid::HidApiPort;
use openswipe_device::{Device, Track};

const SWIPE_TIMEOUT_MS: i32 = 30_000;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let port = Arc::new(HidApiPort::new()?);
    let Some(mut device) = Device::enumerate(port)?.into_iter().next() else {
        println!("no readers found");
        return Ok(());
    };

    device.open()?;
    println!("swipe a card on {}...", device.info().path);

    let swipe = device.wait_swipe_report(SWIPE_TIMEOUT_MS)?;
    println!("card encode type: {}", swipe.card_encode_type()?.as_str());

    for track in [Track::One, Track::Two, Track::Three] {
        let status = swipe.track_decode_status(track)?;
        if status != 0 {
            println!("{track:?}: decode failed (status {status:#04x})");
            continue;
        }
        let masked = swipe.track_masked_data(track)?;
        let encrypted = swipe.track_encrypted_data(track)?;
        println!(
            "{track:?}: {} ({} encrypted bytes)",
            String::from_utf8_lossy(masked),
            encrypted.len()
        );
    }

    device.close();
    Ok(())
}
