//! Prints identity and state for every attached reader.
//!
//! Run with `RUST_LOG=trace` to see the descriptor parse and the raw
//! command traffic.

use std::error::Error;
use std::sync::Arc;

use openswipe_device::hid::HidApiPort;
use openswipe_device::Device;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let port = Arc::new(HidApiPort::new()?);
    let devices = Device::enumerate(port)?;
    if devices.is_empty() {
        println!("no readers found");
        return Ok(());
    }

    for mut device in devices {
        println!("{}:", device.info().path);
        device.open()?;

        println!("  software id:       {}", device.software_id()?);
        println!("  serial number:     {}", device.device_serial_number()?);
        println!("  magnesafe version: {}", device.magnesafe_version()?);
        println!("  security level:    {:?}", device.security_level()?);

        let (state, antecedent) = device.reader_state()?;
        println!("  state:             {} ({})", state.as_str(), antecedent.as_str());

        let tracks = device.track_id_enable()?;
        println!(
            "  tracks:            1 {}, 2 {}, 3 {}",
            tracks.track_1.as_str(),
            tracks.track_2.as_str(),
            tracks.track_3.as_str()
        );

        device.close();
    }
    Ok(())
}
