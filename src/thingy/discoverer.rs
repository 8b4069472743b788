use crate::app_config::Device;
use crate::domain::device::SensorDevice;
use crate::thingy::ThingyDevice;
use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::{Stream, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

#[derive(Error, Debug)]
pub enum ThingyError {
    #[error("bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),
    #[error("no bluetooth adapter found")]
    NoAdapter,
    #[error("no matching device found within {0:?}")]
    NotFound(Duration),
}

/// Scans for the configured device on the first adapter. A configured address wins over the name
/// filter.
#[instrument(skip_all, fields(name_filter = config.name_filter(), address = config.address()))]
pub async fn discover(config: &Device) -> Result<ThingyDevice, ThingyError> {
    let manager = Manager::new().await?;
    let adapter = manager.adapters().await?.into_iter().next().ok_or(ThingyError::NoAdapter)?;

    let mut events = adapter.events().await?;
    adapter.start_scan(ScanFilter::default()).await?;
    debug!("🔹 Scanning for {:?}...", config.scan_timeout());

    let found = timeout(config.scan_timeout(), find(&adapter, &mut events, config)).await;

    adapter.stop_scan().await?;

    match found {
        Ok(Ok(Some(peripheral))) => Ok(found_device(adapter, peripheral)),
        Ok(Ok(None)) | Err(_) => Err(ThingyError::NotFound(config.scan_timeout())),
        Ok(Err(e)) => Err(e),
    }
}

async fn find(adapter: &Adapter, events: &mut (impl Stream<Item = CentralEvent> + Unpin), config: &Device) -> Result<Option<Peripheral>, ThingyError> {
    for peripheral in adapter.peripherals().await? {
        if is_wanted(&peripheral, config).await? {
            return Ok(Some(peripheral));
        }
    }

    while let Some(event) = events.next().await {
        let (CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id)) = event else {
            continue;
        };

        let peripheral = adapter.peripheral(&id).await?;
        if is_wanted(&peripheral, config).await? {
            return Ok(Some(peripheral));
        }
    }

    Ok(None)
}

fn found_device(adapter: Adapter, peripheral: Peripheral) -> ThingyDevice {
    let device = ThingyDevice::new(adapter, peripheral);
    info!("✅ Found device {}", device.address());
    device
}

async fn is_wanted(peripheral: &Peripheral, config: &Device) -> Result<bool, ThingyError> {
    let name = peripheral.properties().await?.and_then(|properties| properties.local_name);
    Ok(matches(&peripheral.address().to_string(), name.as_deref(), config.address(), config.name_filter()))
}

fn matches(address: &str, name: Option<&str>, wanted_address: Option<&str>, name_filter: &str) -> bool {
    match wanted_address {
        Some(wanted) => address.eq_ignore_ascii_case(wanted),
        None => name.is_some_and(|name| name.contains(name_filter)),
    }
}
