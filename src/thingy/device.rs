use crate::domain::device::{DeviceError, LedColor, Notification, NotificationStream, Sensor, SensorDevice, SensorSetting};
use crate::thingy::decoder::{apply_setting, decode, encode_led, notification_uuid};
use crate::thingy::uuids;
use async_trait::async_trait;
use btleplug::api::{Central, CentralEvent, Characteristic, Peripheral as _, ValueNotification, WriteType};
use btleplug::platform::{Adapter, Peripheral};
use futures::{Stream, StreamExt};
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// A Nordic Thingy:52 reached through a local Bluetooth adapter.
#[derive(Debug)]
pub struct ThingyDevice {
    adapter: Adapter,
    peripheral: Peripheral,
    address: String,
    // Settings share one characteristic, so concurrent read-modify-writes would drop updates.
    configuration: Mutex<()>,
}

impl ThingyDevice {
    pub fn new(adapter: Adapter, peripheral: Peripheral) -> Self {
        let address = peripheral.address().to_string();

        ThingyDevice {
            adapter,
            peripheral,
            address,
            configuration: Mutex::new(()),
        }
    }

    fn characteristic(&self, uuid: Uuid) -> Result<Characteristic, DeviceError> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|characteristic| characteristic.uuid == uuid)
            .ok_or(DeviceError::MissingCharacteristic(uuid))
    }
}

#[async_trait]
impl SensorDevice for ThingyDevice {
    fn address(&self) -> &str {
        &self.address
    }

    #[instrument(skip(self), fields(device = %self.address))]
    async fn connect_and_set_up(&self) -> Result<(), DeviceError> {
        if !self.peripheral.is_connected().await? {
            debug!("🔹 Connecting...");
            self.peripheral.connect().await?;
        }

        self.peripheral.discover_services().await?;
        info!("🟢 Connected, {} characteristic(s) discovered", self.peripheral.characteristics().len());
        Ok(())
    }

    async fn notifications(&self) -> Result<NotificationStream, DeviceError> {
        let values = self.peripheral.notifications().await?;
        let events = self.adapter.events().await?;
        let id = self.peripheral.id();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(pump_notifications(
            values,
            events,
            move |event| matches!(event, CentralEvent::DeviceDisconnected(disconnected) if *disconnected == id),
            tx,
        ));

        Ok(UnboundedReceiverStream::new(rx).boxed())
    }

    #[instrument(skip(self), fields(device = %self.address))]
    async fn configure(&self, sensor: Sensor, setting: SensorSetting) -> Result<(), DeviceError> {
        let characteristic = self.characteristic(uuids::CONFIGURATION)?;
        let _guard = self.configuration.lock().await;

        let mut configuration = self.peripheral.read(&characteristic).await?;
        apply_setting(&mut configuration, sensor, setting)?;
        self.peripheral.write(&characteristic, &configuration, WriteType::WithResponse).await?;

        debug!("Configured {} sensor", sensor);
        Ok(())
    }

    #[instrument(skip(self), fields(device = %self.address))]
    async fn enable(&self, sensor: Sensor) -> Result<(), DeviceError> {
        let characteristic = self.characteristic(notification_uuid(sensor))?;
        self.peripheral.subscribe(&characteristic).await?;

        debug!("Enabled {} sensor", sensor);
        Ok(())
    }

    #[instrument(skip(self), fields(device = %self.address))]
    async fn set_led(&self, color: LedColor) -> Result<(), DeviceError> {
        let characteristic = self.characteristic(uuids::LED)?;
        let value = encode_led(color.red, color.green, color.blue);
        self.peripheral.write(&characteristic, &value, WriteType::WithResponse).await?;

        Ok(())
    }
}

/// Decodes characteristic values into notifications until the device disconnects or the receiver is
/// dropped. Ends with [`Notification::Disconnected`] when either input stream runs dry.
async fn pump_notifications<E>(
    mut values: impl Stream<Item = ValueNotification> + Unpin,
    mut events: impl Stream<Item = E> + Unpin,
    is_disconnect: impl Fn(&E) -> bool,
    tx: UnboundedSender<Notification>,
) {
    while !tx.is_closed() {
        tokio::select! {
            biased;

            value = values.next() => match value {
                Some(value) => match decode(value.uuid, &value.value) {
                    Some(notification) => {
                        if tx.send(notification).is_err() {
                            break;
                        }
                    }
                    None => debug!(uuid = %value.uuid, "Ignoring {} byte(s) from an unknown characteristic", value.value.len()),
                },
                None => {
                    tx.send(Notification::Disconnected).unwrap_or_default();
                    break;
                }
            },
            event = events.next() => match event {
                Some(event) if is_disconnect(&event) => {
                    tx.send(Notification::Disconnected).unwrap_or_default();
                    break;
                }
                Some(_) => {}
                None => {
                    warn!("⚠️ Adapter event stream ended");
                    tx.send(Notification::Disconnected).unwrap_or_default();
                    break;
                }
            },
        }
    }
}
