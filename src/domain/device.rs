use crate::color_normalizer::RawColorSample;
use crate::domain::color::{Color, ColorConversionError};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt::{Debug, Display};
use std::time::Duration;
use thiserror::Error;

pub type NotificationStream = BoxStream<'static, Notification>;

/// A connected sensor device. Every call is independent; the implementation serializes access to
/// the hardware where it has to.
#[async_trait]
pub trait SensorDevice: Debug + Send + Sync {
    fn address(&self) -> &str;

    async fn connect_and_set_up(&self) -> Result<(), DeviceError>;

    /// The stream ends, or yields [`Notification::Disconnected`], when the device goes away.
    async fn notifications(&self) -> Result<NotificationStream, DeviceError>;

    async fn configure(&self, sensor: Sensor, setting: SensorSetting) -> Result<(), DeviceError>;

    async fn enable(&self, sensor: Sensor) -> Result<(), DeviceError>;

    async fn set_led(&self, color: LedColor) -> Result<(), DeviceError>;
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum Sensor {
    Temperature,
    Pressure,
    Humidity,
    Color,
    Gas,
    Button,
    Battery,
}

impl Display for Sensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Sensor::Temperature => "temperature",
            Sensor::Pressure => "pressure",
            Sensor::Humidity => "humidity",
            Sensor::Color => "color",
            Sensor::Gas => "gas",
            Sensor::Button => "button",
            Sensor::Battery => "battery level",
        };
        write!(f, "{}", name)
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum SensorSetting {
    Interval(Duration),
    /// 1 = every second, 2 = every 10 seconds, 3 = every minute
    GasMode(u8),
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Notification {
    Temperature(f64),
    Pressure(f64),
    Humidity(u8),
    Gas { eco2: u16, tvoc: u16 },
    Color(RawColorSample),
    BatteryLevel(u8),
    Button(ButtonState),
    Disconnected,
}

/// The color object the device's LED understands.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct LedColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl TryFrom<Color> for LedColor {
    type Error = ColorConversionError;

    fn try_from(color: Color) -> Result<Self, Self::Error> {
        match color.to_rgb()? {
            Color::RGB(red, green, blue) => Ok(LedColor { red, green, blue }),
            Color::Hex(value) => Err(ColorConversionError::InvalidHexFormat(value)),
        }
    }
}

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),
    #[error("characteristic {0} not found on the device")]
    MissingCharacteristic(uuid::Uuid),
    #[error("{0} cannot be configured with {1:?}")]
    UnsupportedSetting(Sensor, SensorSetting),
    #[error("device rejected the request: {0}")]
    Rejected(String),
}
