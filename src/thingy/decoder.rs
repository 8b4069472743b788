use crate::color_normalizer::RawColorSample;
use crate::domain::device::{ButtonState, DeviceError, Notification, Sensor, SensorSetting};
use crate::thingy::uuids;
use uuid::Uuid;

/// Length of the environment configuration characteristic: four u16 intervals, the gas mode and the
/// color sensor LED calibration (r, g, b).
const CONFIGURATION_LEN: usize = 12;
const GAS_MODE_OFFSET: usize = 8;

/// Decodes a characteristic value notification. Unknown characteristics and short payloads yield
/// `None`.
pub fn decode(uuid: Uuid, value: &[u8]) -> Option<Notification> {
    match uuid {
        uuids::TEMPERATURE => {
            let [integer, decimal, ..] = *value else { return None };
            Some(Notification::Temperature(integer as i8 as f64 + decimal as f64 / 100.0))
        }
        uuids::PRESSURE => {
            let [a, b, c, d, decimal, ..] = *value else { return None };
            Some(Notification::Pressure(i32::from_le_bytes([a, b, c, d]) as f64 + decimal as f64 / 100.0))
        }
        uuids::HUMIDITY => value.first().map(|humidity| Notification::Humidity(*humidity)),
        uuids::GAS => Some(Notification::Gas {
            eco2: read_u16(value, 0)?,
            tvoc: read_u16(value, 2)?,
        }),
        uuids::COLOR => Some(Notification::Color(RawColorSample {
            red: read_u16(value, 0)?,
            green: read_u16(value, 2)?,
            blue: read_u16(value, 4)?,
            clear: read_u16(value, 6)?,
        })),
        uuids::BUTTON => value.first().map(|state| match state {
            0 => Notification::Button(ButtonState::Released),
            _ => Notification::Button(ButtonState::Pressed),
        }),
        uuids::BATTERY_LEVEL => value.first().map(|level| Notification::BatteryLevel(*level)),
        _ => None,
    }
}

/// The characteristic that has to be subscribed to for a sensor to report.
pub fn notification_uuid(sensor: Sensor) -> Uuid {
    match sensor {
        Sensor::Temperature => uuids::TEMPERATURE,
        Sensor::Pressure => uuids::PRESSURE,
        Sensor::Humidity => uuids::HUMIDITY,
        Sensor::Color => uuids::COLOR,
        Sensor::Gas => uuids::GAS,
        Sensor::Button => uuids::BUTTON,
        Sensor::Battery => uuids::BATTERY_LEVEL,
    }
}

/// Writes a sensor setting into a copy of the configuration characteristic, leaving the other
/// sensors' settings as read from the device.
pub fn apply_setting(configuration: &mut [u8], sensor: Sensor, setting: SensorSetting) -> Result<(), DeviceError> {
    if configuration.len() < CONFIGURATION_LEN {
        return Err(DeviceError::Rejected(format!(
            "configuration is {} bytes long, expected {}",
            configuration.len(),
            CONFIGURATION_LEN
        )));
    }

    match (sensor, setting) {
        (Sensor::Temperature | Sensor::Pressure | Sensor::Humidity | Sensor::Color, SensorSetting::Interval(interval)) => {
            let offset = match sensor {
                Sensor::Temperature => 0,
                Sensor::Pressure => 2,
                Sensor::Humidity => 4,
                _ => 6,
            };
            let millis = u16::try_from(interval.as_millis()).unwrap_or(u16::MAX);
            configuration[offset..offset + 2].copy_from_slice(&millis.to_le_bytes());
            Ok(())
        }
        (Sensor::Gas, SensorSetting::GasMode(mode @ 1..=3)) => {
            configuration[GAS_MODE_OFFSET] = mode;
            Ok(())
        }
        _ => Err(DeviceError::UnsupportedSetting(sensor, setting)),
    }
}

pub fn encode_led(red: u8, green: u8, blue: u8) -> [u8; 4] {
    // 0x01 = constant color mode
    [0x01, red, green, blue]
}

fn read_u16(value: &[u8], offset: usize) -> Option<u16> {
    let bytes = value.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}
