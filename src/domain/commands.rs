use crate::domain::property::{DeviceEffect, PropertyValue};

/// Work handed from the registry to the device session after a local write.
#[derive(PartialEq, Debug, Clone)]
pub enum Command {
    ControlDevice {
        property: String,
        effect: DeviceEffect,
        value: PropertyValue,
    },
}
