use crate::domain::events::{EventDescription, EventKind};
use crate::domain::property::{DeviceEffect, PropertyDescription, PropertyKind, Unit};
use crate::registry::PropertyRegistry;
use serde_json::{Map, Value, json};

pub const THING_ID: &str = "thingy:52";
pub const THING_TITLE: &str = "A WoT-connected Thingy:52";
pub const THING_TYPES: [&str; 2] = ["ColorControl", "PushButton"];

pub const TEMPERATURE: &str = "temperature";
pub const PRESSURE: &str = "pressure";
pub const HUMIDITY: &str = "humidity";
pub const ECO2: &str = "eco2";
pub const TVOC: &str = "tvoc";
pub const LUMINOSITY: &str = "luminosity";
pub const BATTERY: &str = "battery";
pub const LED_COLOR: &str = "ledColor";
pub const SENSED_COLOR: &str = "sensedColor";
pub const BUTTON: &str = "button";

pub fn property_table() -> Vec<PropertyDescription> {
    vec![
        PropertyDescription::builder(TEMPERATURE, PropertyKind::Number)
            .unit(Unit::DegreesCelsius)
            .label("Temperature")
            .description("An ambient temperature sensor")
            .readonly()
            .build(),
        PropertyDescription::builder(PRESSURE, PropertyKind::Number)
            .unit(Unit::Hectopascal)
            .label("Pressure")
            .readonly()
            .build(),
        PropertyDescription::builder(HUMIDITY, PropertyKind::Number)
            .unit(Unit::Percentage)
            .label("Humidity")
            .readonly()
            .build(),
        PropertyDescription::builder(ECO2, PropertyKind::Number)
            .unit(Unit::PartsPerMillion)
            .label("ECO2")
            .description("Effective CO2")
            .readonly()
            .build(),
        PropertyDescription::builder(TVOC, PropertyKind::Number)
            .unit(Unit::PartsPerBillion)
            .label("TVOC")
            .description("Total volatile organic compound")
            .readonly()
            .build(),
        PropertyDescription::builder(LUMINOSITY, PropertyKind::Number)
            .unit(Unit::Lux)
            .label("Luminosity")
            .readonly()
            .build(),
        PropertyDescription::builder(BATTERY, PropertyKind::Number)
            .unit(Unit::Percentage)
            .label("Battery")
            .readonly()
            .build(),
        PropertyDescription::builder(LED_COLOR, PropertyKind::String)
            .semantic_type("ColorProperty")
            .label("LED Color")
            .default_value("#0000ff")
            .device_effect(DeviceEffect::SetLedColor)
            .build(),
        PropertyDescription::builder(SENSED_COLOR, PropertyKind::String)
            .semantic_type("ColorProperty")
            .label("Sensed Color")
            .default_value("#000000")
            .readonly()
            .build(),
        PropertyDescription::builder(BUTTON, PropertyKind::Boolean)
            .semantic_type("PushedProperty")
            .label("Button")
            .readonly()
            .build(),
    ]
}

pub fn event_table() -> Vec<EventDescription> {
    vec![
        EventDescription {
            kind: EventKind::Pressed,
            semantic_type: "PressedEvent",
            description: "Button pressed",
        },
        EventDescription {
            kind: EventKind::Released,
            semantic_type: "ReleasedEvent",
            description: "Button released",
        },
    ]
}

/// The thing description fragment the protocol layer serves for this device.
pub fn describe(registry: &PropertyRegistry) -> Value {
    let properties = registry
        .properties()
        .map(|property| (property.name().to_string(), json!(property.description())))
        .collect::<Map<String, Value>>();

    let events = registry
        .events()
        .iter()
        .map(|event| (event.kind.name().to_string(), json!(event)))
        .collect::<Map<String, Value>>();

    json!({
        "id": THING_ID,
        "title": THING_TITLE,
        "@type": THING_TYPES,
        "properties": properties,
        "events": events,
    })
}
