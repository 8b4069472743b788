use crate::color_normalizer::{RawColorSample, normalize};
use crate::domain::device::{ButtonState, Notification};
use crate::domain::events::EventKind;
use crate::domain::property::PropertyValue;
use crate::thing;

#[derive(PartialEq, Debug, Clone)]
pub enum Reaction {
    UpdateProperty { property: &'static str, value: PropertyValue },
    FireEvent(EventKind),
}

impl Reaction {
    fn update(property: &'static str, value: impl Into<PropertyValue>) -> Reaction {
        Reaction::UpdateProperty {
            property,
            value: value.into(),
        }
    }
}

/// Maps a device notification to the registry changes it causes. A disconnect causes none, ending the
/// session is up to the caller.
pub fn map_notification(notification: Notification) -> Vec<Reaction> {
    match notification {
        Notification::Temperature(value) => vec![Reaction::update(thing::TEMPERATURE, value)],
        Notification::Pressure(value) => vec![Reaction::update(thing::PRESSURE, value)],
        Notification::Humidity(value) => vec![Reaction::update(thing::HUMIDITY, value)],
        Notification::Gas { eco2, tvoc } => map_gas(eco2, tvoc),
        Notification::Color(sample) => map_color(&sample),
        Notification::BatteryLevel(value) => vec![Reaction::update(thing::BATTERY, value)],
        Notification::Button(state) => map_button(state),
        Notification::Disconnected => vec![],
    }
}

fn map_gas(eco2: u16, tvoc: u16) -> Vec<Reaction> {
    vec![Reaction::update(thing::ECO2, eco2), Reaction::update(thing::TVOC, tvoc)]
}

fn map_color(sample: &RawColorSample) -> Vec<Reaction> {
    vec![
        Reaction::update(thing::SENSED_COLOR, normalize(sample)),
        Reaction::update(thing::LUMINOSITY, sample.clear),
    ]
}

fn map_button(state: ButtonState) -> Vec<Reaction> {
    let (pressed, event) = match state {
        ButtonState::Pressed => (true, EventKind::Pressed),
        ButtonState::Released => (false, EventKind::Released),
    };

    vec![Reaction::update(thing::BUTTON, pressed), Reaction::FireEvent(event)]
}
