use crate::domain::property::{Origin, PropertyValue};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Pressed,
    Released,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Pressed => "pressed",
            EventKind::Released => "released",
        }
    }
}

/// A momentary occurrence. Events are fired once and never mutated.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct ThingEvent {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescription {
    #[serde(skip)]
    pub kind: EventKind,
    #[serde(rename = "@type")]
    pub semantic_type: &'static str,
    pub description: &'static str,
}

/// What subscribers of the registry receive, in the order the updates were applied.
#[derive(PartialEq, Debug, Clone)]
pub enum ThingMessage {
    PropertyChanged { name: String, value: PropertyValue, origin: Origin },
    EventFired(ThingEvent),
}
