use crate::domain::commands::Command;
use crate::domain::events::{EventDescription, EventKind, ThingEvent, ThingMessage};
use crate::domain::property::{Origin, Property, PropertyDescription, PropertyError, PropertyValue};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::broadcast::{self, Receiver as BroadcastReceiver, Sender as BroadcastSender};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

pub type SharedRegistry = Arc<RwLock<PropertyRegistry>>;

/// Single owner of every property value of a device session.
#[derive(Debug)]
pub struct PropertyRegistry {
    properties: HashMap<String, Property>,
    // Registration order, used when describing the thing
    order: Vec<String>,
    events: Vec<EventDescription>,
    command_tx: UnboundedSender<Command>,
    notifier_tx: BroadcastSender<ThingMessage>,
    closed: bool,
}

impl PropertyRegistry {
    pub fn new(command_tx: UnboundedSender<Command>, buffer_size: usize) -> Self {
        let (notifier_tx, _) = broadcast::channel(buffer_size.max(1));

        PropertyRegistry {
            properties: HashMap::new(),
            order: Vec::new(),
            events: Vec::new(),
            command_tx,
            notifier_tx,
            closed: false,
        }
    }

    /// Builds a registry from a fixed table, rejecting the whole table if any entry is invalid.
    pub fn from_table(
        properties: Vec<PropertyDescription>,
        events: Vec<EventDescription>,
        command_tx: UnboundedSender<Command>,
        buffer_size: usize,
    ) -> Result<Self, PropertyError> {
        let mut registry = PropertyRegistry::new(command_tx, buffer_size);

        for description in properties {
            registry.register(description)?;
        }
        for event in events {
            registry.register_event(event);
        }

        Ok(registry)
    }

    pub fn shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    pub fn subscribe(&self) -> BroadcastReceiver<ThingMessage> {
        self.notifier_tx.subscribe()
    }

    pub fn register(&mut self, description: PropertyDescription) -> Result<(), PropertyError> {
        if self.properties.contains_key(description.name()) {
            return Err(PropertyError::DuplicateName(description.name().to_string()));
        }

        if description.readonly() && description.device_effect().is_some() {
            return Err(PropertyError::EffectOnReadOnly(description.name().to_string()));
        }

        let property = Property::new(description)?;
        let name = property.name().to_string();
        debug!(property = name, "🔵 Registered property '{}'", name);

        self.order.push(name.clone());
        self.properties.insert(name, property);
        Ok(())
    }

    pub fn register_event(&mut self, description: EventDescription) {
        if !self.events.iter().any(|event| event.kind == description.kind) {
            self.events.push(description);
        }
    }

    #[cfg(test)]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    #[cfg(test)]
    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name).map(Property::value)
    }

    /// Properties in registration order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.order.iter().filter_map(|name| self.properties.get(name))
    }

    pub fn events(&self) -> &[EventDescription] {
        &self.events
    }

    /// Applies a value reported by the device. Never triggers a device effect.
    pub fn apply_external_update(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        self.apply(name, value, Origin::External)?;
        Ok(())
    }

    /// Applies a value requested by a client and forwards it to the device if the property has a
    /// device effect. A failing device write does not undo the new value.
    #[instrument(skip(self, value))]
    pub fn apply_local_write(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        let property = self.properties.get(name).ok_or_else(|| PropertyError::UnknownProperty(name.to_string()))?;
        if property.readonly() {
            return Err(PropertyError::ReadOnly(name.to_string()));
        }

        let effect = property.description().device_effect();
        self.apply(name, value.clone(), Origin::Local)?;

        if let Some(effect) = effect {
            let command = Command::ControlDevice {
                property: name.to_string(),
                effect,
                value,
            };

            if self.command_tx.send(command).is_err() {
                warn!(property = name, "⚠️ No device session is listening, '{}' was not forwarded to the device", name);
            }
        }

        Ok(())
    }

    pub fn emit_event(&mut self, kind: EventKind) -> Result<ThingEvent, PropertyError> {
        if self.closed {
            return Err(PropertyError::Closed);
        }

        if !self.events.iter().any(|event| event.kind == kind) {
            return Err(PropertyError::UnknownEvent(kind.name().to_string()));
        }

        let event = ThingEvent { kind, timestamp: Utc::now() };
        info!(event = kind.name(), "🟢 Fired event '{}'", kind.name());

        self.notifier_tx.send(ThingMessage::EventFired(event.clone())).unwrap_or_default();
        Ok(event)
    }

    /// Ends the session for this registry. Every later update is rejected.
    pub fn close(&mut self) {
        self.closed = true;
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn apply(&mut self, name: &str, value: PropertyValue, origin: Origin) -> Result<(), PropertyError> {
        if self.closed {
            return Err(PropertyError::Closed);
        }

        let property = self.properties.get_mut(name).ok_or_else(|| PropertyError::UnknownProperty(name.to_string()))?;
        let previous_value = property.set_value(value.clone())?;
        let unit = property.description().unit().map(|unit| unit.symbol()).unwrap_or_default();

        debug!(property = name, ?origin, "🟢 Set '{}' to '{}{}', was '{}{}'", name, value, unit, previous_value, unit);

        let message = ThingMessage::PropertyChanged {
            name: name.to_string(),
            value,
            origin,
        };
        self.notifier_tx.send(message).unwrap_or_default();

        Ok(())
    }
}
