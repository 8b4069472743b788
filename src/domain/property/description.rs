use crate::domain::property::{PropertyKind, PropertyValue};
use serde::Serialize;

/// Static metadata of a property, consumed by the protocol layer to build its schema.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescription {
    #[serde(skip)]
    name: String,
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    semantic_type: Option<String>,
    #[serde(rename = "type")]
    kind: PropertyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<Unit>,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    read_only: bool,
    #[serde(skip)]
    default_value: PropertyValue,
    #[serde(skip)]
    device_effect: Option<DeviceEffect>,
}

impl PropertyDescription {
    pub fn builder(name: impl Into<String>, kind: PropertyKind) -> PropertyDescriptionBuilder {
        PropertyDescriptionBuilder::new(name.into(), kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn unit(&self) -> Option<Unit> {
        self.unit
    }

    pub fn readonly(&self) -> bool {
        self.read_only
    }

    pub fn default_value(&self) -> &PropertyValue {
        &self.default_value
    }

    pub fn device_effect(&self) -> Option<DeviceEffect> {
        self.device_effect
    }
}

pub struct PropertyDescriptionBuilder {
    name: String,
    semantic_type: Option<String>,
    kind: PropertyKind,
    unit: Option<Unit>,
    label: Option<String>,
    description: Option<String>,
    readonly: bool,
    default_value: PropertyValue,
    device_effect: Option<DeviceEffect>,
}

impl PropertyDescriptionBuilder {
    pub fn new(name: String, kind: PropertyKind) -> Self {
        PropertyDescriptionBuilder {
            name,
            semantic_type: None,
            kind,
            unit: None,
            label: None,
            description: None,
            readonly: false,
            default_value: PropertyValue::default_for(kind),
            device_effect: None,
        }
    }

    pub fn semantic_type(mut self, value: impl Into<String>) -> Self {
        self.semantic_type = Some(value.into());
        self
    }

    pub fn unit(mut self, value: Unit) -> Self {
        self.unit = Some(value);
        self
    }

    pub fn label(mut self, value: impl Into<String>) -> Self {
        self.label = Some(value.into());
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<PropertyValue>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn device_effect(mut self, effect: DeviceEffect) -> Self {
        self.device_effect = Some(effect);
        self
    }

    pub fn build(self) -> PropertyDescription {
        PropertyDescription {
            label: self.label.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            semantic_type: self.semantic_type,
            kind: self.kind,
            unit: self.unit,
            description: self.description,
            read_only: self.readonly,
            default_value: self.default_value,
            device_effect: self.device_effect,
        }
    }
}

/// What a local write of the property does to the physical device.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum DeviceEffect {
    SetLedColor,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize)]
pub enum Unit {
    #[serde(rename = "percent")]
    Percentage,
    #[serde(rename = "lux")]
    Lux,
    #[serde(rename = "degree celsius")]
    DegreesCelsius,
    #[serde(rename = "hectopascal")]
    Hectopascal,
    #[serde(rename = "ppm")]
    PartsPerMillion,
    #[serde(rename = "ppb")]
    PartsPerBillion,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Percentage => "%",
            Unit::Lux => " lx",
            Unit::DegreesCelsius => " °C",
            Unit::Hectopascal => " hPa",
            Unit::PartsPerMillion => " ppm",
            Unit::PartsPerBillion => " ppb",
        }
    }
}
