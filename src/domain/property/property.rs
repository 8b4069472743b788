use crate::domain::property::{PropertyDescription, PropertyKind, PropertyValue};
use thiserror::Error;

/// Where a value update came from.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Origin {
    /// Reported by the device; never written back to it.
    External,
    /// Requested by a client; forwarded to the device if the property has a device effect.
    Local,
}

#[derive(PartialEq, Debug)]
pub struct Property {
    description: PropertyDescription,
    value: PropertyValue,
}

impl Property {
    pub fn new(description: PropertyDescription) -> Result<Self, PropertyError> {
        let value = description.default_value().clone();
        check_kind(description.name(), description.kind(), &value)?;

        Ok(Property { description, value })
    }

    pub fn name(&self) -> &str {
        self.description.name()
    }

    pub fn description(&self) -> &PropertyDescription {
        &self.description
    }

    pub fn readonly(&self) -> bool {
        self.description.readonly()
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// Replaces the value and returns the previous one. The value is left untouched on error.
    pub fn set_value(&mut self, value: PropertyValue) -> Result<PropertyValue, PropertyError> {
        check_kind(self.name(), self.description.kind(), &value)?;
        Ok(std::mem::replace(&mut self.value, value))
    }
}

fn check_kind(name: &str, expected: PropertyKind, value: &PropertyValue) -> Result<(), PropertyError> {
    if value.kind() != expected {
        return Err(PropertyError::TypeMismatch {
            property: name.to_string(),
            expected,
            actual: value.kind(),
        });
    }

    Ok(())
}

#[derive(Error, PartialEq, Debug)]
pub enum PropertyError {
    #[error("property '{0}' is already registered")]
    DuplicateName(String),
    #[error("unknown property '{0}'")]
    UnknownProperty(String),
    #[error("property '{property}' expects a {expected} value, got a {actual} value")]
    TypeMismatch {
        property: String,
        expected: PropertyKind,
        actual: PropertyKind,
    },
    #[error("property '{0}' is read-only")]
    ReadOnly(String),
    #[error("read-only property '{0}' cannot have a device effect")]
    EffectOnReadOnly(String),
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
    #[error("the device session has ended")]
    Closed,
}
