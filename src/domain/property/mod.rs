mod description;
mod property;
mod property_value;

pub use description::{DeviceEffect, PropertyDescription, Unit};
pub use property::{Origin, Property, PropertyError};
pub use property_value::{PropertyKind, PropertyValue};
