pub mod color;
pub mod commands;
pub mod device;
pub mod events;
mod number;
pub mod property;

pub use number::Number;
