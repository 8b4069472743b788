mod decoder;
mod device;
mod discoverer;
mod uuids;

pub use device::ThingyDevice;
pub use discoverer::discover;
