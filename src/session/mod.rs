mod map_notification;
#[cfg(test)]
mod scripted_device;
mod session;
mod setup;

pub use session::DeviceSession;
pub use setup::sensor_plan;
