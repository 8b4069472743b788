use crate::domain::device::{DeviceError, LedColor, Notification, NotificationStream, Sensor, SensorDevice, SensorSetting};
use async_trait::async_trait;
use futures::StreamExt;
use futures::future;
use std::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;

#[derive(PartialEq, Debug, Clone)]
pub enum Call {
    Connect,
    Subscribe,
    Configure(Sensor, SensorSetting),
    Enable(Sensor),
    SetLed(LedColor),
}

/// An in-memory device that records every call and fails or stalls the ones it is told to.
#[derive(Debug)]
pub struct ScriptedDevice {
    calls: Mutex<Vec<Call>>,
    failing: Vec<Call>,
    stalling: Vec<Call>,
    notifier: UnboundedSender<Notification>,
    notifications: Mutex<Option<UnboundedReceiver<Notification>>>,
}

impl ScriptedDevice {
    pub fn new() -> Self {
        let (notifier, notifications) = mpsc::unbounded_channel();

        ScriptedDevice {
            calls: Mutex::new(Vec::new()),
            failing: Vec::new(),
            stalling: Vec::new(),
            notifier,
            notifications: Mutex::new(Some(notifications)),
        }
    }

    pub fn failing(mut self, call: Call) -> Self {
        self.failing.push(call);
        self
    }

    /// Makes the call never complete.
    pub fn stalling(mut self, call: Call) -> Self {
        self.stalling.push(call);
        self
    }

    /// Queues a notification for the session to receive.
    pub fn notify(&self, notification: Notification) {
        self.notifier.send(notification).unwrap();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: Call) -> Result<(), DeviceError> {
        let fails = self.failing.contains(&call);
        let stalls = self.stalling.contains(&call);
        self.calls.lock().unwrap().push(call.clone());

        if stalls {
            future::pending::<()>().await;
        }

        if fails {
            return Err(DeviceError::Rejected(format!("{:?}", call)));
        }

        Ok(())
    }
}

#[async_trait]
impl SensorDevice for ScriptedDevice {
    fn address(&self) -> &str {
        "00:00:00:00:00:00"
    }

    async fn connect_and_set_up(&self) -> Result<(), DeviceError> {
        self.record(Call::Connect).await
    }

    async fn notifications(&self) -> Result<NotificationStream, DeviceError> {
        self.record(Call::Subscribe).await?;

        let receiver = self.notifications.lock().unwrap().take();
        match receiver {
            Some(receiver) => Ok(UnboundedReceiverStream::new(receiver).boxed()),
            None => Err(DeviceError::Rejected("already subscribed".to_string())),
        }
    }

    async fn configure(&self, sensor: Sensor, setting: SensorSetting) -> Result<(), DeviceError> {
        self.record(Call::Configure(sensor, setting)).await
    }

    async fn enable(&self, sensor: Sensor) -> Result<(), DeviceError> {
        self.record(Call::Enable(sensor)).await
    }

    async fn set_led(&self, color: LedColor) -> Result<(), DeviceError> {
        self.record(Call::SetLed(color)).await
    }
}
