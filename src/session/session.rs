use crate::domain::color::Color;
use crate::domain::commands::Command;
use crate::domain::device::{LedColor, Notification, SensorDevice};
use crate::domain::property::DeviceEffect;
use crate::registry::SharedRegistry;
use crate::session::map_notification::{Reaction, map_notification};
use crate::session::setup::{SensorPlan, configure_sensors};
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::watch::{self, Sender as WatchSender};
use tracing::{debug, error, info, instrument, warn};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Configuring,
    Active,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Configuring => "configuring",
            SessionState::Active => "active",
        };
        write!(f, "{}", name)
    }
}

/// One connection to one device, from connect until disconnect. A session runs once; reconnecting
/// takes a new session.
#[derive(Debug)]
pub struct DeviceSession {
    device: Arc<dyn SensorDevice>,
    registry: SharedRegistry,
    commands: UnboundedReceiver<Command>,
    plan: Vec<SensorPlan>,
    state_tx: WatchSender<SessionState>,
    finished: bool,
}

impl DeviceSession {
    pub fn new(device: Arc<dyn SensorDevice>, registry: SharedRegistry, commands: UnboundedReceiver<Command>, plan: Vec<SensorPlan>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Disconnected);

        DeviceSession {
            device,
            registry,
            commands,
            plan,
            state_tx,
            finished: false,
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    #[cfg(test)]
    pub fn state_watch(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn registry(&self) -> SharedRegistry {
        self.registry.clone()
    }

    /// Connects, configures the sensors and mirrors notifications into the registry until the device
    /// disconnects. Device failures are logged, never returned.
    #[instrument(skip_all, fields(device = self.device.address()))]
    pub async fn run(&mut self) {
        if self.finished {
            warn!("⚠️ Session already ended, start a new session to reconnect");
            return;
        }

        self.transition(SessionState::Connecting);
        if let Err(e) = self.device.connect_and_set_up().await {
            error!("❌ Failed to connect: {}", e);
            self.end().await;
            return;
        }
        info!("✅ Connected to {}", self.device.address());

        self.transition(SessionState::Configuring);
        let mut notifications = match self.device.notifications().await {
            Ok(notifications) => notifications,
            Err(e) => {
                error!("❌ Failed to subscribe to notifications: {}", e);
                self.end().await;
                return;
            }
        };
        let mut pending = configure_sensors(&self.device, &self.plan);

        self.transition(SessionState::Active);
        let mut failures = 0;
        loop {
            tokio::select! {
                biased;

                Some(command) = self.commands.recv() => {
                    if let Some(call) = self.execute(command) {
                        pending.push(call);
                    }
                },
                Some(failed) = pending.next() => {
                    failures += failed;
                    if pending.is_empty() {
                        debug!("All issued device calls completed, {} failed", failures);
                    }
                },
                notification = notifications.next() => match notification {
                    Some(Notification::Disconnected) | None => break,
                    Some(notification) => self.handle_notification(notification).await,
                },
            }
        }

        if !pending.is_empty() {
            warn!("⚠️ Dropping {} unfinished device call(s)", pending.len());
        }
        info!("🔴 Disconnected from {}", self.device.address());
        self.end().await;
    }

    async fn handle_notification(&self, notification: Notification) {
        debug!(?notification, "🔹 Received notification");
        let mut registry = self.registry.write().await;

        for reaction in map_notification(notification) {
            let result = match reaction {
                Reaction::UpdateProperty { property, value } => registry.apply_external_update(property, value),
                Reaction::FireEvent(kind) => registry.emit_event(kind).map(|_| ()),
            };

            if let Err(e) = result {
                error!("❌ Could not apply {:?}: {}", notification, e);
            }
        }
    }

    /// Turns a command into the device call that carries it out. Invalid commands are logged and
    /// dropped.
    fn execute(&self, command: Command) -> Option<BoxFuture<'static, usize>> {
        match command {
            Command::ControlDevice {
                property,
                effect: DeviceEffect::SetLedColor,
                value,
            } => {
                let Some(hex) = value.as_str() else {
                    warn!(property, "⚠️ Expected a color string for '{}', got '{}'", property, value);
                    return None;
                };

                let color = match LedColor::try_from(Color::Hex(hex.to_string())) {
                    Ok(color) => color,
                    Err(e) => {
                        warn!(property, "⚠️ Failed to set LED color: {}", e);
                        return None;
                    }
                };

                info!(property, "🟢 Setting LED color to {}", hex);
                let device = self.device.clone();
                Some(
                    async move {
                        match device.set_led(color).await {
                            Ok(()) => 0,
                            Err(e) => {
                                warn!(property, "⚠️ Failed to set LED color: {}", e);
                                1
                            }
                        }
                    }
                    .boxed(),
                )
            }
        }
    }

    fn transition(&self, state: SessionState) {
        debug!("Session {} → {}", self.state(), state);
        self.state_tx.send_replace(state);
    }

    async fn end(&mut self) {
        self.finished = true;
        self.registry.write().await.close();
        self.transition(SessionState::Disconnected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use crate::color_normalizer::RawColorSample;
    use crate::domain::device::{ButtonState, Sensor};
    use crate::domain::events::{EventKind, ThingMessage};
    use crate::domain::property::PropertyValue;
    use crate::registry::PropertyRegistry;
    use crate::session::scripted_device::{Call, ScriptedDevice};
    use crate::session::setup::sensor_plan;
    use crate::thing;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use test_log::test;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn session(device: Arc<ScriptedDevice>) -> DeviceSession {
        let (tx, rx) = mpsc::unbounded_channel();
        let registry = PropertyRegistry::from_table(thing::property_table(), thing::event_table(), tx, 64).unwrap().shared();
        let config = AppConfigBuilder::new().build();

        DeviceSession::new(device, registry, rx, sensor_plan(config.sensors()))
    }

    async fn value(registry: &SharedRegistry, name: &str) -> PropertyValue {
        registry.read().await.value(name).cloned().unwrap()
    }

    #[test(tokio::test)]
    async fn failed_connect_ends_the_session_without_configuring() {
        let device = Arc::new(ScriptedDevice::new().failing(Call::Connect));
        let mut session = session(device.clone());
        let registry = session.registry();

        session.run().await;

        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(device.calls(), vec![Call::Connect]);
        assert_eq!(value(&registry, thing::TEMPERATURE).await, PropertyValue::from(0u64));
        assert_eq!(value(&registry, thing::LED_COLOR).await, PropertyValue::from("#0000ff"));
        assert_eq!(value(&registry, thing::SENSED_COLOR).await, PropertyValue::from("#000000"));
        assert!(registry.read().await.is_closed());
    }

    #[test(tokio::test)]
    async fn failed_subscription_ends_the_session() {
        let device = Arc::new(ScriptedDevice::new().failing(Call::Subscribe));
        let mut session = session(device.clone());

        session.run().await;

        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(device.calls(), vec![Call::Connect, Call::Subscribe]);
    }

    #[test(tokio::test)]
    async fn reaches_active_when_an_enable_call_fails() {
        let device = Arc::new(ScriptedDevice::new().failing(Call::Enable(Sensor::Pressure)));
        let mut session = session(device.clone());
        let mut state = session.state_watch();

        let handle = tokio::spawn(async move {
            session.run().await;
            session
        });
        state.wait_for(|state| *state == SessionState::Active).await.unwrap();
        device.notify(Notification::Disconnected);
        let session = handle.await.unwrap();

        assert_eq!(session.state(), SessionState::Disconnected);
        let calls = device.calls();
        for sensor in [Sensor::Temperature, Sensor::Pressure, Sensor::Humidity, Sensor::Color, Sensor::Gas, Sensor::Button, Sensor::Battery] {
            assert!(calls.contains(&Call::Enable(sensor)), "{} was not enabled", sensor);
        }
    }

    #[test(tokio::test)]
    async fn a_stalled_sensor_call_does_not_hold_up_the_session() {
        let device = Arc::new(ScriptedDevice::new().stalling(Call::Enable(Sensor::Pressure)));
        let mut session = session(device.clone());
        let registry = session.registry();
        let mut state = session.state_watch();

        registry.write().await.apply_local_write(thing::LED_COLOR, PropertyValue::from("#ff0000")).unwrap();
        device.notify(Notification::Temperature(22.5));
        let handle = tokio::spawn(async move {
            session.run().await;
            session
        });

        timeout(Duration::from_millis(500), state.wait_for(|state| *state == SessionState::Active))
            .await
            .expect("session never became active")
            .unwrap();
        timeout(Duration::from_millis(500), async {
            while value(&registry, thing::TEMPERATURE).await != PropertyValue::from(22.5) {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("temperature was never mirrored");
        timeout(Duration::from_millis(500), async {
            while !device.calls().contains(&Call::SetLed(LedColor { red: 255, green: 0, blue: 0 })) {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("LED was never set");

        device.notify(Notification::Disconnected);
        let session = handle.await.unwrap();
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test(tokio::test)]
    async fn a_stalled_led_write_does_not_hold_up_notifications() {
        let color = LedColor { red: 0, green: 0, blue: 0 };
        let device = Arc::new(ScriptedDevice::new().stalling(Call::SetLed(color)));
        let mut session = session(device.clone());
        let registry = session.registry();

        registry.write().await.apply_local_write(thing::LED_COLOR, PropertyValue::from("#000000")).unwrap();
        device.notify(Notification::Humidity(55));
        device.notify(Notification::Disconnected);
        timeout(Duration::from_millis(500), session.run()).await.expect("session got stuck");

        assert!(device.calls().contains(&Call::SetLed(color)));
        assert_eq!(value(&registry, thing::HUMIDITY).await, PropertyValue::from(55u8));
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test(tokio::test)]
    async fn mirrors_notifications_into_the_registry() {
        let device = Arc::new(ScriptedDevice::new());
        let mut session = session(device.clone());
        let registry = session.registry();

        device.notify(Notification::Temperature(22.5));
        device.notify(Notification::Pressure(1009.75));
        device.notify(Notification::Humidity(41));
        device.notify(Notification::Gas { eco2: 412, tvoc: 3 });
        device.notify(Notification::BatteryLevel(93));
        device.notify(Notification::Color(RawColorSample {
            red: 100,
            green: 0,
            blue: 0,
            clear: 400,
        }));
        device.notify(Notification::Disconnected);

        session.run().await;

        assert_eq!(value(&registry, thing::TEMPERATURE).await, PropertyValue::from(22.5));
        assert_eq!(value(&registry, thing::PRESSURE).await, PropertyValue::from(1009.75));
        assert_eq!(value(&registry, thing::HUMIDITY).await, PropertyValue::from(41u8));
        assert_eq!(value(&registry, thing::ECO2).await, PropertyValue::from(412u16));
        assert_eq!(value(&registry, thing::TVOC).await, PropertyValue::from(3u16));
        assert_eq!(value(&registry, thing::BATTERY).await, PropertyValue::from(93u8));
        assert_eq!(value(&registry, thing::SENSED_COLOR).await, PropertyValue::from("#ff0000"));
        assert_eq!(value(&registry, thing::LUMINOSITY).await, PropertyValue::from(400u16));
    }

    #[test(tokio::test)]
    async fn button_fires_one_event_per_notification() {
        let device = Arc::new(ScriptedDevice::new());
        let mut session = session(device.clone());
        let registry = session.registry();
        let mut messages = registry.read().await.subscribe();

        device.notify(Notification::Button(ButtonState::Pressed));
        device.notify(Notification::Button(ButtonState::Released));
        device.notify(Notification::Disconnected);
        session.run().await;

        let mut events = vec![];
        while let Ok(message) = messages.try_recv() {
            if let ThingMessage::EventFired(event) = message {
                events.push(event.kind);
            }
        }
        assert_eq!(events, vec![EventKind::Pressed, EventKind::Released]);
        assert_eq!(value(&registry, thing::BUTTON).await, PropertyValue::from(false));
    }

    #[test(tokio::test)]
    async fn local_led_color_write_sets_the_led_once() {
        let device = Arc::new(ScriptedDevice::new());
        let mut session = session(device.clone());
        let registry = session.registry();

        registry.write().await.apply_local_write(thing::LED_COLOR, PropertyValue::from("#ff8000")).unwrap();
        device.notify(Notification::Disconnected);
        session.run().await;

        let led_calls = device.calls().into_iter().filter(|call| matches!(call, Call::SetLed(_))).collect::<Vec<_>>();
        assert_eq!(led_calls, vec![Call::SetLed(LedColor { red: 255, green: 128, blue: 0 })]);
    }

    #[test(tokio::test)]
    async fn failed_led_write_keeps_the_written_value() {
        let color = LedColor { red: 0, green: 255, blue: 0 };
        let device = Arc::new(ScriptedDevice::new().failing(Call::SetLed(color)));
        let mut session = session(device.clone());
        let registry = session.registry();

        registry.write().await.apply_local_write(thing::LED_COLOR, PropertyValue::from("#00ff00")).unwrap();
        device.notify(Notification::Disconnected);
        session.run().await;

        assert!(device.calls().contains(&Call::SetLed(color)));
        assert_eq!(value(&registry, thing::LED_COLOR).await, PropertyValue::from("#00ff00"));
    }

    #[test(tokio::test)]
    async fn sensed_color_updates_never_reach_the_led() {
        let device = Arc::new(ScriptedDevice::new());
        let mut session = session(device.clone());

        device.notify(Notification::Color(RawColorSample {
            red: 10,
            green: 20,
            blue: 30,
            clear: 380,
        }));
        device.notify(Notification::Disconnected);
        session.run().await;

        assert!(!device.calls().iter().any(|call| matches!(call, Call::SetLed(_))));
    }

    #[test(tokio::test)]
    async fn no_updates_are_accepted_after_disconnect() {
        let device = Arc::new(ScriptedDevice::new());
        let mut session = session(device.clone());
        let registry = session.registry();

        device.notify(Notification::Disconnected);
        session.run().await;

        let result = registry.write().await.apply_external_update(thing::TEMPERATURE, PropertyValue::from(30.0));
        assert!(result.is_err());
        assert_eq!(value(&registry, thing::TEMPERATURE).await, PropertyValue::from(0u64));
    }

    #[test(tokio::test)]
    async fn a_session_runs_only_once() {
        let device = Arc::new(ScriptedDevice::new());
        let mut session = session(device.clone());

        device.notify(Notification::Disconnected);
        session.run().await;
        session.run().await;

        let connects = device.calls().into_iter().filter(|call| call == &Call::Connect).count();
        assert_eq!(connects, 1);
        assert_eq!(session.state(), SessionState::Disconnected);
    }
}
