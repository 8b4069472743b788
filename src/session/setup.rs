use crate::app_config::Sensors;
use crate::domain::device::{Sensor, SensorDevice, SensorSetting};
use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct SensorPlan {
    pub sensor: Sensor,
    pub setting: Option<SensorSetting>,
}

/// Every sensor the bridge reads, with the setting it is configured with before being enabled.
pub fn sensor_plan(config: &Sensors) -> Vec<SensorPlan> {
    let interval = Some(SensorSetting::Interval(config.interval()));

    vec![
        SensorPlan {
            sensor: Sensor::Temperature,
            setting: interval,
        },
        SensorPlan {
            sensor: Sensor::Pressure,
            setting: interval,
        },
        SensorPlan {
            sensor: Sensor::Humidity,
            setting: interval,
        },
        SensorPlan {
            sensor: Sensor::Color,
            setting: interval,
        },
        SensorPlan {
            sensor: Sensor::Gas,
            setting: Some(SensorSetting::GasMode(config.gas_mode())),
        },
        SensorPlan {
            sensor: Sensor::Button,
            setting: None,
        },
        SensorPlan {
            sensor: Sensor::Battery,
            setting: None,
        },
    ]
}

/// Device calls the session has issued and not yet seen complete. Each one resolves to the number of
/// failed calls it made.
pub type PendingCalls = FuturesUnordered<BoxFuture<'static, usize>>;

/// Issues the configure-then-enable calls of every planned sensor without waiting for them. Sensors
/// run concurrently once the returned set is polled; per sensor the setting is sent before the enable.
#[instrument(skip_all, fields(device = device.address()))]
pub fn configure_sensors(device: &Arc<dyn SensorDevice>, plan: &[SensorPlan]) -> PendingCalls {
    debug!("Configuring {} sensor(s)...", plan.len());

    plan.iter().map(|step| set_up_sensor(device.clone(), *step).boxed()).collect()
}

async fn set_up_sensor(device: Arc<dyn SensorDevice>, step: SensorPlan) -> usize {
    let mut failures = 0;

    if let Some(setting) = step.setting {
        if let Err(e) = device.configure(step.sensor, setting).await {
            warn!(sensor = %step.sensor, "⚠️ Failed to configure {} sensor: {}", step.sensor, e);
            failures += 1;
        }
    }

    match device.enable(step.sensor).await {
        Ok(()) => info!(sensor = %step.sensor, "✅ Enabled {} sensor", step.sensor),
        Err(e) => {
            warn!(sensor = %step.sensor, "⚠️ Failed to enable {} sensor: {}", step.sensor, e);
            failures += 1;
        }
    }

    failures
}
