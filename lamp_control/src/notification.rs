use tracing::{error, info};

use crate::battery::BatteryVoltage;
use crate::bsp::indicator::Indicator;
use crate::flashlight::Shutdown;
use crate::state::{LightState, PlugState};

/// State change reported by a lamp
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notification {
    Toggled {
        lamp: &'static str,
        light: LightState,
    },
    PlugChanged(PlugState),
    BatteryLevel(BatteryVoltage),
    Shutdown(Shutdown),
}

/// [Indicator] which writes every notification to the log
#[derive(Default)]
pub struct LogIndicator;

impl Indicator for LogIndicator {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Toggled { lamp, light } => {
                info!(lamp, %light, "The lamp is toggled. The light is {}", light)
            }
            Notification::PlugChanged(plug) => info!(%plug, "The lamp is {}", plug),
            Notification::BatteryLevel(voltage) => info!(%voltage, "battery level changed"),
            Notification::Shutdown(Shutdown::BatteryDepleted) => {
                info!("battery is empty, shutting down")
            }
            Notification::Shutdown(Shutdown::Fault(e)) => {
                error!(error = %e, "battery drain failed, shutting down")
            }
        }
    }
}
