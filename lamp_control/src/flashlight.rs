use std::cell::Cell;

use thiserror::Error;
use tracing::{info, trace, warn};

use crate::battery::{self, BatteryVoltage};
use crate::bsp::indicator::Indicator;
use crate::config::FlashLightConfig;
use crate::control::Action;
use crate::edt::EDT;
use crate::lamp::Lamp;
use crate::notification::Notification;
use crate::state::LightState;

pub const FLASHLIGHT: &str = "flashlight";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainError {
    #[error("division by zero at second {second}")]
    DivisionByZero { second: u32 },
}

/// Why the flashlight asks its owner to stop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shutdown {
    BatteryDepleted,
    Fault(DrainError),
}

/// Battery powered lamp. Its illumination drains on every [Action::DrainBattery] tick,
/// faster while the light is on.
///
/// The drain task starts with the flashlight and stops by itself once the battery is
/// empty (or the drain fails), after which [FlashLight::shutdown] reports the reason.
pub struct FlashLight<'a> {
    light: Cell<LightState>,
    lux: Cell<f64>,
    shutdown: Cell<Option<Shutdown>>,
    config: FlashLightConfig,
    edt: &'a EDT<Action>,
    indicator: &'a dyn Indicator,
}

impl<'a> FlashLight<'a> {
    pub fn new(
        voltage: BatteryVoltage,
        config: FlashLightConfig,
        edt: &'a EDT<Action>,
        indicator: &'a dyn Indicator,
    ) -> Self {
        let flashlight = FlashLight {
            light: Cell::new(LightState::default()),
            lux: Cell::new(voltage.lux()),
            shutdown: Cell::new(None),
            config,
            edt,
            indicator,
        };
        info!(%voltage, lux = voltage.lux(), "flashlight battery inserted");
        edt.schedule(config.drain_period_ms, Action::DrainBattery);
        flashlight
    }

    pub fn lux(&self) -> f64 {
        self.lux.get()
    }

    pub fn voltage(&self) -> BatteryVoltage {
        BatteryVoltage::for_lux(self.lux.get())
    }

    /// Remaining charge in percent
    pub fn capacity(&self) -> u32 {
        battery::capacity(self.lux.get())
    }

    pub fn shutdown(&self) -> Option<Shutdown> {
        self.shutdown.get()
    }

    pub fn is_draining(&self) -> bool {
        self.shutdown.get().is_none()
    }

    pub fn process_message(&self, action: Action) -> Option<Shutdown> {
        match action {
            Action::DrainBattery => self.drain(),
            _ => None,
        }
    }

    fn drain(&self) -> Option<Shutdown> {
        if self.shutdown.get().is_some() {
            return None;
        }

        if let Err(e) = self.check_fault() {
            return Some(self.stop(Shutdown::Fault(e)));
        }

        let lux = self.lux.get();
        if lux <= self.config.epsilon {
            return Some(self.stop(Shutdown::BatteryDepleted));
        }

        let step = if self.light.get().is_on() {
            self.config.lux_step_on
        } else {
            self.config.lux_step_idle
        };
        let next = (lux - step).max(0.0);
        self.lux.set(next);
        trace!(lux = next, "battery drained");

        if next <= self.config.epsilon {
            return Some(self.stop(Shutdown::BatteryDepleted));
        }

        let voltage = BatteryVoltage::for_lux(next);
        if voltage != BatteryVoltage::for_lux(lux) {
            self.indicator.notify(Notification::BatteryLevel(voltage));
        }

        self.edt
            .schedule(self.config.drain_period_ms, Action::DrainBattery);
        None
    }

    /// Cancels the drain task and remembers why
    fn stop(&self, reason: Shutdown) -> Shutdown {
        self.edt.remove(|action| *action == Action::DrainBattery);
        match reason {
            Shutdown::BatteryDepleted => self.lux.set(0.0),
            Shutdown::Fault(e) => warn!(error = %e, lux = self.lux.get(), "drain task cancelled"),
        }
        self.shutdown.set(Some(reason));
        self.indicator.notify(Notification::Shutdown(reason));
        reason
    }

    /// Injected fault: divides by the simulated second modulo [FlashLightConfig::fault_every_secs]
    fn check_fault(&self) -> Result<(), DrainError> {
        let every = match self.config.fault_every_secs {
            Some(every) if every > 0 => every,
            _ => return Ok(()),
        };
        let second = self.edt.now() / 1000;
        if second == 0 {
            return Ok(());
        }
        1000u32
            .checked_div(second % every)
            .map(|_| ())
            .ok_or(DrainError::DivisionByZero { second })
    }
}

impl Lamp for FlashLight<'_> {
    fn toggle(&self) {
        let light = self.light.get().toggled();
        self.light.set(light);
        self.indicator.notify(Notification::Toggled {
            lamp: FLASHLIGHT,
            light,
        });
    }

    fn light_state(&self) -> LightState {
        self.light.get()
    }

    fn name(&self) -> &'static str {
        FLASHLIGHT
    }
}
