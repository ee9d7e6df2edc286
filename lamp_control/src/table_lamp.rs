use std::cell::Cell;

use tracing::debug;

use crate::bsp::indicator::Indicator;
use crate::lamp::Lamp;
use crate::notification::Notification;
use crate::state::{LightState, PlugState};

pub const TABLE_LAMP: &str = "table lamp";

/// Lamp on a wire. It only lights up while plugged in.
pub struct TableLamp<'a> {
    light: Cell<LightState>,
    plug: Cell<PlugState>,
    indicator: &'a dyn Indicator,
}

impl<'a> TableLamp<'a> {
    pub fn new(indicator: &'a dyn Indicator) -> Self {
        TableLamp {
            light: Cell::new(LightState::default()),
            plug: Cell::new(PlugState::default()),
            indicator,
        }
    }

    pub fn plug_state(&self) -> PlugState {
        self.plug.get()
    }

    /// Plugs the lamp in or out. Returns false if it already was in the requested state.
    pub fn set_plug_connection(&self, plug: PlugState) -> bool {
        if self.plug.get() == plug {
            debug!(%plug, "plug state unchanged");
            return false;
        }
        self.plug.set(plug);
        self.indicator.notify(Notification::PlugChanged(plug));
        true
    }
}

impl Lamp for TableLamp<'_> {
    fn toggle(&self) {
        if self.plug.get() != PlugState::PluggedIn {
            debug!(light = %self.light.get(), "toggled while plugged out, ignoring");
            return;
        }
        let light = self.light.get().toggled();
        self.light.set(light);
        self.indicator.notify(Notification::Toggled {
            lamp: TABLE_LAMP,
            light,
        });
    }

    fn light_state(&self) -> LightState {
        self.light.get()
    }

    fn name(&self) -> &'static str {
        TABLE_LAMP
    }
}
