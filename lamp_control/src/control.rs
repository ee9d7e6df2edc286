use std::cell::Cell;

use tracing::debug;

use crate::bsp::pin::Pin;
use crate::edt::EDT;
use crate::flashlight::{FlashLight, Shutdown};
use crate::lamp::Lamp;
use crate::table_lamp::TableLamp;

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub enum Action {
    CheckButtons,
    DrainBattery,
}

pub const BUTTON_CHECK_PERIOD: u32 = 50;
pub const LONG_CLICK_THRESHOLD: u32 = 1000;

/// Button which remembers how long has it been held down
struct StatefulButton<P: Pin> {
    pin: P,
    hold_time: Cell<u32>,
}

impl<P: Pin> StatefulButton<P> {
    fn new(pin: P) -> Self {
        StatefulButton {
            pin,
            hold_time: Cell::new(0),
        }
    }

    /// True when the button was released after a hold shorter than [LONG_CLICK_THRESHOLD]
    fn clicked(&self, elapsed_time: u32) -> bool {
        let held = self.hold_time.get();
        let pin_down = self.pin.is_down();

        self.hold_time
            .set(if pin_down { held + elapsed_time } else { 0 });

        !pin_down && held > 1 && held < LONG_CLICK_THRESHOLD
    }
}

/// Control logic polls the buttons and forwards clicks to the lamps
pub struct LampControl<'a, T: Pin, P: Pin, F: Pin> {
    table_pin: StatefulButton<T>,
    plug_pin: StatefulButton<P>,
    flash_pin: StatefulButton<F>,
    table_lamp: &'a TableLamp<'a>,
    flashlight: &'a FlashLight<'a>,
    edt: &'a EDT<Action>,
}

impl<'a, T: Pin, P: Pin, F: Pin> LampControl<'a, T, P, F> {
    pub fn new(
        table_pin: T,
        plug_pin: P,
        flash_pin: F,
        table_lamp: &'a TableLamp<'a>,
        flashlight: &'a FlashLight<'a>,
        edt: &'a EDT<Action>,
    ) -> Self {
        LampControl {
            table_pin: StatefulButton::new(table_pin),
            plug_pin: StatefulButton::new(plug_pin),
            flash_pin: StatefulButton::new(flash_pin),
            table_lamp,
            flashlight,
            edt,
        }
    }

    pub fn start(&self) {
        self.check_buttons();
    }

    /// Handles a message from the [EDT]. `Some` means the owner should stop.
    pub fn process_message(&self, action: Action) -> Option<Shutdown> {
        match action {
            Action::CheckButtons => {
                self.check_buttons();
                None
            }
            Action::DrainBattery => self.flashlight.process_message(action),
        }
    }

    fn check_buttons(&self) {
        if self.table_pin.clicked(BUTTON_CHECK_PERIOD) {
            Self::toggle(self.table_lamp);
        }

        if self.plug_pin.clicked(BUTTON_CHECK_PERIOD) {
            let plug = self.table_lamp.plug_state().flipped();
            self.table_lamp.set_plug_connection(plug);
        }

        if self.flash_pin.clicked(BUTTON_CHECK_PERIOD) {
            Self::toggle(self.flashlight);
        }

        self.edt.schedule(BUTTON_CHECK_PERIOD, Action::CheckButtons);
    }

    fn toggle(lamp: &dyn Lamp) {
        let before = lamp.light_state();
        lamp.toggle();
        if lamp.light_state() == before {
            debug!(lamp = lamp.name(), light = %before, "toggle had no effect");
        }
    }
}
