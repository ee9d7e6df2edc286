#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use lamp_control::battery::BatteryVoltage;
    use lamp_control::bsp::pin::Pin;
    use lamp_control::config::FlashLightConfig;
    use lamp_control::control::{Action, LampControl, BUTTON_CHECK_PERIOD};
    use lamp_control::edt::EDT;
    use lamp_control::flashlight::{FlashLight, Shutdown};
    use lamp_control::lamp::Lamp;
    use lamp_control::notification::LogIndicator;
    use lamp_control::state::{LightState, PlugState};
    use lamp_control::table_lamp::TableLamp;

    #[test]
    fn edt_queue_is_small_while_running() {
        with_bench(BatteryVoltage::MaxVoltage, &|bench| {
            bench.advance_time(1000);
            // button check and battery drain
            assert_eq!(bench.edt.queue_len(), 2);
        });
    }

    #[test]
    fn table_click_while_plugged_out_does_nothing() {
        with_bench(BatteryVoltage::MaxVoltage, &|bench| {
            bench.buttons.click(bench.buttons.table_pin);
            assert_eq!(bench.table_lamp.light_state(), LightState::Off);
        });
    }

    #[test]
    fn plug_click_then_table_click_turns_the_lamp_on() {
        with_bench(BatteryVoltage::MaxVoltage, &|bench| {
            bench.buttons.click(bench.buttons.plug_pin);
            assert_eq!(bench.table_lamp.plug_state(), PlugState::PluggedIn);

            bench.buttons.click(bench.buttons.table_pin);
            assert_eq!(bench.table_lamp.light_state(), LightState::On);

            bench.buttons.click(bench.buttons.table_pin);
            assert_eq!(bench.table_lamp.light_state(), LightState::Off);

            bench.buttons.click(bench.buttons.plug_pin);
            assert_eq!(bench.table_lamp.plug_state(), PlugState::PluggedOut);
        });
    }

    #[test]
    fn flash_click_toggles_the_flashlight() {
        with_bench(BatteryVoltage::MaxVoltage, &|bench| {
            bench.buttons.click(bench.buttons.flash_pin);
            assert_eq!(bench.flashlight.light_state(), LightState::On);
            assert_eq!(bench.table_lamp.light_state(), LightState::Off);
        });
    }

    #[test]
    fn long_press_is_not_a_click() {
        with_bench(BatteryVoltage::MaxVoltage, &|bench| {
            bench.buttons.long_press(bench.buttons.flash_pin);
            assert_eq!(bench.flashlight.light_state(), LightState::Off);
        });
    }

    /// Held below the long click threshold, but longer than usual clicks
    #[test]
    fn longer_clicks_have_effect_when_released() {
        with_bench(BatteryVoltage::MaxVoltage, &|bench| {
            bench.buttons.flash_pin.set(true);
            bench.advance_time(700);
            assert_eq!(bench.flashlight.light_state(), LightState::Off);
            bench.buttons.flash_pin.set(false);
            bench.advance_time(BUTTON_CHECK_PERIOD);
            assert_eq!(bench.flashlight.light_state(), LightState::On);
        });
    }

    #[test]
    fn lit_flashlight_drains_while_buttons_are_polled() {
        with_bench(BatteryVoltage::MaxVoltage, &|bench| {
            bench.buttons.click(bench.buttons.flash_pin);
            let lux = bench.flashlight.lux();
            bench.advance_time(1000);
            assert_eq!(bench.flashlight.lux(), lux - 20.0);
        });
    }

    #[test]
    fn empty_battery_stops_the_owner() {
        with_bench(BatteryVoltage::EmptyBattery, &|bench| {
            bench.advance_time(1000);
            assert_eq!(*bench.shutdowns.borrow(), vec![Shutdown::BatteryDepleted]);
            // only the button check is left
            assert_eq!(bench.edt.queue_len(), 1);
        });
    }

    struct Bench<'a> {
        edt: &'a EDT<Action>,
        table_lamp: &'a TableLamp<'a>,
        flashlight: &'a FlashLight<'a>,
        buttons: Buttons<'a>,
        shutdowns: &'a RefCell<Vec<Shutdown>>,
    }

    impl<'a> Bench<'a> {
        fn advance_time(&self, time: u32) {
            (self.buttons.advance_time)(time);
        }
    }

    fn with_bench(voltage: BatteryVoltage, block: &dyn Fn(&Bench)) {
        let table_pin = Cell::new(false);
        let plug_pin = Cell::new(false);
        let flash_pin = Cell::new(false);
        let indicator = LogIndicator;
        let edt = EDT::create();
        let table_lamp = TableLamp::new(&indicator);
        let flashlight = FlashLight::new(voltage, FlashLightConfig::default(), &edt, &indicator);
        let control = LampControl::new(
            TestPin { is_down: &table_pin },
            TestPin { is_down: &plug_pin },
            TestPin { is_down: &flash_pin },
            &table_lamp,
            &flashlight,
            &edt,
        );
        control.start();

        let shutdowns = RefCell::new(vec![]);
        let advance_time = |time: u32| {
            edt.advance_time_by(time, &|msg| {
                if let Some(shutdown) = control.process_message(msg) {
                    shutdowns.borrow_mut().push(shutdown);
                }
            });
        };

        block(&Bench {
            edt: &edt,
            table_lamp: &table_lamp,
            flashlight: &flashlight,
            buttons: Buttons {
                table_pin: &table_pin,
                plug_pin: &plug_pin,
                flash_pin: &flash_pin,
                advance_time: &advance_time,
            },
            shutdowns: &shutdowns,
        });
    }

    struct TestPin<'a> {
        is_down: &'a Cell<bool>,
    }

    impl<'a> Pin for TestPin<'a> {
        /// returns true is pin is tied to the ground
        fn is_down(&self) -> bool {
            self.is_down.get()
        }
    }

    struct Buttons<'a> {
        table_pin: &'a Cell<bool>,
        plug_pin: &'a Cell<bool>,
        flash_pin: &'a Cell<bool>,
        advance_time: &'a dyn Fn(u32),
    }

    impl<'a> Buttons<'a> {
        fn click(&self, pin: &Cell<bool>) {
            (self.advance_time)(BUTTON_CHECK_PERIOD);
            pin.set(true);
            (self.advance_time)(BUTTON_CHECK_PERIOD);
            pin.set(false);
            (self.advance_time)(BUTTON_CHECK_PERIOD);
        }

        fn long_press(&self, pin: &Cell<bool>) {
            (self.advance_time)(BUTTON_CHECK_PERIOD);
            pin.set(true);
            (self.advance_time)(1500);
            pin.set(false);
            (self.advance_time)(BUTTON_CHECK_PERIOD);
        }
    }
}
