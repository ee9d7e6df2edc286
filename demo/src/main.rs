use std::cell::Cell;
use std::process::ExitCode;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lamp_control::config::SimConfig;
use lamp_control::control::Action;
use lamp_control::edt::EDT;
use lamp_control::flashlight::{FlashLight, Shutdown};
use lamp_control::lamp::Lamp;
use lamp_control::notification::LogIndicator;
use lamp_control::state::PlugState;
use lamp_control::table_lamp::TableLamp;

/// Simulated time handed to the flashlight between two status lines
const REPORT_PERIOD: u32 = 5000;

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = SimConfig::from_env().context("invalid simulator configuration")?;
    let indicator = LogIndicator;

    play_with_table_lamp(&indicator);

    let shutdown = drain_flashlight(&config, &indicator);
    Ok(match shutdown {
        Shutdown::BatteryDepleted => ExitCode::SUCCESS,
        Shutdown::Fault(_) => ExitCode::FAILURE,
    })
}

fn play_with_table_lamp(indicator: &LogIndicator) {
    let lamp = TableLamp::new(indicator);
    info!(light = %lamp.light_state(), plug = %lamp.plug_state(), "new table lamp");

    lamp.toggle();
    info!(light = %lamp.light_state(), "toggled without connecting the plug");

    lamp.set_plug_connection(PlugState::PluggedOut);
    info!(light = %lamp.light_state(), "plugged out");

    lamp.set_plug_connection(PlugState::PluggedIn);
    info!(light = %lamp.light_state(), "plugged in");

    for _ in 0..10 {
        lamp.toggle();
    }
    info!(light = %lamp.light_state(), "played with the lamp");
}

/// Runs the flashlight on a simulated clock, switching it on for the first half of its charge
fn drain_flashlight(config: &SimConfig, indicator: &LogIndicator) -> Shutdown {
    let edt = EDT::<Action>::create();
    let flashlight = FlashLight::new(config.voltage, config.flashlight, &edt, indicator);
    flashlight.toggle();

    let shutdown = Cell::new(None);
    while shutdown.get().is_none() && edt.queue_len() > 0 {
        edt.advance_time_by(REPORT_PERIOD, &|msg| {
            if let Some(reason) = flashlight.process_message(msg) {
                shutdown.set(Some(reason));
            }
        });
        info!(
            seconds = edt.now() / 1000,
            lux = flashlight.lux(),
            capacity = flashlight.capacity(),
            voltage = %flashlight.voltage(),
            "flashlight status"
        );
        if flashlight.light_state().is_on() && flashlight.capacity() < 50 {
            flashlight.toggle();
        }
    }

    shutdown.into_inner().unwrap_or_else(|| {
        warn!("drain task ended without a reason");
        Shutdown::BatteryDepleted
    })
}
