use std::io::{self, Stdout};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::KeyCode;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tui::backend::CrosstermBackend;
use tui::layout::{Alignment, Constraint, Direction, Layout};
use tui::style::{Color, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, BorderType, Borders, Paragraph};
use tui::Terminal;

use lamp_control::bsp::pin::Pin;
use lamp_control::config::SimConfig;
use lamp_control::control::LampControl;
use lamp_control::edt::{Event, EDT};
use lamp_control::flashlight::{FlashLight, Shutdown};
use lamp_control::lamp::Lamp;
use lamp_control::notification::LogIndicator;
use lamp_control::state::PlugState;
use lamp_control::table_lamp::TableLamp;

use crate::keyboard_pin::{Keyboard, KeyboardPin};

mod keyboard_pin;

/// Beam width at full charge
const BEAM_WIDTH: f64 = 60.0;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = SimConfig::from_env().context("invalid simulator configuration")?;
    init_tracing(&config)?;

    // raw mode hides panics, restore the terminal first
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        default_hook(panic);
    }));

    let keyboard = Keyboard::default();
    let esc_pin = KeyboardPin::create(&keyboard, KeyCode::Esc);
    let indicator = LogIndicator;
    let edt = EDT::create();

    let table_lamp = TableLamp::new(&indicator);
    let flashlight = FlashLight::new(config.voltage, config.flashlight, &edt, &indicator);
    let control = LampControl::new(
        KeyboardPin::create(&keyboard, KeyCode::Char('t')),
        KeyboardPin::create(&keyboard, KeyCode::Char('p')),
        KeyboardPin::create(&keyboard, KeyCode::Char('f')),
        &table_lamp,
        &flashlight,
        &edt,
    );
    control.start();

    enable_raw_mode().context("can run in raw mode")?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut shutdown = None;
    loop {
        keyboard.pump()?;
        if esc_pin.is_down() {
            info!("exit requested");
            edt.exit();
        }

        match edt.poll() {
            Event::Execute { msg } => {
                if let Some(reason) = control.process_message(msg) {
                    shutdown = Some(reason);
                    edt.exit();
                }
            }
            Event::Wait { ms } => tokio::time::sleep(Duration::from_millis(ms as u64)).await,
            Event::Halt => break,
        }

        draw_tui(&mut terminal, &table_lamp, &flashlight)?;
    }

    disable_raw_mode().context("can go back to normal")?;
    terminal.clear()?;

    Ok(match shutdown {
        None => ExitCode::SUCCESS,
        Some(Shutdown::BatteryDepleted) => {
            println!("The flashlight battery is empty.");
            ExitCode::SUCCESS
        }
        Some(Shutdown::Fault(e)) => {
            eprintln!("The flashlight failed: {}", e);
            ExitCode::FAILURE
        }
    })
}

/// Raw mode owns the terminal, so logs go to a file and only when RUST_LOG asks for them
fn init_tracing(config: &SimConfig) -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_ok() {
        let file = std::fs::File::create(&config.log_file)
            .with_context(|| format!("cannot create log file {}", config.log_file.display()))?;
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    }
    Ok(())
}

fn draw_tui(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    table_lamp: &TableLamp,
    flashlight: &FlashLight,
) -> io::Result<()> {
    terminal.draw(|rect| {
        let size = rect.size();
        let vertical_layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints(
                [
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Min(2),
                ]
                .as_ref(),
            )
            .split(size);

        let beam = if flashlight.light_state().is_on() {
            (flashlight.lux() * BEAM_WIDTH / 100.0).ceil() as usize
        } else {
            0
        };
        let beam_paragraph = Paragraph::new(Spans::from(Span::styled(
            " ".repeat(beam),
            Style::default().bg(Color::Rgb(253, 244, 220)),
        )))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .title(" flashlight ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );

        let table_style = if table_lamp.light_state().is_on() {
            Style::default().bg(Color::Rgb(230, 180, 80))
        } else {
            Style::default().bg(Color::Black)
        };
        let plug = match table_lamp.plug_state() {
            PlugState::PluggedIn => "plugged in",
            PlugState::PluggedOut => "plugged out",
        };
        let table_paragraph = Paragraph::new(Spans::from(vec![
            Span::styled("   LAMP   ", table_style),
            Span::raw(format!("  {}", plug)),
        ]))
        .block(
            Block::default()
                .title(" table lamp ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );

        let sim_paragraph = Paragraph::new(vec![
            Spans::from(Span::raw(format!(
                "flashlight: {}  lux: {:5.1}  battery: {:3}% ({})",
                flashlight.light_state(),
                flashlight.lux(),
                flashlight.capacity(),
                flashlight.voltage()
            ))),
            Spans::from(Span::raw(format!(
                "table lamp: {}  {}",
                table_lamp.light_state(),
                table_lamp.plug_state()
            ))),
            Spans::from(Span::raw(
                "[t] toggle table lamp  [p] plug in/out  [f] toggle flashlight  [esc] exit",
            )),
        ])
        .alignment(Alignment::Left);

        rect.render_widget(beam_paragraph, vertical_layout[0]);
        rect.render_widget(table_paragraph, vertical_layout[1]);
        rect.render_widget(sim_paragraph, vertical_layout[2]);
    })?;
    Ok(())
}
