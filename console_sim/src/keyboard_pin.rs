use std::cell::RefCell;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use lamp_control::bsp::pin::Pin;

/// Key presses read from the terminal, waiting to be picked up by a [KeyboardPin]
#[derive(Default)]
pub struct Keyboard {
    pressed: RefCell<Vec<KeyCode>>,
}

impl Keyboard {
    /// Collects all key presses the terminal has buffered, without blocking
    pub fn pump(&self) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                let mut pressed = self.pressed.borrow_mut();
                if key.kind != KeyEventKind::Release && !pressed.contains(&key.code) {
                    pressed.push(key.code);
                }
            }
        }
        Ok(())
    }

    fn take(&self, key_code: KeyCode) -> bool {
        let mut pressed = self.pressed.borrow_mut();
        match pressed.iter().position(|it| *it == key_code) {
            Some(position) => {
                pressed.remove(position);
                true
            }
            None => false,
        }
    }
}

/// A terminal has no key-up events: every press (or auto-repeat) of the key reads as the
/// pin being down for one sample.
pub struct KeyboardPin<'a> {
    keyboard: &'a Keyboard,
    key_code: KeyCode,
}

impl<'a> KeyboardPin<'a> {
    /// Factory function to create a [KeyboardPin]
    pub fn create(keyboard: &'a Keyboard, key_code: KeyCode) -> KeyboardPin<'a> {
        KeyboardPin { keyboard, key_code }
    }
}

impl Pin for KeyboardPin<'_> {
    /// returns true if the key was pressed since the last check
    fn is_down(&self) -> bool {
        self.keyboard.take(self.key_code)
    }
}
