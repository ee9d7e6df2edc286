use std::fmt;

/// Whether the lamp shines.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum LightState {
    On,
    #[default]
    Off,
}

impl LightState {
    pub fn toggled(self) -> LightState {
        match self {
            LightState::On => LightState::Off,
            LightState::Off => LightState::On,
        }
    }

    pub fn is_on(self) -> bool {
        self == LightState::On
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightState::On => f.write_str("On"),
            LightState::Off => f.write_str("Off"),
        }
    }
}

/// Whether the lamp's wire is connected to the electrical network.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum PlugState {
    PluggedIn,
    #[default]
    PluggedOut,
}

impl PlugState {
    pub fn flipped(self) -> PlugState {
        match self {
            PlugState::PluggedIn => PlugState::PluggedOut,
            PlugState::PluggedOut => PlugState::PluggedIn,
        }
    }
}

impl fmt::Display for PlugState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlugState::PluggedIn => f.write_str("PluggedIn"),
            PlugState::PluggedOut => f.write_str("PluggedOut"),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::state::{LightState, PlugState};

    #[test]
    fn defaults_are_off_and_plugged_out() {
        assert_eq!(LightState::default(), LightState::Off);
        assert_eq!(PlugState::default(), PlugState::PluggedOut);
    }

    #[test]
    fn toggling_twice_restores_the_light() {
        let light = LightState::Off;
        assert_eq!(light.toggled(), LightState::On);
        assert_eq!(light.toggled().toggled(), light);
        assert!(light.toggled().is_on());
    }

    #[test]
    fn display_matches_variant_names() {
        assert_eq!(LightState::On.to_string(), "On");
        assert_eq!(PlugState::PluggedIn.to_string(), "PluggedIn");
        assert_eq!(PlugState::PluggedIn.flipped().to_string(), "PluggedOut");
    }
}
