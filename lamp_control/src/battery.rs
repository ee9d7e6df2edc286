use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Charge bands of the flashlight battery, from full to empty.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum BatteryVoltage {
    MaxVoltage,
    MidVoltage,
    MinVoltage,
    LowVoltage,
    EmptyBattery,
}

pub const MAX_VOLTAGE_LUX: f64 = 100.0;
pub const MID_VOLTAGE_LUX: f64 = 75.0;
pub const MIN_VOLTAGE_LUX: f64 = 50.0;
pub const LOW_VOLTAGE_LUX: f64 = 25.0;
pub const EMPTY_BATTERY_LUX: f64 = 0.0;

impl BatteryVoltage {
    pub const ALL: [BatteryVoltage; 5] = [
        BatteryVoltage::MaxVoltage,
        BatteryVoltage::MidVoltage,
        BatteryVoltage::MinVoltage,
        BatteryVoltage::LowVoltage,
        BatteryVoltage::EmptyBattery,
    ];

    /// Illumination a fresh flashlight gives at this voltage
    pub fn lux(self) -> f64 {
        match self {
            BatteryVoltage::MaxVoltage => MAX_VOLTAGE_LUX,
            BatteryVoltage::MidVoltage => MID_VOLTAGE_LUX,
            BatteryVoltage::MinVoltage => MIN_VOLTAGE_LUX,
            BatteryVoltage::LowVoltage => LOW_VOLTAGE_LUX,
            BatteryVoltage::EmptyBattery => EMPTY_BATTERY_LUX,
        }
    }

    /// Band a (partially drained) lux value belongs to. A band covers everything above
    /// the lux of the band below it, up to its own lux.
    pub fn for_lux(lux: f64) -> BatteryVoltage {
        if lux > MID_VOLTAGE_LUX {
            BatteryVoltage::MaxVoltage
        } else if lux > MIN_VOLTAGE_LUX {
            BatteryVoltage::MidVoltage
        } else if lux > LOW_VOLTAGE_LUX {
            BatteryVoltage::MinVoltage
        } else if lux > EMPTY_BATTERY_LUX {
            BatteryVoltage::LowVoltage
        } else {
            BatteryVoltage::EmptyBattery
        }
    }
}

impl fmt::Display for BatteryVoltage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatteryVoltage::MaxVoltage => "MaxVoltage",
            BatteryVoltage::MidVoltage => "MidVoltage",
            BatteryVoltage::MinVoltage => "MinVoltage",
            BatteryVoltage::LowVoltage => "LowVoltage",
            BatteryVoltage::EmptyBattery => "EmptyBattery",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown battery voltage `{0}`, expected one of: max, mid, min, low, empty")]
pub struct ParseVoltageError(pub String);

impl FromStr for BatteryVoltage {
    type Err = ParseVoltageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "maxvoltage" => Ok(BatteryVoltage::MaxVoltage),
            "mid" | "midvoltage" => Ok(BatteryVoltage::MidVoltage),
            "min" | "minvoltage" => Ok(BatteryVoltage::MinVoltage),
            "low" | "lowvoltage" => Ok(BatteryVoltage::LowVoltage),
            "empty" | "emptybattery" => Ok(BatteryVoltage::EmptyBattery),
            _ => Err(ParseVoltageError(s.to_string())),
        }
    }
}

/// Remaining charge in percent, relative to a full battery
pub fn capacity(lux: f64) -> u32 {
    if lux >= MAX_VOLTAGE_LUX {
        100
    } else if lux <= EMPTY_BATTERY_LUX {
        0
    } else {
        (lux * 100.0 / MAX_VOLTAGE_LUX).round() as u32
    }
}

#[cfg(test)]
mod test {
    use crate::battery::{capacity, BatteryVoltage};

    #[test]
    fn voltages_are_ordered_from_full_to_empty() {
        let mut sorted = BatteryVoltage::ALL;
        sorted.sort();
        assert_eq!(sorted, BatteryVoltage::ALL);

        let lux: Vec<f64> = BatteryVoltage::ALL.iter().map(|it| it.lux()).collect();
        assert_eq!(lux, [100.0, 75.0, 50.0, 25.0, 0.0]);
    }

    #[test]
    fn lux_is_classified_into_bands() {
        let lux = [120.0, 100.0, 75.5, 75.0, 60.0, 50.0, 49.5, 25.0, 0.5, 0.0, -1.0];
        let expected = [
            BatteryVoltage::MaxVoltage,
            BatteryVoltage::MaxVoltage,
            BatteryVoltage::MaxVoltage,
            BatteryVoltage::MidVoltage,
            BatteryVoltage::MidVoltage,
            BatteryVoltage::MinVoltage,
            BatteryVoltage::MinVoltage,
            BatteryVoltage::LowVoltage,
            BatteryVoltage::LowVoltage,
            BatteryVoltage::EmptyBattery,
            BatteryVoltage::EmptyBattery,
        ];
        let res: Vec<BatteryVoltage> = lux.iter().map(|it| BatteryVoltage::for_lux(*it)).collect();
        assert_eq!(res, expected);
    }

    #[test]
    fn every_voltage_maps_back_to_itself() {
        for voltage in BatteryVoltage::ALL.iter() {
            assert_eq!(BatteryVoltage::for_lux(voltage.lux()), *voltage);
        }
    }

    #[test]
    fn percentages() {
        let lux = [150.0, 100.0, 99.6, 75.0, 50.0, 12.2, 0.4, 0.0, -3.0];
        let expected = [100, 100, 100, 75, 50, 12, 0, 0, 0];
        let res: Vec<u32> = lux.iter().map(|it| capacity(*it)).collect();
        assert_eq!(res, expected);
    }

    #[test]
    fn voltages_are_parsed_by_short_and_full_name() {
        assert_eq!("max".parse::<BatteryVoltage>(), Ok(BatteryVoltage::MaxVoltage));
        assert_eq!("MidVoltage".parse::<BatteryVoltage>(), Ok(BatteryVoltage::MidVoltage));
        assert_eq!(" LOW ".parse::<BatteryVoltage>(), Ok(BatteryVoltage::LowVoltage));
        assert_eq!("EmptyBattery".parse::<BatteryVoltage>(), Ok(BatteryVoltage::EmptyBattery));
        assert!("half".parse::<BatteryVoltage>().is_err());
    }
}
