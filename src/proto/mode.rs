use std::{fmt, str::FromStr};

use super::ProtoError;

/// Regulation target of the electronic load.
///
/// Each mode carries the keyword used on the wire (`:FUNCtion VOLT`,
/// `:VOLT?`, ...) and the unit suffix of its setpoint values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    ConstantVoltage,
    ConstantCurrent,
    ConstantResistance,
    ConstantPower,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::ConstantVoltage,
        Mode::ConstantCurrent,
        Mode::ConstantResistance,
        Mode::ConstantPower,
    ];

    pub const fn keyword(self) -> &'static str {
        match self {
            Mode::ConstantVoltage => "VOLT",
            Mode::ConstantCurrent => "CURR",
            Mode::ConstantResistance => "RES",
            Mode::ConstantPower => "POW",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Mode::ConstantVoltage => "V",
            Mode::ConstantCurrent => "A",
            Mode::ConstantResistance => "OHM",
            Mode::ConstantPower => "W",
        }
    }

    /// Map a wire keyword back to its mode. Matching is exact.
    pub fn from_keyword(keyword: &str) -> Result<Self, ProtoError> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.keyword() == keyword)
            .ok_or_else(|| ProtoError::UnknownMode(keyword.to_string()))
    }
}

impl FromStr for Mode {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::ConstantVoltage => f.write_str("CV"),
            Mode::ConstantCurrent => f.write_str("CC"),
            Mode::ConstantResistance => f.write_str("CR"),
            Mode::ConstantPower => f.write_str("CP"),
        }
    }
}
