use std::fmt;

use super::mode::Mode;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Input switch
    SetInput(bool),
    // Measurements
    MeasureCurrent,
    MeasureVoltage,
    MeasurePower,
    // Operating mode
    GetFunction,
    SetFunction(Mode),
    // Mode setpoint and its limits
    GetSetting(Mode),
    SetSetting(Mode, f64),
    GetSettingLower(Mode),
    GetSettingUpper(Mode),
}

impl Command {
    /// Instruction path without the leading colon.
    pub fn path(&self) -> String {
        match self {
            Command::SetInput(_) => String::from("INPut"),
            Command::MeasureCurrent => String::from("MEASure:CURRent?"),
            Command::MeasureVoltage => String::from("MEASure:VOLTage?"),
            Command::MeasurePower => String::from("MEASure:POWer?"),
            Command::GetFunction => String::from("FUNCtion?"),
            Command::SetFunction(_) => String::from("FUNCtion"),
            Command::GetSetting(mode) => format!("{}?", mode.keyword()),
            Command::SetSetting(mode, _) => mode.keyword().to_string(),
            Command::GetSettingLower(mode) => format!("{}:LOWer?", mode.keyword()),
            Command::GetSettingUpper(mode) => format!("{}:UPPer?", mode.keyword()),
        }
    }

    /// Argument of a setter. Setpoints use the shortest `f64` representation
    /// followed by the unit, so `12.0` volt goes out as `12V`.
    pub fn argument(&self) -> Option<String> {
        match self {
            Command::SetInput(true) => Some(String::from("ON")),
            Command::SetInput(false) => Some(String::from("OFF")),
            Command::SetFunction(mode) => Some(mode.keyword().to_string()),
            Command::SetSetting(mode, value) => Some(format!("{}{}", value, mode.unit())),
            _ => None,
        }
    }

    pub fn is_query(&self) -> bool {
        self.path().ends_with('?')
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.path())?;
        if let Some(argument) = self.argument() {
            write!(f, " {}", argument)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_paths() {
        assert_eq!(Command::GetSetting(Mode::ConstantPower).path(), "POW?");
        assert_eq!(
            Command::GetSettingLower(Mode::ConstantVoltage).path(),
            "VOLT:LOWer?"
        );
        assert_eq!(
            Command::GetSettingUpper(Mode::ConstantResistance).path(),
            "RES:UPPer?"
        );
    }

    #[test]
    fn test_set_setting_argument() {
        let cmd = Command::SetSetting(Mode::ConstantResistance, 202.1);
        assert_eq!(cmd.path(), "RES");
        assert_eq!(cmd.argument().as_deref(), Some("202.1OHM"));
        assert!(!cmd.is_query());
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::SetInput(false).to_string(), ":INPut OFF");
        assert_eq!(Command::MeasurePower.to_string(), ":MEASure:POWer?");
        assert!(Command::MeasurePower.is_query());
    }
}
