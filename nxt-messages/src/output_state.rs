use crate::{InvalidValue, OutputPort};
use bitflags::bitflags;
use core::ops::RangeInclusive;

/// Accepted domain for `power` and `turn_ratio`, in percent.
const PERCENT_RANGE: RangeInclusive<i8> = -100..=100;

bitflags! {
    /// Mode bits of the output-state payload. The device accepts any
    /// combination of the three flags.
    pub struct ModeFlags: u8 {
        /// Turn the motor on.
        const MOTORON = 0x01;
        /// Brake between PWM pulses instead of coasting.
        const BRAKE = 0x02;
        /// Enable the regulation selected by `RegulationMode`.
        const REGULATED = 0x04;
    }
}

impl ModeFlags {
    pub fn parse(byte: u8) -> Result<Self, InvalidValue> {
        Self::from_bits(byte).ok_or(InvalidValue::ModeFlags(byte))
    }

    pub fn to_byte(self) -> u8 {
        self.bits()
    }
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ModeFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ModeFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Self::from_bits(bits).ok_or_else(|| serde::de::Error::custom(InvalidValue::ModeFlags(bits)))
    }
}

/// How the firmware regulates the motor while it runs.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RegulationMode {
    #[default]
    Idle = 0x00,
    /// Adjust the duty cycle to hold the requested power against load.
    MotorSpeed = 0x01,
    /// Keep this motor synchronised with the other regulated one.
    MotorSync = 0x02,
}

impl RegulationMode {
    pub fn parse(byte: u8) -> Result<Self, InvalidValue> {
        match byte {
            0x00 => Ok(Self::Idle),
            0x01 => Ok(Self::MotorSpeed),
            0x02 => Ok(Self::MotorSync),
            _ => Err(InvalidValue::RegulationMode(byte)),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// The motor's run state. Ramp states interpolate the power level towards
/// the target over the tacho limit.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RunState {
    #[default]
    Idle = 0x00,
    RampUp = 0x10,
    Running = 0x20,
    RampDown = 0x40,
}

impl RunState {
    pub fn parse(byte: u8) -> Result<Self, InvalidValue> {
        match byte {
            0x00 => Ok(Self::Idle),
            0x10 => Ok(Self::RampUp),
            0x20 => Ok(Self::Running),
            0x40 => Ok(Self::RampDown),
            _ => Err(InvalidValue::RunState(byte)),
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Construction parameters for [`OutputState`]. Unspecified fields keep the
/// device defaults (zero, or no port).
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputStateConfig {
    pub port: Option<OutputPort>,
    pub power: i8,
    pub mode_flags: ModeFlags,
    pub regulation_mode: RegulationMode,
    pub turn_ratio: i8,
    pub run_state: RunState,
    pub tacho_limit: u32,
}

/// The settable parameters of one motor output, as carried by a
/// set-output-state telegram.
///
/// Fields are only reachable through validating setters, so a constructed
/// value never holds anything outside its field's domain. A rejected
/// assignment leaves the previous value in place.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OutputState {
    port: Option<OutputPort>,
    power: i8,
    mode_flags: ModeFlags,
    regulation_mode: RegulationMode,
    turn_ratio: i8,
    run_state: RunState,
    tacho_limit: u32,
}

impl OutputState {
    /// Tacho limit meaning "run without a count limit".
    pub const RUN_FOREVER: u32 = 0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from `config`, validating the range-checked fields.
    /// Any out-of-domain value fails the whole construction.
    pub fn from_config(config: OutputStateConfig) -> Result<Self, InvalidValue> {
        let mut state = Self {
            port: config.port,
            power: 0,
            mode_flags: config.mode_flags,
            regulation_mode: config.regulation_mode,
            turn_ratio: 0,
            run_state: config.run_state,
            tacho_limit: config.tacho_limit,
        };
        state.set_power(config.power)?;
        state.set_turn_ratio(config.turn_ratio)?;
        Ok(state)
    }

    /// The target port, or `None` if none has been chosen yet.
    pub fn port(&self) -> Option<OutputPort> {
        self.port
    }

    pub fn power(&self) -> i8 {
        self.power
    }

    pub fn mode_flags(&self) -> ModeFlags {
        self.mode_flags
    }

    pub fn regulation_mode(&self) -> RegulationMode {
        self.regulation_mode
    }

    pub fn turn_ratio(&self) -> i8 {
        self.turn_ratio
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn tacho_limit(&self) -> u32 {
        self.tacho_limit
    }

    pub fn set_port(&mut self, port: OutputPort) {
        self.port = Some(port);
    }

    pub fn set_power(&mut self, power: i8) -> Result<(), InvalidValue> {
        if !PERCENT_RANGE.contains(&power) {
            return Err(InvalidValue::Power(power));
        }
        self.power = power;
        Ok(())
    }

    pub fn set_mode_flags(&mut self, mode_flags: ModeFlags) {
        self.mode_flags = mode_flags;
    }

    pub fn set_regulation_mode(&mut self, regulation_mode: RegulationMode) {
        self.regulation_mode = regulation_mode;
    }

    pub fn set_turn_ratio(&mut self, turn_ratio: i8) -> Result<(), InvalidValue> {
        if !PERCENT_RANGE.contains(&turn_ratio) {
            return Err(InvalidValue::TurnRatio(turn_ratio));
        }
        self.turn_ratio = turn_ratio;
        Ok(())
    }

    pub fn set_run_state(&mut self, run_state: RunState) {
        self.run_state = run_state;
    }

    pub fn set_tacho_limit(&mut self, tacho_limit: u32) {
        self.tacho_limit = tacho_limit;
    }

    pub fn for_port(&mut self, port: OutputPort) -> &mut Self {
        self.set_port(port);
        self
    }

    pub fn with_power(&mut self, power: i8) -> Result<&mut Self, InvalidValue> {
        self.set_power(power)?;
        Ok(self)
    }

    pub fn with_mode_flags(&mut self, mode_flags: ModeFlags) -> &mut Self {
        self.set_mode_flags(mode_flags);
        self
    }

    pub fn with_regulation_mode(&mut self, regulation_mode: RegulationMode) -> &mut Self {
        self.set_regulation_mode(regulation_mode);
        self
    }

    pub fn with_turn_ratio(&mut self, turn_ratio: i8) -> Result<&mut Self, InvalidValue> {
        self.set_turn_ratio(turn_ratio)?;
        Ok(self)
    }

    pub fn with_run_state(&mut self, run_state: RunState) -> &mut Self {
        self.set_run_state(run_state);
        self
    }

    pub fn with_tacho_limit(&mut self, tacho_limit: u32) -> &mut Self {
        self.set_tacho_limit(tacho_limit);
        self
    }
}
