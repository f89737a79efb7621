#[derive(displaydoc::Display, Debug, Copy, Clone, Eq, PartialEq)]
pub enum InvalidValue {
    /// power `{0}` is outside -100..=100
    Power(i8),
    /// turn ratio `{0}` is outside -100..=100
    TurnRatio(i8),
    /// got an invalid mode flags byte: `{0}`
    ModeFlags(u8),
    /// got an invalid output port: `{0}`
    Port(u8),
    /// got an invalid regulation mode: `{0}`
    RegulationMode(u8),
    /// got an invalid run state: `{0}`
    RunState(u8),
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidValue {}
