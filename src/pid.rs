use embedded_can::Id;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Mask selecting the parameter identifier from the low bits of either a
/// standard or an extended CAN identifier.
pub const PID_MASK: u32 = 0x7FF;

/// The closed set of parameters this crate knows how to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Pid {
    EngineCoolant = 0x05,
    EngineSpeed = 0x0C,
    VehicleSpeed = 0x0D,
}

impl Pid {
    pub const ALL: [Pid; 3] = [Pid::VehicleSpeed, Pid::EngineSpeed, Pid::EngineCoolant];

    /// Looks up the parameter for an already masked identifier.
    pub fn from_masked(pid: u16) -> Option<Self> {
        Self::try_from(pid).ok()
    }

    /// Physical unit of the decoded value
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::EngineCoolant => "°C",
            Self::EngineSpeed => "RPM",
            Self::VehicleSpeed => "km/h",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::EngineCoolant => "Coolant Temperature",
            Self::EngineSpeed => "Engine Speed",
            Self::VehicleSpeed => "Vehicle Speed",
        }
    }
}

/// Raw value of an identifier regardless of its kind.
pub fn raw_id(id: Id) -> u32 {
    match id {
        Id::Standard(standard_id) => standard_id.as_raw() as u32,
        Id::Extended(extended_id) => extended_id.as_raw(),
    }
}

/// Extracts the 11-bit parameter identifier. Both identifier kinds carry it in
/// their low 11 bits.
pub fn masked_pid(id: Id) -> u16 {
    (raw_id(id) & PID_MASK) as u16
}
