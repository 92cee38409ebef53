use core::fmt;

use heapless::Vec;

use crate::Pid;

/// Maximum number of reports a single received frame can produce (a reading
/// plus a threshold diagnostic)
pub const MAX_REPORTS_PER_FRAME: usize = 2;

pub type Reports = Vec<Report, MAX_REPORTS_PER_FRAME>;

/// Observable output of the monitor. Every decoded frame and every stop
/// diagnostic produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// Decoded vehicle speed in km/h
    VehicleSpeed(u8),
    /// Decoded engine speed in RPM
    EngineSpeed(u32),
    /// Decoded coolant temperature in °C (raw, no OBD-II offset)
    CoolantTemperature(u16),
    /// Coolant reached the configured limit and querying stops
    CoolantLimitExceeded { limit: u16 },
    /// The masked identifier is not a known parameter. Carries the unmasked
    /// active identifier.
    UnknownIdentifier(u32),
    /// A foreign frame implementation handed over more payload than a
    /// classic CAN frame can hold
    MalformedPayload(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    Reading,
    Warning,
    Error,
}

impl Report {
    pub fn pid(&self) -> Option<Pid> {
        match self {
            Self::VehicleSpeed(_) => Some(Pid::VehicleSpeed),
            Self::EngineSpeed(_) => Some(Pid::EngineSpeed),
            Self::CoolantTemperature(_) => Some(Pid::EngineCoolant),
            Self::CoolantLimitExceeded { .. } => Some(Pid::EngineCoolant),
            Self::UnknownIdentifier(_) | Self::MalformedPayload(_) => None,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::VehicleSpeed(_) | Self::EngineSpeed(_) | Self::CoolantTemperature(_) => {
                Severity::Reading
            }
            Self::UnknownIdentifier(_) | Self::MalformedPayload(_) => Severity::Warning,
            Self::CoolantLimitExceeded { .. } => Severity::Error,
        }
    }

    /// Emits the report through the `log` facade at a level matching its
    /// severity.
    pub fn log(&self) {
        match self.severity() {
            Severity::Reading => log::info!("{}", self),
            Severity::Warning => log::warn!("{}", self),
            Severity::Error => log::error!("{}", self),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VehicleSpeed(value) => reading(f, Pid::VehicleSpeed, *value as u32),
            Self::EngineSpeed(value) => reading(f, Pid::EngineSpeed, *value),
            Self::CoolantTemperature(value) => reading(f, Pid::EngineCoolant, *value as u32),
            Self::CoolantLimitExceeded { limit } => write!(
                f,
                "Error: Coolant temperature exceeds {}°C. Stopping queries.",
                limit
            ),
            Self::UnknownIdentifier(id) => write!(f, "Unknown packet ID: {}", id),
            Self::MalformedPayload(len) => {
                write!(f, "Malformed payload: {} bytes exceed a classic CAN frame", len)
            }
        }
    }
}

fn reading(f: &mut fmt::Formatter<'_>, pid: Pid, value: u32) -> fmt::Result {
    write!(f, "{}: {} [{}]", pid.label(), value, pid.unit())
}
