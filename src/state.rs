use crate::StopPolicy;

/// Latched flags written by the dispatcher and read by the poller guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VehicleState {
    /// Last engine speed reading was above zero
    pub engine_running: bool,
    /// Last coolant reading was at or above the limit ([`StopPolicy::Latched`])
    pub coolant_over_threshold: bool,
    /// A coolant reading reached the limit at some point ([`StopPolicy::OneShot`])
    pub stop_query: bool,
}

impl VehicleState {
    pub const fn new() -> Self {
        Self {
            engine_running: false,
            coolant_over_threshold: false,
            stop_query: false,
        }
    }

    /// Whether the poller must stop issuing queries
    pub fn stop_condition(&self, policy: StopPolicy) -> bool {
        match policy {
            StopPolicy::Latched => self.engine_running && self.coolant_over_threshold,
            StopPolicy::OneShot => self.stop_query,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
