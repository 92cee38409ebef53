use embedded_can::StandardId;

use crate::{MonitorConfig, ObdFrame, Pid, QueryMode, Report};

/// Functional request identifier shared by every OBD-II ECU
pub const FUNCTIONAL_REQUEST_ID: StandardId = match StandardId::new(0x7DF) {
    Some(id) => id,
    None => panic!("0x7DF is a valid standard id"),
};

/// OBD-II service 01: show current data
const SERVICE_CURRENT_DATA: u8 = 0x01;

/// Filler for unused request bytes
const PADDING: u8 = 0x55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollerState {
    #[default]
    Counting,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// Below the interval, the counter advanced
    Idle,
    /// Interval reached without a stop condition; send this frame
    Query(ObdFrame),
    /// Interval reached while the stop condition holds, with the diagnostic
    /// emitted for this tick (if any)
    Suspended(Option<Report>),
}

/// Fixed-interval query scheduler driven by an external tick.
///
/// The counter advances on every tick until it reaches the interval. The tick
/// that finds it there checks the stop condition: when clear the counter
/// resets and a query is produced, otherwise the poller suspends and leaves
/// the counter where it is so every following tick re-checks the condition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodicPoller {
    interval: u16,
    counter: u16,
    state: PollerState,
    query_mode: QueryMode,
    next_query: usize,
}

impl PeriodicPoller {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            interval: config.poll_interval_ticks,
            counter: 0,
            state: PollerState::Counting,
            query_mode: config.query_mode,
            next_query: 0,
        }
    }

    pub fn tick(&mut self, stop: bool) -> PollOutcome {
        if self.counter < self.interval {
            self.counter += 1;
            return PollOutcome::Idle;
        }

        if stop {
            self.state = PollerState::Suspended;
            return PollOutcome::Suspended(None);
        }

        self.state = PollerState::Counting;
        self.counter = 0;

        PollOutcome::Query(self.build_query())
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn counter(&self) -> u16 {
        self.counter
    }

    fn build_query(&mut self) -> ObdFrame {
        match self.query_mode {
            QueryMode::Blank => ObdFrame::zeroed(),
            QueryMode::ServiceOne => {
                let pid = Pid::ALL[self.next_query];
                self.next_query = (self.next_query + 1) % Pid::ALL.len();

                service_one_request(pid)
            }
        }
    }
}

/// Single-frame OBD-II request for the current value of `pid`
pub fn service_one_request(pid: Pid) -> ObdFrame {
    let data = [
        0x02,
        SERVICE_CURRENT_DATA,
        u16::from(pid) as u8,
        PADDING,
        PADDING,
        PADDING,
        PADDING,
        PADDING,
    ];

    ObdFrame::full(FUNCTIONAL_REQUEST_ID, data)
}
