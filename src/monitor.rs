use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};
use embedded_can::Frame;

use crate::{
    dispatch, ConfigError, MonitorConfig, ObdFrame, PeriodicPoller, PollOutcome, Report,
    Reports, StopPolicy, VehicleState,
};

/// Outbound half of the bus. Transmission is fire-and-forget.
pub trait PacketSender {
    fn send_packet(&mut self, frame: &ObdFrame);
}

impl<F: FnMut(&ObdFrame)> PacketSender for F {
    fn send_packet(&mut self, frame: &ObdFrame) {
        self(frame)
    }
}

/// Coordinator owning the vehicle state, the poller and the outbound sender.
///
/// [`Monitor::packet_received`] is the receive callback and [`Monitor::tick`]
/// the fixed-rate task. Both need `&mut self`; use [`SharedMonitor`] when they
/// run from different execution contexts.
#[derive(Debug)]
pub struct Monitor<S> {
    config: MonitorConfig,
    state: VehicleState,
    poller: PeriodicPoller,
    sender: S,
}

impl<S: PacketSender> Monitor<S> {
    pub fn new(config: MonitorConfig, sender: S) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            poller: PeriodicPoller::new(&config),
            config,
            state: VehicleState::new(),
            sender,
        })
    }

    /// Decodes one received frame, updates the vehicle state and logs every
    /// resulting report.
    pub fn packet_received<F: Frame>(&mut self, frame: &F) -> Reports {
        let reports = dispatch(frame, &mut self.state, &self.config);

        for report in reports.iter() {
            report.log();
        }

        reports
    }

    /// Advances the poller by one tick, sending a query when it is due.
    pub fn tick(&mut self) -> PollOutcome {
        let stop = self.state.stop_condition(self.config.stop_policy);

        match self.poller.tick(stop) {
            PollOutcome::Query(frame) => {
                log::debug!("Sending query for PID {:#04X}", frame.pid());
                self.sender.send_packet(&frame);

                PollOutcome::Query(frame)
            }
            // One-shot stops were already reported when the reading came in
            PollOutcome::Suspended(_) if self.config.stop_policy == StopPolicy::Latched => {
                let diagnostic = self.stop_diagnostic();
                diagnostic.log();

                PollOutcome::Suspended(Some(diagnostic))
            }
            outcome => outcome,
        }
    }

    /// Scheduler hook for a 100 ms task
    pub fn task_100ms(&mut self) -> PollOutcome {
        self.tick()
    }

    pub fn stop_diagnostic(&self) -> Report {
        Report::CoolantLimitExceeded {
            limit: self.config.coolant_limit,
        }
    }

    pub fn is_querying_stopped(&self) -> bool {
        self.state.stop_condition(self.config.stop_policy)
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn poller(&self) -> &PeriodicPoller {
        &self.poller
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }
}

/// A [`Monitor`] behind a single blocking mutex so the receive callback and
/// the tick task can be invoked from different contexts (e.g. an interrupt
/// handler and a thread) without tearing the latched flags.
pub struct SharedMonitor<M: RawMutex, S> {
    inner: Mutex<M, RefCell<Monitor<S>>>,
}

impl<M: RawMutex, S: PacketSender> SharedMonitor<M, S> {
    pub fn new(monitor: Monitor<S>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(monitor)),
        }
    }

    pub fn packet_received<F: Frame>(&self, frame: &F) -> Reports {
        self.lock(|monitor| monitor.packet_received(frame))
    }

    pub fn tick(&self) -> PollOutcome {
        self.lock(Monitor::tick)
    }

    pub fn state(&self) -> VehicleState {
        self.lock(|monitor| *monitor.state())
    }

    /// Runs `f` with exclusive access to the monitor
    pub fn lock<R>(&self, f: impl FnOnce(&mut Monitor<S>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn into_inner(self) -> Monitor<S> {
        self.inner.into_inner().into_inner()
    }
}
