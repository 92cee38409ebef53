use core::iter;

use embedded_can::Frame;

use crate::{
    decode::{decode_be, DecodeError},
    pid::{masked_pid, raw_id},
    MonitorConfig, Pid, Report, Reports, StopPolicy, VehicleState,
};

/// Decodes a received frame and applies its effect on `state`.
///
/// The parameter is selected by the low 11 bits of the frame's active
/// identifier. Decoded values are narrowed to the parameter's width by
/// keeping their low-order bits. Unknown parameters and oversized payloads
/// leave `state` untouched.
pub fn dispatch<F: Frame>(frame: &F, state: &mut VehicleState, config: &MonitorConfig) -> Reports {
    let id = frame.id();

    let Some(pid) = Pid::from_masked(masked_pid(id)) else {
        return single(Report::UnknownIdentifier(raw_id(id)));
    };

    let value = match decode_be(frame.data()) {
        Ok(value) => value,
        Err(DecodeError::PayloadTooLong(len)) => return single(Report::MalformedPayload(len)),
    };

    let (reading, diagnostic) = match pid {
        Pid::VehicleSpeed => (Report::VehicleSpeed(value as u8), None),
        Pid::EngineSpeed => {
            let rpm = value as u32;
            state.engine_running = rpm > 0;

            (Report::EngineSpeed(rpm), None)
        }
        Pid::EngineCoolant => {
            let temperature = value as u16;
            let exceeded = temperature >= config.coolant_limit;

            let diagnostic = match config.stop_policy {
                StopPolicy::Latched => {
                    state.coolant_over_threshold = exceeded;
                    None
                }
                StopPolicy::OneShot if exceeded => {
                    state.stop_query = true;
                    Some(Report::CoolantLimitExceeded {
                        limit: config.coolant_limit,
                    })
                }
                StopPolicy::OneShot => None,
            };

            (Report::CoolantTemperature(temperature), diagnostic)
        }
    };

    iter::once(reading).chain(diagnostic).collect()
}

fn single(report: Report) -> Reports {
    iter::once(report).collect()
}
