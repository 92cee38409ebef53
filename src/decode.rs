use crate::MAX_PAYLOAD_LENGTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    #[error("Tried to decode a payload of ({0:?}) bytes but at most 8 fit in a classic CAN frame")]
    PayloadTooLong(usize),
}

/// Interprets `bytes` as a big-endian unsigned integer (`bytes[0]` is the most
/// significant byte). An empty payload decodes to 0.
///
/// No sign extension or physical offset is applied. Payloads longer than
/// [`MAX_PAYLOAD_LENGTH`] are rejected rather than truncated.
pub fn decode_be(bytes: &[u8]) -> Result<u64, DecodeError> {
    if bytes.len() > MAX_PAYLOAD_LENGTH {
        return Err(DecodeError::PayloadTooLong(bytes.len()));
    }

    Ok(bytes
        .iter()
        .fold(0u64, |value, byte| (value << 8) | *byte as u64))
}
