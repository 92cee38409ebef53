use core::fmt;

use embedded_can::{ExtendedId, Id, StandardId};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{pid::masked_pid, MAX_PAYLOAD_LENGTH};

/// A classic CAN frame as handed over by the receive layer.
///
/// Both identifiers are carried side by side the way bxCAN style peripherals
/// report them; [`IdKind`] selects which one is active. The DLC is always in
/// the range 0..=8 and unused data slots are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObdFrame {
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))]
    std_id: StandardId,
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))]
    ext_id: ExtendedId,
    id_kind: IdKind,
    dlc: usize,
    data: [u8; MAX_PAYLOAD_LENGTH],
}

impl Default for ObdFrame {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl ObdFrame {
    /// A standard frame with id 0 and no data
    pub const fn zeroed() -> Self {
        Self {
            std_id: StandardId::ZERO,
            ext_id: ExtendedId::ZERO,
            id_kind: IdKind::Standard,
            dlc: 0,
            data: [0; MAX_PAYLOAD_LENGTH],
        }
    }

    /// Creates a new data frame. `data` must have a length in the range 0..=8
    /// or else `None` will be returned instead. The inactive identifier is
    /// left at zero.
    pub fn new_data(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > MAX_PAYLOAD_LENGTH {
            return None;
        }

        let mut frame = Self::zeroed().with_id(id);
        frame.data[..data.len()].copy_from_slice(data);
        frame.dlc = data.len();

        Some(frame)
    }

    /// Sets the identifier of the given kind and makes it the active one
    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        match id.into() {
            Id::Standard(std_id) => {
                self.std_id = std_id;
                self.id_kind = IdKind::Standard;
            }
            Id::Extended(ext_id) => {
                self.ext_id = ext_id;
                self.id_kind = IdKind::Extended;
            }
        }

        self
    }

    /// Creates a data frame using all eight data bytes
    pub fn full(id: impl Into<Id>, data: [u8; MAX_PAYLOAD_LENGTH]) -> Self {
        let mut frame = Self::zeroed().with_id(id);
        frame.data = data;
        frame.dlc = MAX_PAYLOAD_LENGTH;
        frame
    }

    /// Builds a frame from raw receive registers, validating every field at
    /// the boundary.
    pub fn from_raw_parts(
        std_id: u16,
        ext_id: u32,
        ide: u8,
        dlc: u8,
        data: [u8; MAX_PAYLOAD_LENGTH],
    ) -> Result<Self, FrameError> {
        let std_id = StandardId::new(std_id).ok_or(FrameError::StandardIdOutOfRange(std_id))?;
        let ext_id = ExtendedId::new(ext_id).ok_or(FrameError::ExtendedIdOutOfRange(ext_id))?;
        let id_kind = IdKind::try_from(ide)?;

        if dlc as usize > MAX_PAYLOAD_LENGTH {
            return Err(FrameError::InvalidDataLengthCode(dlc));
        }

        Ok(Self {
            std_id,
            ext_id,
            id_kind,
            dlc: dlc as usize,
            data,
        })
    }

    /// Replaces the standard identifier without changing which one is active
    pub fn with_standard_id(mut self, std_id: StandardId) -> Self {
        self.std_id = std_id;
        self
    }

    /// Replaces the extended identifier without changing which one is active
    pub fn with_extended_id(mut self, ext_id: ExtendedId) -> Self {
        self.ext_id = ext_id;
        self
    }

    pub fn with_id_kind(mut self, id_kind: IdKind) -> Self {
        self.id_kind = id_kind;
        self
    }

    pub fn standard_id(&self) -> StandardId {
        self.std_id
    }

    pub fn extended_id(&self) -> ExtendedId {
        self.ext_id
    }

    pub fn id_kind(&self) -> IdKind {
        self.id_kind
    }

    /// The identifier selected by [`IdKind`]
    pub fn active_id(&self) -> Id {
        match self.id_kind {
            IdKind::Standard => Id::Standard(self.std_id),
            IdKind::Extended => Id::Extended(self.ext_id),
        }
    }

    /// The 11-bit parameter identifier carried by the active identifier
    pub fn pid(&self) -> u16 {
        masked_pid(self.active_id())
    }

    /// Gets the DLC (Data Length Code) of the frame
    pub fn dlc(&self) -> usize {
        self.dlc
    }

    /// Meaningful payload bytes (length matches the DLC)
    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlc]
    }

    /// All eight data slots, including the unused zeroed tail
    pub fn raw_data(&self) -> &[u8; MAX_PAYLOAD_LENGTH] {
        &self.data
    }
}

/// Remote frames are not produced nor consumed by the monitor, so
/// [`embedded_can::Frame::new_remote`] always returns `None`.
impl embedded_can::Frame for ObdFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        Self::new_data(id, data)
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        self.id_kind == IdKind::Extended
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        self.active_id()
    }

    fn dlc(&self) -> usize {
        self.dlc
    }

    fn data(&self) -> &[u8] {
        &self.data[..self.dlc]
    }
}

/// Multi-line dump of every frame field, data slots included.
impl fmt::Display for ObdFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CAN message parameters:")?;
        writeln!(f, "->Standard ID: {}", self.std_id.as_raw())?;
        writeln!(f, "->Extended ID: {}", self.ext_id.as_raw())?;
        writeln!(f, "->IDE: {}", u8::from(self.id_kind))?;
        writeln!(f, "->DLC: {}", self.dlc)?;
        write!(f, "->Data:")?;

        for byte in self.data.iter() {
            write!(f, " 0x{:02X}", byte)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    #[error("Tried to decode ID kind but it was invalid ({0:?})")]
    InvalidIdKind(u8),
    #[error("Received a CAN Standard ID ({0:?}) that was out of the valid range (0..=0x7FF)")]
    StandardIdOutOfRange(u16),
    #[error("Received a CAN Extended ID ({0:?}) that was out of the valid range (0..=0x1FFFFFFF)")]
    ExtendedIdOutOfRange(u32),
    #[error("Received a CAN DLC ({0:?}) that was out of the valid range (0..=8)")]
    InvalidDataLengthCode(u8),
}

/// Identifier extension bit as reported by the receive layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[num_enum(error_type(name = FrameError, constructor = FrameError::InvalidIdKind))]
#[repr(u8)]
pub enum IdKind {
    #[default]
    Standard = 0,
    Extended = 1,
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use embedded_can::{ExtendedId, Frame, Id, StandardId};

    use crate::{FrameError, IdKind, ObdFrame};

    #[test]
    fn raw_parts_validation() {
        assert_eq!(
            ObdFrame::from_raw_parts(0x800, 0, 0, 0, [0; 8]),
            Err(FrameError::StandardIdOutOfRange(0x800))
        );

        assert_eq!(
            ObdFrame::from_raw_parts(0, 0x2000_0000, 0, 0, [0; 8]),
            Err(FrameError::ExtendedIdOutOfRange(0x2000_0000))
        );

        assert_eq!(
            ObdFrame::from_raw_parts(0, 0, 2, 0, [0; 8]),
            Err(FrameError::InvalidIdKind(2))
        );

        assert_eq!(
            ObdFrame::from_raw_parts(0, 0, 0, 9, [0; 8]),
            Err(FrameError::InvalidDataLengthCode(9))
        );
    }

    #[test]
    fn active_identifier_follows_ide() {
        let frame = ObdFrame::from_raw_parts(0x05, 0x0D, 0, 2, [0x03, 0xFF, 0, 0, 0, 0, 0, 0])
            .unwrap();

        assert_eq!(frame.id_kind(), IdKind::Standard);
        assert_eq!(frame.active_id(), Id::Standard(StandardId::new(0x05).unwrap()));
        assert_eq!(frame.pid(), 0x05);
        assert_eq!(frame.data(), &[0x03, 0xFF]);
        assert!(!frame.is_extended());

        let frame = frame.with_id_kind(IdKind::Extended);

        assert_eq!(frame.active_id(), Id::Extended(ExtendedId::new(0x0D).unwrap()));
        assert_eq!(frame.pid(), 0x0D);
        assert!(frame.is_extended());
    }

    #[test]
    fn new_data_limits() {
        assert!(ObdFrame::new_data(StandardId::ZERO, &[0; 9]).is_none());

        let frame = ObdFrame::new_data(ExtendedId::MAX, &[1, 2, 3]).unwrap();
        assert_eq!(frame.dlc(), 3);
        assert_eq!(frame.raw_data(), &[1, 2, 3, 0, 0, 0, 0, 0]);
        assert_eq!(frame.standard_id(), StandardId::ZERO);
        assert_eq!(frame.id_kind(), IdKind::Extended);

        let frame = ObdFrame::new_data(StandardId::MAX, &[]).unwrap();
        assert_eq!(frame.data(), &[] as &[u8]);

        let frame = frame
            .with_extended_id(ExtendedId::new(0x0D).unwrap())
            .with_standard_id(StandardId::new(0x05).unwrap());
        assert_eq!(frame.id_kind(), IdKind::Standard);
        assert_eq!(frame.extended_id().as_raw(), 0x0D);
        assert_eq!(frame.pid(), 0x05);
    }

    #[test]
    fn embedded_can_frame() {
        let frame = <ObdFrame as Frame>::new(StandardId::new(0x0C).unwrap(), &[0x1A, 0xF8]).unwrap();

        assert_eq!(Frame::dlc(&frame), 2);
        assert_eq!(Frame::data(&frame), &[0x1A, 0xF8]);
        assert!(!frame.is_remote_frame());
        assert!(ObdFrame::new_remote(StandardId::ZERO, 0).is_none());
    }

    #[test]
    fn dump() {
        let frame = ObdFrame::from_raw_parts(0x05, 0x0D, 0, 2, [0x03, 0xFF, 0, 0, 0, 0, 0, 0])
            .unwrap();

        assert_eq!(
            frame.to_string(),
            "CAN message parameters:\n\
             ->Standard ID: 5\n\
             ->Extended ID: 13\n\
             ->IDE: 0\n\
             ->DLC: 2\n\
             ->Data: 0x03 0xFF 0x00 0x00 0x00 0x00 0x00 0x00"
        );
    }

    #[test]
    fn zeroed_frame() {
        let frame = ObdFrame::default();

        assert_eq!(frame, ObdFrame::zeroed());
        assert_eq!(frame.pid(), 0);
        assert_eq!(frame.dlc(), 0);
    }
}
