use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::HistoryRecord;
use super::category::{ECS_MSG_HEADER, ECS_MSG_MODEL};

/// Top-level discriminator carried in [`MsgRecord::flag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MsgFlag {
    FlagA = 0x01,
    FlagB = 0x02,
    FlagC = 0x03,
}

impl MsgFlag {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::FlagA),
            0x02 => Some(Self::FlagB),
            0x03 => Some(Self::FlagC),
            _ => None,
        }
    }
}

/// Discriminator for each byte of [`SubPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SubFlag {
    SubFlagX = 0x0A,
    SubFlagY = 0x0B,
    SubFlagZ = 0x0C,
}

impl SubFlag {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x0A => Some(Self::SubFlagX),
            0x0B => Some(Self::SubFlagY),
            0x0C => Some(Self::SubFlagZ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHeader {
    pub receive_time: u32,
}

impl MessageHeader {
    pub fn new(receive_time: u32) -> Self {
        Self { receive_time }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubPayload {
    pub sts: u8,
    pub sas: u8,
    pub scs: u8,
}

impl SubPayload {
    pub fn new(sts: u8, sas: u8, scs: u8) -> Self {
        Self { sts, sas, scs }
    }

    /// Interpreted sub flags in wire order (STS, SAS, SCS).
    pub fn flags(&self) -> [Option<SubFlag>; 3] {
        [SubFlag::from_u8(self.sts), SubFlag::from_u8(self.sas), SubFlag::from_u8(self.scs)]
    }
}

/// Composite telemetry message: header, flag byte and a three-byte sub payload.
///
/// Raw bytes are kept as-is; values outside the known enumerations survive a
/// decode/encode cycle untouched and are only reported as `None` by the
/// interpreting accessors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MsgRecord {
    pub header: MessageHeader,
    pub flag: u8,
    pub sub_payload: SubPayload,
}

impl MsgRecord {
    pub fn new(receive_time: u32, flag: u8, sub_payload: SubPayload) -> Self {
        Self { header: MessageHeader::new(receive_time), flag, sub_payload }
    }

    pub fn flag_kind(&self) -> Option<MsgFlag> {
        MsgFlag::from_u8(self.flag)
    }

    /// Receive time rendered in the local time zone.
    pub fn received_at(&self) -> Option<DateTime<Local>> {
        local_time(self.header.receive_time)
    }
}

impl HistoryRecord for MsgRecord {
    const CATEGORY: &'static str = ECS_MSG_MODEL;

    fn receive_time(&self) -> u32 {
        self.header.receive_time
    }
}

impl HistoryRecord for MessageHeader {
    const CATEGORY: &'static str = ECS_MSG_HEADER;

    fn receive_time(&self) -> u32 {
        self.receive_time
    }
}

/// Converts epoch seconds to a local date-time.
pub fn local_time(secs: u32) -> Option<DateTime<Local>> {
    Local.timestamp_opt(i64::from(secs), 0).single()
}
