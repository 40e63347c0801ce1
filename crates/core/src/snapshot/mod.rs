//! Mission Snapshot
//!
//! Small checkpoint of mission progress written to the host's persistent
//! storage between sessions. It is advisory: on restart the dock fact read
//! from the connector decides what happens, and the snapshot only restores
//! counters and tells the program what was interrupted.
//!
//! # Binary Format
//!
//! ```text
//! +--------+---------+-------+------+-------+--------+-------+
//! | magic  | version | phase | dest | ticks | cycles | crc32 |
//! | u32    | u16     | u8    | u8   | u32   | u32    | u32   |
//! +--------+---------+-------+------+-------+--------+-------+
//! ```
//!
//! All fields are little-endian. `dest` is 0 for none, 1 for home, 2 for the
//! mine. The CRC covers every byte before it.

mod crc;

use core::fmt;

use crate::waypoint::Site;

/// "TDRN"
pub const SNAPSHOT_MAGIC: u32 = 0x5444_524E;

pub const SNAPSHOT_VERSION: u16 = 1;

/// Encoded size in bytes
pub const SNAPSHOT_SIZE: usize = 20;

const BODY_SIZE: usize = SNAPSHOT_SIZE - 4;

/// What the executor was doing when the snapshot was taken
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    #[default]
    Idle = 0,
    Flying = 1,
    Docking = 2,
    Sitting = 3,
    Broken = 4,
}

impl Phase {
    /// `true` for phases that cannot be picked up again after a restart
    pub fn is_in_flight(self) -> bool {
        matches!(self, Phase::Flying | Phase::Docking)
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Flying => "flying",
            Phase::Docking => "docking",
            Phase::Sitting => "sitting",
            Phase::Broken => "broken",
        }
    }
}

impl TryFrom<u8> for Phase {
    type Error = SnapshotError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Phase::Idle),
            1 => Ok(Phase::Flying),
            2 => Ok(Phase::Docking),
            3 => Ok(Phase::Sitting),
            4 => Ok(Phase::Broken),
            _ => Err(SnapshotError::InvalidField("phase")),
        }
    }
}

/// Snapshot decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    /// Fewer bytes than [`SNAPSHOT_SIZE`]
    Truncated { len: usize },
    BadMagic,
    UnsupportedVersion(u16),
    Checksum,
    /// Field holds a value outside its range
    InvalidField(&'static str),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Truncated { len } => {
                write!(f, "snapshot truncated ({} of {} bytes)", len, SNAPSHOT_SIZE)
            }
            SnapshotError::BadMagic => f.write_str("not a snapshot (bad magic)"),
            SnapshotError::UnsupportedVersion(v) => {
                write!(f, "unsupported snapshot version {}", v)
            }
            SnapshotError::Checksum => f.write_str("snapshot checksum mismatch"),
            SnapshotError::InvalidField(name) => write!(f, "invalid snapshot field: {}", name),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: Phase,
    /// Site the plan was heading to or sitting at
    pub destination: Option<Site>,
    /// Ticks spent in the running action
    pub ticks_in_action: u32,
    /// Completed docks since first boot
    pub cycles: u32,
}

impl Snapshot {
    pub fn to_bytes(&self) -> [u8; SNAPSHOT_SIZE] {
        let mut bytes = [0u8; SNAPSHOT_SIZE];
        bytes[0..4].copy_from_slice(&SNAPSHOT_MAGIC.to_le_bytes());
        bytes[4..6].copy_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        bytes[6] = self.phase as u8;
        bytes[7] = match self.destination {
            None => 0,
            Some(Site::Home) => 1,
            Some(Site::Mine) => 2,
        };
        bytes[8..12].copy_from_slice(&self.ticks_in_action.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.cycles.to_le_bytes());

        let crc = crc::checksum(&bytes[..BODY_SIZE]);
        bytes[BODY_SIZE..].copy_from_slice(&crc.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        if bytes.len() < SNAPSHOT_SIZE {
            return Err(SnapshotError::Truncated { len: bytes.len() });
        }

        if read_u32(bytes, 0) != SNAPSHOT_MAGIC {
            return Err(SnapshotError::BadMagic);
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }

        if read_u32(bytes, BODY_SIZE) != crc::checksum(&bytes[..BODY_SIZE]) {
            return Err(SnapshotError::Checksum);
        }

        let phase = Phase::try_from(bytes[6])?;
        let destination = match bytes[7] {
            0 => None,
            1 => Some(Site::Home),
            2 => Some(Site::Mine),
            _ => return Err(SnapshotError::InvalidField("destination")),
        };

        Ok(Self {
            phase,
            destination,
            ticks_in_action: read_u32(bytes, 8),
            cycles: read_u32(bytes, 12),
        })
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
