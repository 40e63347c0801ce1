//! Snapshot checksum

use crc::{Crc, CRC_32_ISO_HDLC};

/// CRC-32 (ISO HDLC, the Ethernet / ZIP polynomial)
const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Checksum of the snapshot body
pub(super) fn checksum(body: &[u8]) -> u32 {
    CRC32.checksum(body)
}
