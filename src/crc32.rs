//! The PNG flavor of CRC32: polynomial `0xEDB88320` (reflected), initial
//! register `0xFFFFFFFF`, final XOR `0xFFFFFFFF`, table-driven.
//!
//! This is deliberately hand-rolled rather than pulled from a `crc` crate —
//! it is one of the two small algorithmic cores this crate exists to own.

const POLY: u32 = 0xEDB8_8320;

/// A precomputed CRC32 lookup table.
///
/// Built once per [`Crc32::new`] call; the table itself is 1 KiB and cheap
/// to construct, so there is no shared/lazy-static table — each demuxer run
/// owns its own.
#[derive(Debug, Clone)]
pub struct Crc32 {
    table: [u32; 256],
}

impl Crc32 {
    /// Builds the 256-entry CRC32 table.
    #[must_use]
    pub fn new() -> Self {
        let mut table = [0u32; 256];
        let mut n = 0usize;
        while n < 256 {
            let mut c = n as u32;
            let mut k = 0;
            while k < 8 {
                c = if c & 1 != 0 { POLY ^ (c >> 1) } else { c >> 1 };
                k += 1;
            }
            table[n] = c;
            n += 1;
        }
        Self { table }
    }

    /// Computes the CRC32 of `type_tag ‖ data`, the exact byte sequence a
    /// PNG chunk's trailing CRC field covers (length is excluded).
    #[must_use]
    pub fn checksum(&self, type_tag: [u8; 4], data: &[u8]) -> u32 {
        let mut crc = 0xFFFF_FFFFu32;
        for &byte in type_tag.iter().chain(data) {
            let idx = ((crc ^ u32::from(byte)) & 0xFF) as usize;
            crc = self.table[idx] ^ (crc >> 8);
        }
        crc ^ 0xFFFF_FFFF
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}
