//! Parsing of the fixed 512-byte compound file header.

use crate::consts::{ENDOFCHAIN, FREESECT, HEADER_DIFAT_ENTRIES, HEADER_SIZE, MINI_SECTOR_SIZE};
use crate::error::{OleError, OleErrorKind};

/// Read a little-endian `u16` at `offset`. Callers guarantee the bounds.
pub(crate) fn le_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

/// Read a little-endian `u32` at `offset`. Callers guarantee the bounds.
pub(crate) fn le_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Read a little-endian `u64` at `offset`. Callers guarantee the bounds.
pub(crate) fn le_u64(buf: &[u8], offset: usize) -> u64 {
    u64::from(le_u32(buf, offset)) | (u64::from(le_u32(buf, offset + 4)) << 32)
}

#[derive(Debug, Clone)]
pub(crate) struct Header {
    /// Major format version (3 or 4)
    pub major_version: u16,
    /// Size of a regular sector in bytes (512 or 4096)
    pub sector_size: usize,
    /// Number of FAT sectors declared by the header
    pub num_fat_sectors: u32,
    /// First sector of the directory stream
    pub first_dir_sector: u32,
    /// Streams smaller than this live in the mini stream
    pub mini_stream_cutoff: u32,
    /// First sector of the MiniFAT
    pub first_minifat_sector: u32,
    /// Number of MiniFAT sectors
    pub num_minifat_sectors: u32,
    /// First DIFAT sector (for files with more than 109 FAT sectors)
    pub first_difat_sector: u32,
    /// Number of DIFAT sectors
    pub num_difat_sectors: u32,
    /// FAT sector indexes stored in the header, up to the first free slot
    pub difat: Vec<u32>,
}

impl Header {
    /// Parse and validate the header. The magic signature is checked by the caller.
    pub(crate) fn parse(raw: &[u8; HEADER_SIZE]) -> Result<Self, OleError> {
        let major_version = le_u16(raw, 0x1A);
        let byte_order = le_u16(raw, 0x1C);
        let sector_shift = le_u16(raw, 0x1E);
        let mini_sector_shift = le_u16(raw, 0x20);

        if byte_order != 0xFFFE {
            return Err(OleError::Header(OleErrorKind::InvalidByteOrder(
                byte_order,
            )));
        }

        let expected_shift = match major_version {
            3 => 9,
            4 => 12,
            _ => {
                return Err(OleError::Header(OleErrorKind::UnsupportedVersion(
                    major_version,
                )));
            }
        };
        if sector_shift != expected_shift {
            let size = 1usize.checked_shl(u32::from(sector_shift)).unwrap_or(0);
            return Err(OleError::Header(OleErrorKind::SectorSizeMismatch(
                major_version,
                size,
            )));
        }

        let mini_sector_size = 1usize.checked_shl(u32::from(mini_sector_shift)).unwrap_or(0);
        if mini_sector_size != MINI_SECTOR_SIZE {
            return Err(OleError::Header(OleErrorKind::InvalidMiniSectorSize(
                mini_sector_size,
            )));
        }

        // FAT sector indexes kept in the header stop at the first unused slot
        let difat = (0..HEADER_DIFAT_ENTRIES)
            .map(|i| le_u32(raw, 0x4C + i * 4))
            .take_while(|&sector| sector != FREESECT && sector != ENDOFCHAIN)
            .collect();

        Ok(Self {
            major_version,
            sector_size: 1 << sector_shift,
            num_fat_sectors: le_u32(raw, 0x2C),
            first_dir_sector: le_u32(raw, 0x30),
            mini_stream_cutoff: le_u32(raw, 0x38),
            first_minifat_sector: le_u32(raw, 0x3C),
            num_minifat_sectors: le_u32(raw, 0x40),
            first_difat_sector: le_u32(raw, 0x44),
            num_difat_sectors: le_u32(raw, 0x48),
            difat,
        })
    }
}
