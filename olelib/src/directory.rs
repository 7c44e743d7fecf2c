//! Directory entries of a compound file and the storage tree built from them.

use crate::consts::{
    DIRENTRY_SIZE, STGTY_EMPTY, STGTY_LOCKBYTES, STGTY_PROPERTY, STGTY_ROOT, STGTY_STORAGE,
    STGTY_STREAM,
};
use crate::error::{OleError, OleErrorKind};
use crate::header::{le_u16, le_u32, le_u64};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Empty,
    Storage,
    Stream,
    LockBytes,
    Property,
    Root,
}

impl EntryKind {
    const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            STGTY_EMPTY => Self::Empty,
            STGTY_STORAGE => Self::Storage,
            STGTY_STREAM => Self::Stream,
            STGTY_LOCKBYTES => Self::LockBytes,
            STGTY_PROPERTY => Self::Property,
            STGTY_ROOT => Self::Root,
            _ => return None,
        })
    }

    /// Storages and the root entry may hold children
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Storage | Self::Root)
    }
}

/// One parsed 128-byte directory entry.
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Index of the entry in the directory stream
    pub sid: u32,
    /// Entry name (decoded from UTF-16LE)
    pub name: String,
    /// Storage, stream or root
    pub kind: EntryKind,
    /// Left sibling in the red-black tree
    pub left: u32,
    /// Right sibling in the red-black tree
    pub right: u32,
    /// Root of the children tree (storages only)
    pub child: u32,
    /// Class identifier of the storage
    pub clsid: [u8; 16],
    /// First sector of the stream data
    pub start_sector: u32,
    /// Stream size in bytes
    pub size: u64,
    /// Children SIDs in directory-tree order (storages only)
    pub(crate) children: Vec<u32>,
}

impl DirEntry {
    /// Parse a directory entry. Version 3 files only use the low 32 bits of the size.
    pub(crate) fn parse(raw: &[u8], sid: u32, sector_size: usize) -> Result<Self, OleError> {
        debug_assert_eq!(raw.len(), DIRENTRY_SIZE);

        let kind = EntryKind::from_byte(raw[0x42])
            .ok_or(OleError::Directory(OleErrorKind::InvalidEntryType(raw[0x42]), sid))?;

        let name_len = le_u16(raw, 0x40);
        let name = if kind == EntryKind::Empty {
            String::new()
        } else {
            if name_len > 64 || !name_len.is_multiple_of(2) {
                return Err(OleError::Directory(
                    OleErrorKind::InvalidNameLength(name_len),
                    sid,
                ));
            }
            // Length includes the terminating null character
            decode_utf16le(&raw[..usize::from(name_len).saturating_sub(2)])
        };

        let mut clsid = [0u8; 16];
        clsid.copy_from_slice(&raw[0x50..0x60]);

        let size = if sector_size == 512 {
            u64::from(le_u32(raw, 0x78))
        } else {
            le_u64(raw, 0x78)
        };

        Ok(Self {
            sid,
            name,
            kind,
            left: le_u32(raw, 0x44),
            right: le_u32(raw, 0x48),
            child: le_u32(raw, 0x4C),
            clsid,
            start_sector: le_u32(raw, 0x74),
            size,
            children: Vec::new(),
        })
    }

    pub fn is_stream(&self) -> bool {
        self.kind == EntryKind::Stream
    }

    /// Children SIDs in directory-tree order
    pub fn children(&self) -> &[u32] {
        &self.children
    }

    /// CLSID formatted as `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX`, `None` if all zeros.
    pub fn clsid_string(&self) -> Option<String> {
        format_clsid(&self.clsid)
    }
}

/// Node of the storage hierarchy handed to UI code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNode {
    pub name: String,
    pub kind: EntryKind,
    /// Stream size in bytes (0 for storages)
    pub size: u64,
    /// Names from the root down to this entry (empty for the root)
    pub path: Vec<String>,
    /// Child nodes sorted by name (case-insensitive)
    pub children: Vec<EntryNode>,
}

impl EntryNode {
    /// Number of streams in this subtree
    pub fn stream_count(&self) -> usize {
        let own = usize::from(self.kind == EntryKind::Stream);
        own + self.children.iter().map(Self::stream_count).sum::<usize>()
    }
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16_lossy(&units)
        .trim_end_matches('\0')
        .to_string()
}

fn format_clsid(bytes: &[u8; 16]) -> Option<String> {
    if bytes.iter().all(|&b| b == 0) {
        return None;
    }

    Some(format!(
        "{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}",
        le_u32(bytes, 0),
        le_u16(bytes, 4),
        le_u16(bytes, 6),
        bytes[8],
        bytes[9],
        bytes[10],
        bytes[11],
        bytes[12],
        bytes[13],
        bytes[14],
        bytes[15],
    ))
}
