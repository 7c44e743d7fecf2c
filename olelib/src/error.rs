//! The `error` module defines the [`OleError`] enum that describes the errors that
//! can occur when opening an OLE2 compound file or reading streams from it via [`OleFile`].
//! It carries up to three pieces of information:
//! 1. Where the error occurs, e.g., while parsing the header or a directory entry.
//! 2. What kind of error was encountered (via [`OleErrorKind`]).
//! 3. Which directory entry (SID) was involved, if applicable.
//!
//! [`OleFile`]: crate::OleFile

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OleError {
    #[error("I/O error while reading compound file: {0}")]
    Io(#[from] io::Error),
    #[error("Not an OLE2 structured storage file")]
    NotOleFile,
    #[error("Error encountered during header parsing:\n{0}")]
    Header(OleErrorKind),
    #[error("Error encountered during parsing of directory entry #{1}:\n{0}")]
    Directory(OleErrorKind, u32),
    #[error("Error encountered during stream reading:\n{0}")]
    Stream(OleErrorKind),
    #[error("No such storage or stream: '{0}'")]
    NotFound(String),
    #[error("Entry is not a stream: '{0}'")]
    NotAStream(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OleErrorKind {
    /// File is smaller than a header plus two sectors
    FileTooSmall(u64),
    /// Byte order mark is not little-endian
    InvalidByteOrder(u16),
    /// Major version is neither 3 nor 4
    UnsupportedVersion(u16),
    /// Sector shift does not match the major version
    SectorSizeMismatch(u16, usize),
    /// Mini sector shift is not 6
    InvalidMiniSectorSize(usize),
    /// Sector index points outside the allocation table
    SectorOutOfRange(u32),
    /// Sector chain revisits a sector or never terminates
    ChainLoop(u32),
    /// Mini sector lies outside the mini stream
    MiniSectorOutOfRange(u32),
    /// Sector chain holds fewer bytes than the declared stream size
    IncompleteStream(u64, usize),
    /// Entry type byte is not a known storage type
    InvalidEntryType(u8),
    /// Name length field exceeds the 64-byte name buffer or is odd
    InvalidNameLength(u16),
    /// Directory has no root entry
    MissingRootEntry,
    /// Sibling or child SID points outside the directory
    InvalidSid(u32),
    /// Directory tree references the same entry twice
    DirectoryCycle(u32),
}

impl std::fmt::Display for OleErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileTooSmall(size) => {
                write!(f, "File of {size} bytes is too small for a compound file")
            }
            Self::InvalidByteOrder(bom) => {
                write!(f, "Invalid byte order mark: 0x{bom:04X}")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "Unsupported major version: {version}")
            }
            Self::SectorSizeMismatch(version, size) => {
                write!(f, "Sector size {size} does not match major version {version}")
            }
            Self::InvalidMiniSectorSize(size) => {
                write!(f, "Invalid mini sector size: {size}")
            }
            Self::SectorOutOfRange(sector) => {
                write!(f, "Sector index out of range: 0x{sector:X}")
            }
            Self::ChainLoop(sector) => {
                write!(f, "Sector chain loops at sector 0x{sector:X}")
            }
            Self::MiniSectorOutOfRange(sector) => {
                write!(f, "Mini sector index out of range: 0x{sector:X}")
            }
            Self::IncompleteStream(expected, actual) => {
                write!(
                    f,
                    "Stream declares {expected} bytes but its sector chain holds {actual}"
                )
            }
            Self::InvalidEntryType(kind) => {
                write!(f, "Invalid directory entry type: {kind}")
            }
            Self::InvalidNameLength(len) => {
                write!(f, "Invalid directory entry name length: {len}")
            }
            Self::MissingRootEntry => {
                write!(f, "Directory has no root entry")
            }
            Self::InvalidSid(sid) => {
                write!(f, "Directory entry index out of range: {sid}")
            }
            Self::DirectoryCycle(sid) => {
                write!(f, "Directory entry #{sid} is referenced more than once")
            }
        }
    }
}

impl std::error::Error for OleErrorKind {}
