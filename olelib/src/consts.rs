//! Magic numbers and sentinel values of the OLE2 compound file format.

/// Signature at the start of every compound file
pub const MAGIC: &[u8; 8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

/// Size of the file header, regardless of the sector size
pub const HEADER_SIZE: usize = 512;

/// Smallest valid file: header + one FAT sector + one directory sector
pub const MINIMAL_OLEFILE_SIZE: usize = 1536;

/// Size of one directory entry
pub const DIRENTRY_SIZE: usize = 128;

/// Number of FAT sector indexes stored in the header itself
pub const HEADER_DIFAT_ENTRIES: usize = 109;

/// Size of a mini sector (mini sector shift is always 6)
pub const MINI_SECTOR_SIZE: usize = 64;

// Sector sentinels
pub const MAXREGSECT: u32 = 0xFFFF_FFFA;
pub const DIFSECT: u32 = 0xFFFF_FFFC;
pub const FATSECT: u32 = 0xFFFF_FFFD;
pub const ENDOFCHAIN: u32 = 0xFFFF_FFFE;
pub const FREESECT: u32 = 0xFFFF_FFFF;

/// Empty sibling/child pointer in the directory tree
pub const NOSTREAM: u32 = 0xFFFF_FFFF;

// Directory entry types
pub const STGTY_EMPTY: u8 = 0;
pub const STGTY_STORAGE: u8 = 1;
pub const STGTY_STREAM: u8 = 2;
pub const STGTY_LOCKBYTES: u8 = 3;
pub const STGTY_PROPERTY: u8 = 4;
pub const STGTY_ROOT: u8 = 5;
