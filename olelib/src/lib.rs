//! # `olelib`
//!
//! `olelib` is a Rust library for reading OLE2 structured storage files, the compound
//! binary container behind legacy Microsoft Office documents (`.doc`, `.xls`, `.ppt`, `.msg`).
//!
//! The library provides:
//! - Parser for compound files (via [`OleFile`] struct).
//! - Error handling with [`OleError`].
//! - Access to the storage hierarchy ([`EntryNode`]) and raw stream contents.
//!
//! The reader is strictly read-only: it never modifies the container.
//!
//! ## Example
//!
//! ```no_run
//! use olelib::OleFile;
//!
//! let mut ole = OleFile::open("document.doc").unwrap();
//! for path in ole.list_streams() {
//!     println!("{}", path.join("/"));
//! }
//! let bytes = ole.read_stream(&["WordDocument"]).unwrap();
//! ```

pub mod consts;
mod directory;
mod error;
mod header;
mod olefile;

// Public APIs
pub use directory::{DirEntry, EntryKind, EntryNode};
pub use error::{OleError, OleErrorKind};
pub use olefile::{OleFile, is_ole_bytes};
