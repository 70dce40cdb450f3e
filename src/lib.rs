//! A library for reading and decompressing [Windows
//! cabinet](https://en.wikipedia.org/wiki/Cabinet_(file_format)) (CAB) files
//! whose folders use MSZIP compression.
//!
//! A cabinet is parsed once, when it is opened, into a [`Cabinet`]: a list
//! of folders (compressed streams) and a list of files, each of which names
//! its folder and the range of that folder's decompressed stream that holds
//! its contents.  [`CabDecompressor`] then extracts files on request.
//!
//! ```no_run
//! let mut decompressor: mscab::CabDecompressor =
//!     mscab::CabDecompressor::new();
//! let cabinet = decompressor.open("update.cab")?;
//! for file in cabinet.file_entries() {
//!     let data = decompressor.extract(file)?;
//!     println!("{}: {} bytes", file.name(), data.len());
//! }
//! # Ok::<(), mscab::Error>(())
//! ```
//!
//! Cabinet sets spanning several files, and compression schemes other than
//! MSZIP, are not supported.

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod cabinet;
mod checksum;
mod consts;
mod ctype;
mod datetime;
mod decompressor;
mod error;
mod file;
mod folder;
mod mszip;
mod source;
mod stream;
mod string;

pub use crate::cabinet::Cabinet;
pub use crate::checksum::checksum;
pub use crate::ctype::CompressionType;
pub use crate::datetime::{DosDate, DosTime};
pub use crate::decompressor::CabDecompressor;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::file::{FileEntries, FileEntry};
pub use crate::folder::{FolderEntries, FolderEntry};
pub use crate::source::{ByteSource, FileSource, MemorySource};
