use std::fmt;
use std::io;

use thiserror::Error;

/// The category of an [`Error`].  This is what
/// [`CabDecompressor::last_error`](crate::CabDecompressor::last_error)
/// reports.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ErrorKind {
    /// The caller passed an argument that cannot be used.
    ArgumentInvalid,
    /// A file could not be opened or created.
    Open,
    /// Reading from the cabinet failed or came up short.
    Read,
    /// Writing extracted data failed.
    Write,
    /// Seeking within the cabinet failed.
    Seek,
    /// A buffer for extracted data could not be allocated.
    OutOfMemory,
    /// The data does not start with a cabinet signature.
    Signature,
    /// The cabinet is structurally invalid.
    DataFormat,
    /// A data block did not match its stored checksum.
    Checksum,
    /// The cabinet uses a feature this crate does not implement.
    Unsupported,
}

/// An error encountered while reading or extracting a cabinet.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller passed an argument that cannot be used.
    #[error("invalid argument: {0}")]
    ArgumentInvalid(String),

    /// A file could not be opened or created.
    #[error("failed to open file: {0}")]
    Open(#[source] io::Error),

    /// Reading from the cabinet failed or came up short.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    /// Writing extracted data failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    /// Seeking within the cabinet failed.
    #[error("seek failed: {0}")]
    Seek(#[source] io::Error),

    /// A buffer for extracted data could not be allocated.
    #[error("out of memory allocating {0} bytes")]
    OutOfMemory(usize),

    /// The data does not start with a cabinet signature.
    #[error("not a cabinet file (found signature {found:02x?})")]
    Signature {
        /// The four bytes found where the signature should be.
        found: [u8; 4],
    },

    /// The cabinet is structurally invalid.
    #[error("invalid cabinet data: {0}")]
    DataFormat(String),

    /// A data block did not match its stored checksum.
    #[error(
        "checksum error in data block {block} \
         (expected {expected:08x}, actual {actual:08x})"
    )]
    Checksum {
        /// Zero-based index of the block within its folder.
        block: usize,
        /// The checksum stored in the block header.
        expected: u32,
        /// The checksum computed over the block.
        actual: u32,
    },

    /// The cabinet uses a feature this crate does not implement.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// A specialized `Result` type for cabinet operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ArgumentInvalid(_) => ErrorKind::ArgumentInvalid,
            Error::Open(_) => ErrorKind::Open,
            Error::Read(_) => ErrorKind::Read,
            Error::Write(_) => ErrorKind::Write,
            Error::Seek(_) => ErrorKind::Seek,
            Error::OutOfMemory(_) => ErrorKind::OutOfMemory,
            Error::Signature { .. } => ErrorKind::Signature,
            Error::DataFormat(_) => ErrorKind::DataFormat,
            Error::Checksum { .. } => ErrorKind::Checksum,
            Error::Unsupported(_) => ErrorKind::Unsupported,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ArgumentInvalid => "invalid argument",
            ErrorKind::Open => "open error",
            ErrorKind::Read => "read error",
            ErrorKind::Write => "write error",
            ErrorKind::Seek => "seek error",
            ErrorKind::OutOfMemory => "out of memory",
            ErrorKind::Signature => "bad signature",
            ErrorKind::DataFormat => "bad data format",
            ErrorKind::Checksum => "checksum error",
            ErrorKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}
