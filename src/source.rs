use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Something a cabinet can be read from.  Each call to `open_read` yields an
/// independent reader, so the decompressor can hold a handle for
/// decompression that is separate from the one used to parse headers.
pub trait ByteSource {
    /// The reader type produced by this source.
    type Reader: Read + Seek;

    /// Opens a new reader positioned at the start of the source.
    fn open_read(&self) -> io::Result<Self::Reader>;
}

/// A cabinet stored in a file on disk.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source for the file at the given path.  The file is not
    /// opened until it is needed.
    pub fn new<P: AsRef<Path>>(path: P) -> FileSource {
        FileSource { path: path.as_ref().to_path_buf() }
    }

    /// Returns the path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    type Reader = File;

    fn open_read(&self) -> io::Result<File> {
        File::open(&self.path)
    }
}

/// A cabinet held in memory.
#[derive(Clone, Debug)]
pub struct MemorySource {
    data: Arc<[u8]>,
}

impl MemorySource {
    /// Creates a source over the given bytes.
    pub fn new<D: Into<Arc<[u8]>>>(data: D) -> MemorySource {
        MemorySource { data: data.into() }
    }
}

impl ByteSource for MemorySource {
    type Reader = Cursor<Arc<[u8]>>;

    fn open_read(&self) -> io::Result<Cursor<Arc<[u8]>>> {
        Ok(Cursor::new(self.data.clone()))
    }
}
