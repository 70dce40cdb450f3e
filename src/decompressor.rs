use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::cabinet::Cabinet;
use crate::consts;
use crate::error::{Error, ErrorKind, Result};
use crate::file::FileEntry;
use crate::source::{ByteSource, FileSource};
use crate::stream::FolderStream;

const COPY_BUFFER_SIZE: usize = 102_400;

/// Opens cabinets and extracts the files in them.
///
/// Decompression state is kept between calls to [`extract`](Self::extract),
/// so extracting the files of a folder in the order they are stored decodes
/// each data block only once.  Extracting a file that lies before the
/// previously extracted one in the same folder decodes that folder again
/// from its start.
pub struct CabDecompressor<S: ByteSource = FileSource> {
    source: Option<S>,
    cabinet: Option<Arc<Cabinet>>,
    stream: Option<FolderStream<S::Reader>>,
    error: Option<ErrorKind>,
}

impl CabDecompressor<FileSource> {
    /// Opens the cabinet file at the given path, closing any cabinet that was
    /// already open.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<Cabinet>> {
        self.open_at(FileSource::new(path), 0)
    }
}

impl<S: ByteSource> CabDecompressor<S> {
    /// Creates a decompressor with no cabinet open.
    pub fn new() -> CabDecompressor<S> {
        CabDecompressor {
            source: None,
            cabinet: None,
            stream: None,
            error: None,
        }
    }

    /// Opens the cabinet that starts `base_offset` bytes into `source`,
    /// closing any cabinet that was already open.  A cabinet embedded in a
    /// larger file (such as a self-extracting executable) can be opened by
    /// passing its position within that file.
    pub fn open_at(
        &mut self,
        source: S,
        base_offset: u64,
    ) -> Result<Arc<Cabinet>> {
        self.close();
        let result = source
            .open_read()
            .map_err(Error::Open)
            .and_then(|mut reader| {
                Cabinet::read_headers(&mut reader, base_offset)
            })
            .map(Arc::new);
        if let Ok(ref cabinet) = result {
            debug!(
                "Opened cabinet with {} folders and {} files",
                cabinet.folder_entries().len(),
                cabinet.files().len()
            );
            self.source = Some(source);
            self.cabinet = Some(cabinet.clone());
        }
        self.record(result)
    }

    /// Returns the currently open cabinet, if any.
    pub fn cabinet(&self) -> Option<Arc<Cabinet>> {
        self.cabinet.clone()
    }

    /// Returns the kind of error that the most recent operation failed with,
    /// or `None` if it succeeded.
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.error
    }

    /// Returns the decompressed contents of `file`, which must be an entry of
    /// the open cabinet.
    pub fn extract(&mut self, file: &FileEntry) -> Result<Vec<u8>> {
        let result = self.extract_inner(file);
        self.record(result)
    }

    /// Returns the decompressed contents of the file with the given name.
    pub fn extract_named(&mut self, name: &str) -> Result<Vec<u8>> {
        let file = self
            .cabinet
            .as_ref()
            .and_then(|cabinet| cabinet.get_file_entry(name))
            .cloned();
        match file {
            Some(file) => self.extract(&file),
            None => {
                let result =
                    invalid_argument!("No such file in cabinet: {:?}", name);
                self.record(result)
            }
        }
    }

    /// Decompresses `file` and writes its contents to `writer`, returning the
    /// number of bytes written.
    pub fn extract_to<W: Write>(
        &mut self,
        file: &FileEntry,
        writer: &mut W,
    ) -> Result<u64> {
        let result = self.extract_inner(file).and_then(|data| {
            writer.write_all(&data).map_err(Error::Write)?;
            Ok(data.len() as u64)
        });
        self.record(result)
    }

    /// Decompresses `file` into a new file at exactly `path`.  Directory
    /// components of the name stored in the cabinet are not recreated.
    pub fn extract_to_path<P: AsRef<Path>>(
        &mut self,
        file: &FileEntry,
        path: P,
    ) -> Result<u64> {
        let result = self.extract_inner(file).and_then(|data| {
            let mut output = File::create(path).map_err(Error::Open)?;
            output.write_all(&data).map_err(Error::Write)?;
            output.flush().map_err(Error::Write)?;
            Ok(data.len() as u64)
        });
        self.record(result)
    }

    /// Copies the raw bytes of the open cabinet (as many as its header says
    /// it holds, starting from its base offset) to `writer`.  This recovers a
    /// standalone cabinet file from one embedded in a larger file.
    pub fn copy_cabinet<W: Write>(&mut self, writer: &mut W) -> Result<u64> {
        let result = self.copy_cabinet_inner(writer);
        self.record(result)
    }

    /// Closes the open cabinet, if any, releasing the decompression state
    /// and any file handle it holds.
    pub fn close(&mut self) {
        self.stream = None;
        self.cabinet = None;
        self.source = None;
        self.error = None;
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        self.error = result.as_ref().err().map(Error::kind);
        result
    }

    fn opened(&self) -> Result<(&S, &Cabinet)> {
        match (self.source.as_ref(), self.cabinet.as_deref()) {
            (Some(source), Some(cabinet)) => Ok((source, cabinet)),
            _ => invalid_argument!("No cabinet is open"),
        }
    }

    fn extract_inner(&mut self, file: &FileEntry) -> Result<Vec<u8>> {
        let (source, cabinet) =
            match (self.source.as_ref(), self.cabinet.as_deref()) {
                (Some(source), Some(cabinet)) => (source, cabinet),
                _ => return invalid_argument!("No cabinet is open"),
            };
        let folder = match cabinet.folder_of(file) {
            Some(folder) if cabinet.files().contains(file) => folder,
            _ => {
                return invalid_argument!(
                    "File {:?} does not belong to the open cabinet",
                    file.name()
                )
            }
        };
        let offset = file.uncompressed_offset() as u64;
        let length = file.uncompressed_size() as u64;
        let last_block =
            (offset + length).saturating_sub(1) / consts::BLOCK_MAX as u64;
        if length > 0 && last_block >= folder.num_data_blocks() as u64 {
            return data_format!(
                "File {:?} cannot be extracted, cabinet set is incomplete",
                file.name()
            );
        }
        let mut data = Vec::new();
        data.try_reserve_exact(length as usize)
            .map_err(|_| Error::OutOfMemory(length as usize))?;
        if length == 0 {
            return Ok(data);
        }
        let stream = match self.stream.take() {
            Some(stream) => stream,
            None => {
                FolderStream::new(source.open_read().map_err(Error::Open)?)
            }
        };
        let stream = self.stream.insert(stream);
        debug!(
            "Extracting {:?} from folder {} (selected: {:?})",
            file.name(),
            folder.index(),
            stream.folder()
        );
        stream.read_range(folder, offset, length, &mut data)?;
        Ok(data)
    }

    fn copy_cabinet_inner<W: Write>(&self, writer: &mut W) -> Result<u64> {
        let (source, cabinet) = self.opened()?;
        let mut reader = source.open_read().map_err(Error::Open)?;
        reader
            .seek(SeekFrom::Start(cabinet.base_offset()))
            .map_err(Error::Seek)?;
        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        let total = cabinet.length() as u64;
        let mut copied: u64 = 0;
        while copied < total {
            let count = (total - copied).min(COPY_BUFFER_SIZE as u64) as usize;
            let count = match reader.read(&mut buffer[..count]) {
                Ok(0) => {
                    return Err(Error::Read(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!(
                            "cabinet ends after {} of {} bytes",
                            copied, total
                        ),
                    )))
                }
                Ok(count) => count,
                Err(ref error)
                    if error.kind() == io::ErrorKind::Interrupted =>
                {
                    continue
                }
                Err(error) => return Err(Error::Read(error)),
            };
            writer.write_all(&buffer[..count]).map_err(Error::Write)?;
            copied += count as u64;
        }
        Ok(copied)
    }
}

impl<S: ByteSource> Default for CabDecompressor<S> {
    fn default() -> CabDecompressor<S> {
        CabDecompressor::new()
    }
}
