use std::io::{Read, Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};
use log::{trace, warn};

use crate::consts;
use crate::error::{Error, Result};
use crate::file::{parse_file_entry, FileEntries, FileEntry};
use crate::folder::{parse_folder_entry, FolderEntries, FolderEntry};

/// The parsed directory of a cabinet file: its folders, and the files whose
/// data those folders hold.
#[derive(Clone, Debug)]
pub struct Cabinet {
    base_offset: u64,
    length: u32,
    version: (u8, u8),
    cabinet_set_id: u16,
    cabinet_set_index: u16,
    folders: Vec<FolderEntry>,
    files: Vec<FileEntry>,
}

impl Cabinet {
    /// Parses the cabinet header, folder records, and file records of the
    /// cabinet that starts at `base_offset` within `reader`.
    pub fn read_headers<R: Read + Seek>(
        reader: &mut R,
        base_offset: u64,
    ) -> Result<Cabinet> {
        reader.seek(SeekFrom::Start(base_offset)).map_err(Error::Seek)?;
        let mut header = [0u8; consts::HEADER_SIZE];
        reader.read_exact(&mut header).map_err(Error::Read)?;

        let mut signature = [0u8; 4];
        let end = consts::HEADER_SIGNATURE + consts::FILE_SIGNATURE.len();
        signature.copy_from_slice(&header[consts::HEADER_SIGNATURE..end]);
        if &signature != consts::FILE_SIGNATURE {
            return Err(Error::Signature { found: signature });
        }
        let length =
            LittleEndian::read_u32(&header[consts::HEADER_CABINET_SIZE..]);
        let first_file_offset =
            LittleEndian::read_u32(&header[consts::HEADER_FILE_OFFSET..]);
        let minor_version = header[consts::HEADER_MINOR_VERSION];
        let major_version = header[consts::HEADER_MAJOR_VERSION];
        let num_folders =
            LittleEndian::read_u16(&header[consts::HEADER_NUM_FOLDERS..])
                as usize;
        let num_files =
            LittleEndian::read_u16(&header[consts::HEADER_NUM_FILES..])
                as usize;
        let flags = LittleEndian::read_u16(&header[consts::HEADER_FLAGS..]);
        let cabinet_set_id =
            LittleEndian::read_u16(&header[consts::HEADER_SET_ID..]);
        let cabinet_set_index =
            LittleEndian::read_u16(&header[consts::HEADER_SET_INDEX..]);

        if num_folders == 0 {
            return data_format!("No folders in cabinet");
        }
        if num_files == 0 {
            return data_format!("No files in cabinet");
        }
        if (major_version, minor_version)
            != (consts::VERSION_MAJOR, consts::VERSION_MINOR)
        {
            warn!(
                "Cabinet version is {}.{}, not {}.{}",
                major_version,
                minor_version,
                consts::VERSION_MAJOR,
                consts::VERSION_MINOR
            );
        }
        if flags != 0 {
            return data_format!(
                "Unsupported header flags 0x{:04x} (prev cabinet: {}, next \
                 cabinet: {}, reserve present: {})",
                flags,
                (flags & consts::FLAG_PREV_CABINET) != 0,
                (flags & consts::FLAG_NEXT_CABINET) != 0,
                (flags & consts::FLAG_RESERVE_PRESENT) != 0
            );
        }

        let mut folders = Vec::with_capacity(num_folders);
        for index in 0..num_folders {
            let mut record = [0u8; consts::FOLDER_SIZE];
            reader.read_exact(&mut record).map_err(Error::Read)?;
            let entry = parse_folder_entry(&record, index, base_offset);
            trace!(
                "Folder {}: {:?}, {} blocks at offset {}",
                index,
                entry.compression_type(),
                entry.num_data_blocks(),
                entry.data_offset()
            );
            folders.push(entry);
        }

        reader
            .seek(SeekFrom::Start(base_offset + first_file_offset as u64))
            .map_err(Error::Seek)?;
        let mut files = Vec::with_capacity(num_files);
        for _ in 0..num_files {
            let entry = parse_file_entry(&mut *reader, folders.len())?;
            trace!(
                "File {:?}: {} bytes at offset {} of folder {}",
                entry.name(),
                entry.uncompressed_size(),
                entry.uncompressed_offset(),
                entry.folder_index()
            );
            files.push(entry);
        }

        Ok(Cabinet {
            base_offset,
            length,
            version: (major_version, minor_version),
            cabinet_set_id,
            cabinet_set_index,
            folders,
            files,
        })
    }

    /// Returns the position of the cabinet within its byte source.
    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// Returns the total size of the cabinet file, in bytes, as recorded in
    /// its header.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Returns the `(major, minor)` format version from the header.
    pub fn version(&self) -> (u8, u8) {
        self.version
    }

    /// Returns the cabinet set ID for this cabinet (an arbitrary number used
    /// to group together a set of cabinets).
    pub fn cabinet_set_id(&self) -> u16 {
        self.cabinet_set_id
    }

    /// Returns this cabinet's (zero-based) index within its cabinet set.
    pub fn cabinet_set_index(&self) -> u16 {
        self.cabinet_set_index
    }

    /// Returns an iterator over the folder entries in this cabinet.
    pub fn folder_entries(&self) -> FolderEntries {
        FolderEntries { iter: self.folders.iter() }
    }

    /// Returns the folder with the given index, if any.
    pub fn folder_entry(&self, index: usize) -> Option<&FolderEntry> {
        self.folders.get(index)
    }

    /// Returns an iterator over the file entries in this cabinet, in the
    /// order they are stored.
    pub fn file_entries(&self) -> FileEntries {
        FileEntries { iter: self.files.iter() }
    }

    /// Returns all file entries as a slice.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Returns the entry for the file with the given name, if any.
    pub fn get_file_entry(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|&file| file.name() == name)
    }

    /// Returns the folder that holds the given file's data.
    pub fn folder_of(&self, file: &FileEntry) -> Option<&FolderEntry> {
        self.folders.get(file.folder_index())
    }
}
