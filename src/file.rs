use std::io::Read;
use std::slice;

use byteorder::{ByteOrder, LittleEndian};
use time::PrimitiveDateTime;

use crate::consts;
use crate::datetime::{
    date_from_bits, datetime_from_parts, time_from_bits, DosDate, DosTime,
};
use crate::error::{Error, Result};
use crate::string::read_null_terminated_string;

/// An iterator over the file entries in a cabinet.
#[derive(Clone)]
pub struct FileEntries<'a> {
    pub(crate) iter: slice::Iter<'a, FileEntry>,
}

/// Metadata about one file stored in a cabinet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    name: String,
    date: DosDate,
    time: DosTime,
    uncompressed_size: u32,
    attributes: u16,
    folder_index: usize,
    uncompressed_offset: u32,
}

impl<'a> Iterator for FileEntries<'a> {
    type Item = &'a FileEntry;

    fn next(&mut self) -> Option<&'a FileEntry> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a> ExactSizeIterator for FileEntries<'a> {}

impl FileEntry {
    /// Returns the name of file, exactly as stored in the cabinet (it may
    /// contain `\`-separated directory components).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the date stored for this file.
    pub fn date(&self) -> DosDate {
        self.date
    }

    /// Returns the time of day stored for this file.
    pub fn time(&self) -> DosTime {
        self.time
    }

    /// Returns the datetime for this file.  Per the cabinet format, this
    /// "is typically considered the 'last modified' time in local time, but
    /// the actual definition is application-defined."
    ///
    /// Note that this will return [`None`] if the datetime in the cabinet file
    /// was not a valid date/time.
    pub fn datetime(&self) -> Option<PrimitiveDateTime> {
        datetime_from_parts(self.date, self.time)
    }

    /// Returns the total size of the file when decompressed, in bytes.
    pub fn uncompressed_size(&self) -> u32 {
        self.uncompressed_size
    }

    /// Returns the position of this file's data within its folder's
    /// decompressed stream.
    pub fn uncompressed_offset(&self) -> u32 {
        self.uncompressed_offset
    }

    /// Returns the index of the folder holding this file's data.
    pub fn folder_index(&self) -> usize {
        self.folder_index
    }

    /// Returns the raw attribute bits.
    pub fn attributes(&self) -> u16 {
        self.attributes
    }

    /// Returns true if this file has the "read-only" attribute set.
    pub fn is_read_only(&self) -> bool {
        (self.attributes & consts::ATTR_READ_ONLY) != 0
    }

    /// Returns true if this file has the "hidden" attribute set.
    pub fn is_hidden(&self) -> bool {
        (self.attributes & consts::ATTR_HIDDEN) != 0
    }

    /// Returns true if this file has the "system file" attribute set.
    pub fn is_system(&self) -> bool {
        (self.attributes & consts::ATTR_SYSTEM) != 0
    }

    /// Returns true if this file has the "archive" (modified since last
    /// backup) attribute set.
    pub fn is_archive(&self) -> bool {
        (self.attributes & consts::ATTR_ARCH) != 0
    }

    /// Returns true if this file has the "execute after extraction" attribute
    /// set.
    pub fn is_exec(&self) -> bool {
        (self.attributes & consts::ATTR_EXEC) != 0
    }

    /// Returns true if this file has the "name is UTF" attribute set.
    pub fn is_name_utf(&self) -> bool {
        (self.attributes & consts::ATTR_NAME_IS_UTF) != 0
    }
}

/// Reads one CFFILE record, resolving its folder index against the
/// `num_folders` folders parsed so far.
pub(crate) fn parse_file_entry<R: Read>(
    mut reader: R,
    num_folders: usize,
) -> Result<FileEntry> {
    let mut buf = [0u8; consts::FILE_SIZE];
    reader.read_exact(&mut buf).map_err(Error::Read)?;
    let uncompressed_size =
        LittleEndian::read_u32(&buf[consts::FILE_UNCOMPRESSED_SIZE..]);
    let uncompressed_offset =
        LittleEndian::read_u32(&buf[consts::FILE_FOLDER_OFFSET..]);
    let folder_index =
        LittleEndian::read_u16(&buf[consts::FILE_FOLDER_INDEX..]);
    if folder_index >= consts::FOLDER_INDEX_CONTINUED {
        return unsupported!(
            "File continued across cabinets (folder index 0x{:04x})",
            folder_index
        );
    }
    let folder_index = folder_index as usize;
    if folder_index >= num_folders {
        return data_format!(
            "File entry folder index {} out of bounds (cabinet has {} \
             folders)",
            folder_index,
            num_folders
        );
    }
    let date =
        date_from_bits(LittleEndian::read_u16(&buf[consts::FILE_DATE..]));
    let time =
        time_from_bits(LittleEndian::read_u16(&buf[consts::FILE_TIME..]));
    let attributes = LittleEndian::read_u16(&buf[consts::FILE_ATTRIBUTES..]);
    let name = read_null_terminated_string(&mut reader)?;
    Ok(FileEntry {
        name,
        date,
        time,
        uncompressed_size,
        attributes,
        folder_index,
        uncompressed_offset,
    })
}
