use std::slice;

use byteorder::{ByteOrder, LittleEndian};

use crate::consts;
use crate::ctype::CompressionType;
use crate::file::{FileEntries, FileEntry};

/// An iterator over the folder entries in a cabinet.
#[derive(Clone)]
pub struct FolderEntries<'a> {
    pub(crate) iter: slice::Iter<'a, FolderEntry>,
}

/// Metadata about one folder (compressed stream) in a cabinet.
#[derive(Clone, Debug)]
pub struct FolderEntry {
    index: usize,
    compression_type: CompressionType,
    num_data_blocks: u16,
    data_offset: u64,
}

impl<'a> Iterator for FolderEntries<'a> {
    type Item = &'a FolderEntry;

    fn next(&mut self) -> Option<&'a FolderEntry> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a> ExactSizeIterator for FolderEntries<'a> {}

impl FolderEntry {
    /// Returns this folder's (zero-based) index within its cabinet.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the scheme used to compress this folder's data.
    pub fn compression_type(&self) -> CompressionType {
        self.compression_type
    }

    /// Returns the number of data blocks used to store this folder's data.
    pub fn num_data_blocks(&self) -> u16 {
        self.num_data_blocks
    }

    /// Returns the absolute position, within the byte source, of this
    /// folder's first data block.
    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Returns an iterator over the entries, among `files`, whose data lives
    /// in this folder.
    pub fn file_entries<'a>(
        &self,
        files: &'a [FileEntry],
    ) -> impl Iterator<Item = &'a FileEntry> + 'a {
        let index = self.index;
        FileEntries { iter: files.iter() }
            .filter(move |file| file.folder_index() == index)
    }
}

/// Decodes one CFFOLDER record.  The data offset in the record is relative
/// to the start of the cabinet, which sits at `base_offset` in the source.
pub(crate) fn parse_folder_entry(
    buf: &[u8; consts::FOLDER_SIZE],
    index: usize,
    base_offset: u64,
) -> FolderEntry {
    let relative = LittleEndian::read_u32(&buf[consts::FOLDER_DATA_OFFSET..]);
    let num_data_blocks =
        LittleEndian::read_u16(&buf[consts::FOLDER_NUM_BLOCKS..]);
    let compression_bits =
        LittleEndian::read_u16(&buf[consts::FOLDER_COMPRESSION..]);
    FolderEntry {
        index,
        compression_type: CompressionType::from_bitfield(compression_bits),
        num_data_blocks,
        data_offset: base_offset + relative as u64,
    }
}
