use std::io::{Read, Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};

use crate::checksum::checksum;
use crate::consts;
use crate::ctype::CompressionType;
use crate::error::{Error, Result};
use crate::folder::FolderEntry;
use crate::mszip::MsZipDecompressor;

/// The part of a folder's decompressed stream that one request covers,
/// expressed in blocks.  `end_block` is the block holding the last byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct BlockRange {
    start_block: usize,
    start_in_block: usize,
    end_block: usize,
    end_in_block: usize,
}

impl BlockRange {
    // `length` must be non-zero.
    fn new(offset: u64, length: u64) -> BlockRange {
        let block_max = consts::BLOCK_MAX as u64;
        let last = offset + length - 1;
        BlockRange {
            start_block: (offset / block_max) as usize,
            start_in_block: (offset % block_max) as usize,
            end_block: (last / block_max) as usize,
            end_in_block: (last % block_max) as usize + 1,
        }
    }
}

/// Sequential decompression state for one folder at a time.  Blocks can only
/// be decoded in order, each using the previous one as its dictionary, so
/// moving backwards means starting over from the folder's first block.
pub(crate) struct FolderStream<R> {
    reader: R,
    folder: Option<usize>,
    // End of the last range copied out of the current folder.
    offset: u64,
    // Index of the block currently held by the decompressor.
    block: Option<usize>,
    compressed: Vec<u8>,
    decompressor: MsZipDecompressor,
}

impl<R: Read + Seek> FolderStream<R> {
    pub(crate) fn new(reader: R) -> FolderStream<R> {
        FolderStream {
            reader,
            folder: None,
            offset: 0,
            block: None,
            compressed: Vec::with_capacity(consts::INPUT_MAX),
            decompressor: MsZipDecompressor::new(),
        }
    }

    /// Returns the index of the currently selected folder, if any.
    pub(crate) fn folder(&self) -> Option<usize> {
        self.folder
    }

    /// Appends bytes `offset..offset + length` of `folder`'s decompressed
    /// stream to `out`.  On failure the stream is deselected, so the next
    /// request starts the folder over.
    pub(crate) fn read_range(
        &mut self,
        folder: &FolderEntry,
        offset: u64,
        length: u64,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        let result = self
            .select(folder, offset)
            .and_then(|()| self.copy_range(offset, length, out));
        if result.is_err() {
            self.folder = None;
        }
        result
    }

    fn select(&mut self, folder: &FolderEntry, offset: u64) -> Result<()> {
        let start_block = (offset / consts::BLOCK_MAX as u64) as usize;
        if self.folder == Some(folder.index())
            && offset >= self.offset
            && self.block.map_or(true, |block| block <= start_block)
        {
            return Ok(());
        }
        if folder.compression_type() != CompressionType::MsZip {
            return unsupported!(
                "Cannot decompress folder {} ({:?} compression)",
                folder.index(),
                folder.compression_type()
            );
        }
        match self.folder {
            Some(index) if index == folder.index() => debug!(
                "Restarting folder {} to reach offset {} (at {})",
                index, offset, self.offset
            ),
            _ => debug!("Selecting folder {}", folder.index()),
        }
        self.folder = None;
        self.reader
            .seek(SeekFrom::Start(folder.data_offset()))
            .map_err(Error::Seek)?;
        self.decompressor.reset();
        self.block = None;
        self.offset = 0;
        self.folder = Some(folder.index());
        Ok(())
    }

    fn copy_range(
        &mut self,
        offset: u64,
        length: u64,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        if length == 0 {
            return Ok(());
        }
        let range = BlockRange::new(offset, length);
        // Part of the range may lie in the block decoded for the last request.
        self.copy_block(&range, out)?;
        while self.block.map_or(true, |block| block < range.end_block) {
            self.next_block()?;
            self.copy_block(&range, out)?;
        }
        self.offset = offset + length;
        Ok(())
    }

    fn copy_block(&self, range: &BlockRange, out: &mut Vec<u8>) -> Result<()> {
        let block = match self.block {
            Some(block)
                if range.start_block <= block && block <= range.end_block =>
            {
                block
            }
            _ => return Ok(()),
        };
        let start =
            if block == range.start_block { range.start_in_block } else { 0 };
        let end = if block == range.end_block {
            range.end_in_block
        } else {
            consts::BLOCK_MAX
        };
        let data = self.decompressor.block();
        if end > data.len() {
            return data_format!(
                "Data block {} holds {} bytes, but {} are needed",
                block,
                data.len(),
                end
            );
        }
        out.extend_from_slice(&data[start..end]);
        Ok(())
    }

    fn next_block(&mut self) -> Result<()> {
        let index = self.block.map_or(0, |block| block + 1);
        let mut header = [0u8; consts::DATA_SIZE];
        self.reader.read_exact(&mut header).map_err(Error::Read)?;
        let stored_checksum =
            LittleEndian::read_u32(&header[consts::DATA_CHECKSUM..]);
        let compressed_size =
            LittleEndian::read_u16(&header[consts::DATA_COMPRESSED_SIZE..])
                as usize;
        let uncompressed_size =
            LittleEndian::read_u16(&header[consts::DATA_UNCOMPRESSED_SIZE..])
                as usize;
        if uncompressed_size > consts::BLOCK_MAX {
            return data_format!(
                "Data block {} is too large ({} bytes; max is {} bytes)",
                index,
                uncompressed_size,
                consts::BLOCK_MAX
            );
        }
        if compressed_size > consts::INPUT_MAX {
            return data_format!(
                "Data block {} has too much compressed data \
                 ({} bytes; max is {} bytes)",
                index,
                compressed_size,
                consts::INPUT_MAX
            );
        }
        self.compressed.resize(compressed_size, 0);
        self.reader.read_exact(&mut self.compressed).map_err(Error::Read)?;
        if stored_checksum != 0 {
            let actual = checksum(
                &header[consts::DATA_COMPRESSED_SIZE..],
                checksum(&self.compressed, 0),
            );
            if actual != stored_checksum {
                warn!("Bad checksum in data block {}", index);
                return Err(Error::Checksum {
                    block: index,
                    expected: stored_checksum,
                    actual,
                });
            }
        }
        self.decompressor
            .decompress_block(&self.compressed, uncompressed_size)?;
        debug!(
            "Decoded block {} ({} -> {} bytes)",
            index, compressed_size, uncompressed_size
        );
        self.block = Some(index);
        Ok(())
    }
}
