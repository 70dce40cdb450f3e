#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use rand::{RngCore, SeedableRng};

// ========================================================================= //

pub const BLOCK_SIZE: usize = 0x8000;

pub const COMPRESSION_NONE: u16 = 0;
pub const COMPRESSION_MSZIP: u16 = 1;

const HEADER_SIZE: usize = 0x24;
const FOLDER_SIZE: usize = 0x08;
const FILE_SIZE: usize = 0x10;
const DATA_SIZE: usize = 0x08;

// 2018-01-06 15:19:42
pub const SAMPLE_DATE: u16 = 0x4c26;
pub const SAMPLE_TIME: u16 = 0x7a75;

// ========================================================================= //

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn lorem_ipsum(words: usize) -> Vec<u8> {
    lipsum::lipsum(words).into_bytes()
}

pub fn random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0u8; size];
    rand::rngs::SmallRng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}

// ========================================================================= //

pub struct TestFile {
    pub name: String,
    pub data: Vec<u8>,
    pub attributes: u16,
    pub date: u16,
    pub time: u16,
}

pub struct TestFolder {
    pub compression: u16,
    pub files: Vec<TestFile>,
}

/// Writes cabinets for tests: a header, one record per folder and file, and
/// MSZIP data blocks with valid checksums.
pub struct TestCabinet {
    pub folders: Vec<TestFolder>,
    pub set_id: u16,
}

/// A written cabinet, along with where each data block header landed.
pub struct WrittenCabinet {
    pub bytes: Vec<u8>,
    /// `block_offsets[folder][block]` is the position of that block's
    /// 8-byte header within `bytes`.
    pub block_offsets: Vec<Vec<usize>>,
    /// Position of the first file record within `bytes`.
    pub file_table_offset: usize,
}

impl TestCabinet {
    pub fn new() -> TestCabinet {
        TestCabinet { folders: Vec::new(), set_id: 0x1234 }
    }

    pub fn add_folder(&mut self) -> &mut TestFolder {
        self.add_folder_with(COMPRESSION_MSZIP)
    }

    pub fn add_folder_with(&mut self, compression: u16) -> &mut TestFolder {
        self.folders.push(TestFolder { compression, files: Vec::new() });
        self.folders.last_mut().unwrap()
    }

    pub fn write(&self) -> WrittenCabinet {
        let file_table_offset = HEADER_SIZE + FOLDER_SIZE * self.folders.len();
        let file_table_size: usize = self
            .folders
            .iter()
            .flat_map(|folder| folder.files.iter())
            .map(|file| FILE_SIZE + file.name.len() + 1)
            .sum();
        let num_files: usize =
            self.folders.iter().map(|folder| folder.files.len()).sum();

        let mut data_area = Vec::new();
        let mut data_offsets = Vec::new();
        let mut block_offsets = Vec::new();
        let data_start = file_table_offset + file_table_size;
        for folder in self.folders.iter() {
            let plaintext: Vec<u8> = folder
                .files
                .iter()
                .flat_map(|file| file.data.iter().copied())
                .collect();
            data_offsets.push(data_start + data_area.len());
            let mut offsets = Vec::new();
            for (uncompressed, compressed) in
                compress_blocks(&plaintext, folder.compression)
            {
                offsets.push(data_start + data_area.len());
                write_data_block(&mut data_area, uncompressed, &compressed);
            }
            block_offsets.push(offsets);
        }

        let total_size = data_start + data_area.len();
        let mut bytes = Vec::with_capacity(total_size);
        bytes.extend_from_slice(b"MSCF");
        bytes.write_u32::<LittleEndian>(0).unwrap();
        bytes.write_u32::<LittleEndian>(total_size as u32).unwrap();
        bytes.write_u32::<LittleEndian>(0).unwrap();
        bytes.write_u32::<LittleEndian>(file_table_offset as u32).unwrap();
        bytes.write_u32::<LittleEndian>(0).unwrap();
        bytes.write_u8(3).unwrap();
        bytes.write_u8(1).unwrap();
        bytes.write_u16::<LittleEndian>(self.folders.len() as u16).unwrap();
        bytes.write_u16::<LittleEndian>(num_files as u16).unwrap();
        bytes.write_u16::<LittleEndian>(0).unwrap();
        bytes.write_u16::<LittleEndian>(self.set_id).unwrap();
        bytes.write_u16::<LittleEndian>(0).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);

        for (folder, (data_offset, blocks)) in self
            .folders
            .iter()
            .zip(data_offsets.iter().zip(block_offsets.iter()))
        {
            bytes.write_u32::<LittleEndian>(*data_offset as u32).unwrap();
            bytes.write_u16::<LittleEndian>(blocks.len() as u16).unwrap();
            bytes.write_u16::<LittleEndian>(folder.compression).unwrap();
        }
        assert_eq!(bytes.len(), file_table_offset);

        for (index, folder) in self.folders.iter().enumerate() {
            let mut offset = 0u32;
            for file in folder.files.iter() {
                let size = file.data.len() as u32;
                bytes.write_u32::<LittleEndian>(size).unwrap();
                bytes.write_u32::<LittleEndian>(offset).unwrap();
                bytes.write_u16::<LittleEndian>(index as u16).unwrap();
                bytes.write_u16::<LittleEndian>(file.date).unwrap();
                bytes.write_u16::<LittleEndian>(file.time).unwrap();
                bytes.write_u16::<LittleEndian>(file.attributes).unwrap();
                bytes.extend_from_slice(file.name.as_bytes());
                bytes.push(0);
                offset += file.data.len() as u32;
            }
        }
        assert_eq!(bytes.len(), data_start);

        bytes.extend_from_slice(&data_area);
        WrittenCabinet { bytes, block_offsets, file_table_offset }
    }
}

impl TestFolder {
    pub fn add_file<D: Into<Vec<u8>>>(
        &mut self,
        name: &str,
        data: D,
    ) -> &mut TestFile {
        self.files.push(TestFile {
            name: name.to_string(),
            data: data.into(),
            attributes: 0x20,
            date: SAMPLE_DATE,
            time: SAMPLE_TIME,
        });
        self.files.last_mut().unwrap()
    }
}

// ========================================================================= //

/// The CAB data-block checksum, written out independently of the crate's.
pub fn block_checksum(data: &[u8], seed: u32) -> u32 {
    let mut sum = seed;
    let mut index = 0;
    while index + 4 <= data.len() {
        sum ^= (data[index] as u32)
            | (data[index + 1] as u32) << 8
            | (data[index + 2] as u32) << 16
            | (data[index + 3] as u32) << 24;
        index += 4;
    }
    let mut tail = 0u32;
    for &byte in &data[index..] {
        tail = (tail << 8) | byte as u32;
    }
    sum ^ tail
}

fn write_data_block(
    out: &mut Vec<u8>,
    uncompressed: usize,
    compressed: &[u8],
) {
    let mut sizes = Vec::with_capacity(4);
    sizes.write_u16::<LittleEndian>(compressed.len() as u16).unwrap();
    sizes.write_u16::<LittleEndian>(uncompressed as u16).unwrap();
    let checksum = block_checksum(&sizes, block_checksum(compressed, 0));
    out.write_u32::<LittleEndian>(checksum).unwrap();
    out.extend_from_slice(&sizes);
    out.extend_from_slice(compressed);
}

// One deflate compressor spans the folder; every block but the last is
// sync-flushed and closed with an empty final block, as cabinet writers do.
fn compress_blocks(data: &[u8], compression: u16) -> Vec<(usize, Vec<u8>)> {
    if compression != COMPRESSION_MSZIP {
        return data
            .chunks(BLOCK_SIZE)
            .map(|chunk| (chunk.len(), chunk.to_vec()))
            .collect();
    }
    let mut compressor = flate2::Compress::new(Compression::best(), false);
    let chunks: Vec<&[u8]> = data.chunks(BLOCK_SIZE).collect();
    let mut blocks = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let is_last_block = index + 1 == chunks.len();
        let mut block = Vec::with_capacity(0xffff);
        block.extend_from_slice(b"CK");
        let flush = if is_last_block {
            flate2::FlushCompress::Finish
        } else {
            flate2::FlushCompress::Sync
        };
        compressor.compress_vec(chunk, &mut block, flush).unwrap();
        if !is_last_block {
            block.extend_from_slice(b"\x03\x00");
        }
        // Incompressible data is written as a stored deflate block.
        let max_block_len = chunk.len() + 7;
        if block.len() > max_block_len {
            let length = chunk.len() as u16;
            block.clear();
            block.extend_from_slice(b"CK\x01");
            block.write_u16::<LittleEndian>(length).unwrap();
            block.write_u16::<LittleEndian>(!length).unwrap();
            block.extend_from_slice(chunk);
            debug_assert_eq!(block.len(), max_block_len);
        }
        blocks.push((chunk.len(), block));
    }
    blocks
}

// ========================================================================= //
