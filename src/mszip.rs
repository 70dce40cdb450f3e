use std::mem;

use crate::consts;
use crate::error::Result;

const MSZIP_SIGNATURE: &[u8; 2] = b"CK";
const MSZIP_SIGNATURE_LEN: usize = 2;
const DEFLATE_MAX_DICT_LEN: usize = 0x8000;

/// Decodes a sequence of MSZIP data blocks belonging to one folder.  Each
/// block is a raw deflate stream that may refer back into the plaintext of
/// the block before it, so the previous block's output is kept and replayed
/// as the dictionary for the next one.
pub struct MsZipDecompressor {
    decompressor: flate2::Decompress,
    // Plaintext of the most recently decoded block.
    window: Vec<u8>,
    output: Vec<u8>,
    primer: Vec<u8>,
}

impl MsZipDecompressor {
    pub fn new() -> MsZipDecompressor {
        MsZipDecompressor {
            decompressor: flate2::Decompress::new(false),
            window: Vec::with_capacity(consts::BLOCK_MAX),
            output: Vec::with_capacity(consts::BLOCK_MAX),
            primer: Vec::with_capacity(DEFLATE_MAX_DICT_LEN + 5),
        }
    }

    /// Forgets the previous block, so that the next block is decoded without
    /// a dictionary (as the first block of a folder must be).
    pub fn reset(&mut self) {
        self.decompressor.reset(false);
        self.window.clear();
    }

    /// Returns the plaintext of the most recently decoded block.
    pub fn block(&self) -> &[u8] {
        &self.window
    }

    pub fn decompress_block(
        &mut self,
        data: &[u8],
        uncompressed_size: usize,
    ) -> Result<&[u8]> {
        if data.len() < MSZIP_SIGNATURE_LEN
            || &data[..MSZIP_SIGNATURE_LEN] != MSZIP_SIGNATURE
        {
            return data_format!(
                "MSZIP decompression failed: Invalid block signature"
            );
        }
        if uncompressed_size > consts::BLOCK_MAX {
            return data_format!(
                "MSZIP decompression failed: Block size {} exceeds maximum \
                 of {}",
                uncompressed_size,
                consts::BLOCK_MAX
            );
        }
        let data = &data[MSZIP_SIGNATURE_LEN..];
        self.decompressor.reset(false);
        if !self.window.is_empty() {
            self.load_dictionary()?;
        }
        self.output.clear();
        self.output.reserve(consts::BLOCK_MAX);
        let flush = flate2::FlushDecompress::Finish;
        if let Err(error) =
            self.decompressor.decompress_vec(data, &mut self.output, flush)
        {
            return data_format!("MSZIP decompression failed: {}", error);
        }
        if self.output.len() != uncompressed_size {
            return data_format!(
                "MSZIP decompression failed: Incorrect uncompressed size \
                 (expected {}, was actually {})",
                uncompressed_size,
                self.output.len()
            );
        }
        mem::swap(&mut self.window, &mut self.output);
        Ok(&self.window)
    }

    // Feeds the previous block through the decompressor as a stored deflate
    // block, which leaves it in the decompressor's history window.
    fn load_dictionary(&mut self) -> Result<()> {
        debug_assert!(self.window.len() <= DEFLATE_MAX_DICT_LEN);
        let length = self.window.len() as u16;
        self.primer.clear();
        self.primer.push(0);
        self.primer.extend_from_slice(&length.to_le_bytes());
        self.primer.extend_from_slice(&(!length).to_le_bytes());
        self.primer.extend_from_slice(&self.window);
        self.output.clear();
        self.output.reserve(consts::BLOCK_MAX);
        let flush = flate2::FlushDecompress::Sync;
        match self.decompressor.decompress_vec(
            &self.primer,
            &mut self.output,
            flush,
        ) {
            Ok(flate2::Status::Ok)
                if self.output.len() == self.window.len() =>
            {
                Ok(())
            }
            Ok(status) => data_format!(
                "MSZIP decompression failed: Could not load dictionary \
                 ({:?})",
                status
            ),
            Err(error) => data_format!(
                "MSZIP decompression failed: Could not load dictionary ({})",
                error
            ),
        }
    }
}

/// Compresses `data` into MSZIP blocks the way cabinet writers do: one
/// deflate compressor spans the whole folder, and every block but the last
/// is sync-flushed and closed with an empty final block.  A block that would
/// come out larger than storing it verbatim is written as a stored deflate
/// block instead.
#[cfg(test)]
pub(crate) fn compress_folder(data: &[u8]) -> Vec<(usize, Vec<u8>)> {
    let mut compressor =
        flate2::Compress::new(flate2::Compression::best(), false);
    let mut blocks = Vec::new();
    let mut chunks = data.chunks(consts::BLOCK_MAX).peekable();
    while let Some(chunk) = chunks.next() {
        let is_last_block = chunks.peek().is_none();
        let mut out = Vec::with_capacity(0xffff);
        out.extend_from_slice(MSZIP_SIGNATURE);
        let flush = if is_last_block {
            flate2::FlushCompress::Finish
        } else {
            flate2::FlushCompress::Sync
        };
        compressor.compress_vec(chunk, &mut out, flush).unwrap();
        if !is_last_block {
            out.extend_from_slice(b"\x03\x00");
        }
        let max_out_len = chunk.len() + 7;
        if out.len() > max_out_len {
            let length = chunk.len() as u16;
            out.clear();
            out.extend_from_slice(MSZIP_SIGNATURE);
            out.push(1);
            out.extend_from_slice(&length.to_le_bytes());
            out.extend_from_slice(&(!length).to_le_bytes());
            out.extend_from_slice(chunk);
            debug_assert_eq!(out.len(), max_out_len);
        }
        blocks.push((chunk.len(), out));
    }
    blocks
}
