pub const FILE_SIGNATURE: &[u8; 4] = b"MSCF";

pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 3;

pub const MAX_STRING_SIZE: usize = 255;

// CFHEADER field offsets:
pub const HEADER_SIGNATURE: usize = 0x00;
pub const HEADER_CABINET_SIZE: usize = 0x08;
pub const HEADER_FILE_OFFSET: usize = 0x10;
pub const HEADER_MINOR_VERSION: usize = 0x18;
pub const HEADER_MAJOR_VERSION: usize = 0x19;
pub const HEADER_NUM_FOLDERS: usize = 0x1a;
pub const HEADER_NUM_FILES: usize = 0x1c;
pub const HEADER_FLAGS: usize = 0x1e;
pub const HEADER_SET_ID: usize = 0x20;
pub const HEADER_SET_INDEX: usize = 0x22;
pub const HEADER_SIZE: usize = 0x24;

// CFFOLDER field offsets:
pub const FOLDER_DATA_OFFSET: usize = 0x00;
pub const FOLDER_NUM_BLOCKS: usize = 0x04;
pub const FOLDER_COMPRESSION: usize = 0x06;
pub const FOLDER_SIZE: usize = 0x08;

// CFFILE field offsets:
pub const FILE_UNCOMPRESSED_SIZE: usize = 0x00;
pub const FILE_FOLDER_OFFSET: usize = 0x04;
pub const FILE_FOLDER_INDEX: usize = 0x08;
pub const FILE_DATE: usize = 0x0a;
pub const FILE_TIME: usize = 0x0c;
pub const FILE_ATTRIBUTES: usize = 0x0e;
pub const FILE_SIZE: usize = 0x10;

// CFDATA field offsets:
pub const DATA_CHECKSUM: usize = 0x00;
pub const DATA_COMPRESSED_SIZE: usize = 0x04;
pub const DATA_UNCOMPRESSED_SIZE: usize = 0x06;
pub const DATA_SIZE: usize = 0x08;

// Folder indices at or above this value mean the file continues from/into
// another cabinet in the set.
pub const FOLDER_INDEX_CONTINUED: u16 = 0xfffd;

// Uncompressed data blocks never exceed this size, and MSZIP never grows a
// block by more than a few bytes.
pub const BLOCK_MAX: usize = 0x8000;
pub const INPUT_MAX: usize = BLOCK_MAX + 12;

// Header flags:
pub const FLAG_PREV_CABINET: u16 = 0x1;
pub const FLAG_NEXT_CABINET: u16 = 0x2;
pub const FLAG_RESERVE_PRESENT: u16 = 0x4;

// File attributes:
pub const ATTR_READ_ONLY: u16 = 0x01;
pub const ATTR_HIDDEN: u16 = 0x02;
pub const ATTR_SYSTEM: u16 = 0x04;
pub const ATTR_ARCH: u16 = 0x20;
pub const ATTR_EXEC: u16 = 0x40;
pub const ATTR_NAME_IS_UTF: u16 = 0x80;
