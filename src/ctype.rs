const CTYPE_MASK: u16 = 0x000f;
const CTYPE_NONE: u16 = 0;
const CTYPE_MSZIP: u16 = 1;

/// A scheme for compressing data within the cabinet.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum CompressionType {
    /// No compression.
    None,
    /// MSZIP compression.  MSZIP is described further in
    /// [MS-MCI](https://msdn.microsoft.com/en-us/library/cc483131.aspx).
    MsZip,
    /// Any other scheme (Quantum, LZX, or an undefined value), holding the
    /// raw compression-type field.
    Other(u16),
}

impl CompressionType {
    /// Decodes a folder's compression-type field.  Unknown schemes are kept
    /// as `Other` rather than rejected, so that a cabinet using them can
    /// still be listed.
    pub(crate) fn from_bitfield(bits: u16) -> CompressionType {
        match bits & CTYPE_MASK {
            CTYPE_NONE => CompressionType::None,
            CTYPE_MSZIP => CompressionType::MsZip,
            _ => CompressionType::Other(bits),
        }
    }
}
