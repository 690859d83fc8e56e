//! Fixed BSP header: preamble, lump directory and map revision.
//!
//! ```text
//! offset  size  field
//!      0     8  preamble (identifier + format version)
//!      8  1024  lump directory, 64 x { offset, length, version, fourCC }
//!   1032     4  map revision
//!   1036     4  reserved, zero in files written here
//!   1040     -  lump payloads
//! ```
//!
//! Every integer is a little-endian `i32`.

use std::ops::Range;

use bytes::{Buf, BufMut};
use log::warn;

use crate::error::{BspError, Result};
use crate::lump::LUMP_COUNT;

pub const PREAMBLE_LEN: usize = 8;
pub const LUMP_ENTRY_LEN: usize = 16;
pub const DIRECTORY_OFFSET: usize = PREAMBLE_LEN;
pub const DIRECTORY_LEN: usize = LUMP_COUNT * LUMP_ENTRY_LEN;
pub const MAP_REVISION_OFFSET: usize = DIRECTORY_OFFSET + DIRECTORY_LEN;
pub const RESERVED_OFFSET: usize = MAP_REVISION_OFFSET + 4;
/// First byte after the header; lump payloads start here.
pub const HEADER_LEN: usize = RESERVED_OFFSET + 4;

/// Only version of the format the consumer is known to read.
pub const SUPPORTED_BSP_VERSION: u32 = 21;

const IDENT_LE: u32 = u32::from_le_bytes(*b"VBSP");
const IDENT_BE: u32 = u32::from_le_bytes(*b"PSBV");

/// The first 8 bytes of the file. Written back verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preamble([u8; PREAMBLE_LEN]);

impl Preamble {
    pub fn bytes(&self) -> &[u8; PREAMBLE_LEN] {
        &self.0
    }

    pub fn identifier(&self) -> u32 {
        (&self.0[..4]).get_u32_le()
    }

    pub fn version(&self) -> u32 {
        (&self.0[4..]).get_u32_le()
    }

    /// Rejects big-endian maps; anything else passes, unusual identifiers
    /// and versions only produce a warning.
    fn check(&self) -> Result<()> {
        match self.identifier() {
            IDENT_LE => {
                if self.version() != SUPPORTED_BSP_VERSION {
                    warn!(
                        "map format version {} differs from expected version {SUPPORTED_BSP_VERSION}",
                        self.version()
                    );
                }
                Ok(())
            }
            IDENT_BE => Err(BspError::Unsupported(
                "big-endian map files are not supported".to_string(),
            )),
            other => {
                warn!("unknown map identifier {other:#010x}, treating preamble as opaque");
                Ok(())
            }
        }
    }
}

/// One lump directory entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LumpDirEntry {
    pub offset: i32,
    pub length: i32,
    pub version: i32,
    /// Uncompressed size for compressed lumps, otherwise zero. Not interpreted.
    pub four_cc: i32,
}

impl LumpDirEntry {
    fn read_from(buf: &mut impl Buf) -> Self {
        LumpDirEntry {
            offset: buf.get_i32_le(),
            length: buf.get_i32_le(),
            version: buf.get_i32_le(),
            four_cc: buf.get_i32_le(),
        }
    }

    fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_i32_le(self.offset);
        buf.put_i32_le(self.length);
        buf.put_i32_le(self.version);
        buf.put_i32_le(self.four_cc);
    }

    /// Byte range of the lump within a file of `file_len` bytes.
    ///
    /// Zero-length lumps yield an empty range whatever their offset says.
    pub fn byte_range(&self, idx: usize, file_len: usize) -> Result<Range<usize>> {
        if self.length == 0 {
            return Ok(0..0);
        }
        let (Ok(start), Ok(len)) = (usize::try_from(self.offset), usize::try_from(self.length))
        else {
            return Err(BspError::malformed_lump(
                idx,
                format!("negative offset {} or length {}", self.offset, self.length),
            ));
        };
        match start.checked_add(len) {
            Some(end) if end <= file_len => Ok(start..end),
            _ => Err(BspError::malformed_lump(
                idx,
                format!("lump spans {start}+{len} bytes but the file has only {file_len}"),
            )),
        }
    }
}

/// Decoded header of a map file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub preamble: Preamble,
    pub lumps: [LumpDirEntry; LUMP_COUNT],
    pub map_revision: [u8; 4],
}

impl Header {
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(BspError::malformed(format!(
                "file is {} bytes, the header alone needs {HEADER_LEN}",
                data.len()
            )));
        }

        let mut preamble = [0u8; PREAMBLE_LEN];
        preamble.copy_from_slice(&data[..PREAMBLE_LEN]);
        let preamble = Preamble(preamble);
        preamble.check()?;

        let mut dir = &data[DIRECTORY_OFFSET..MAP_REVISION_OFFSET];
        let lumps = std::array::from_fn(|_| LumpDirEntry::read_from(&mut dir));

        let mut map_revision = [0u8; 4];
        map_revision.copy_from_slice(&data[MAP_REVISION_OFFSET..RESERVED_OFFSET]);

        Ok(Header {
            preamble,
            lumps,
            map_revision,
        })
    }

    /// Map revision as stored, interpreted for logging.
    pub fn map_revision(&self) -> i32 {
        i32::from_le_bytes(self.map_revision)
    }
}

/// Serializes a directory in index order.
pub fn encode_directory(lumps: &[LumpDirEntry; LUMP_COUNT], out: &mut impl BufMut) {
    for entry in lumps {
        entry.write_to(out);
    }
}
