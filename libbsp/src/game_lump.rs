//! Game lump codec.
//!
//! The game lump carries its own directory of tagged sub-lumps whose offsets
//! are absolute file offsets, so it must be rebuilt whenever the lump moves.
//! Only the static prop sub-lump is kept.

use bytes::{Buf, BufMut};

use crate::error::{BspError, Result};
use crate::lump::LUMP_GAME_LUMP;

/// Tag of the static prop sub-lump, the four-character code `sprp`.
pub const STATIC_PROPS_TAG: i32 = i32::from_be_bytes(*b"sprp");

const SUB_COUNT_LEN: usize = 4;
const SUB_ENTRY_LEN: usize = 16;
/// Position of the single sub-lump's file offset field in a rebuilt game lump.
pub const SUB_OFFSET_FIELD: usize = SUB_COUNT_LEN + 8;
/// Position of the single sub-lump's payload in a rebuilt game lump.
pub const SUB_PAYLOAD_DELTA: usize = SUB_COUNT_LEN + SUB_ENTRY_LEN;

/// One entry of the game lump directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubLumpEntry {
    pub id: i32,
    pub flags_version: i32,
    pub offset: i32,
    pub length: i32,
}

impl SubLumpEntry {
    pub fn flags(&self) -> u16 {
        (self.flags_version as u32 & 0xffff) as u16
    }

    pub fn version(&self) -> u16 {
        version_of(self.flags_version)
    }
}

/// Sub-lump retained from the game lump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticProps<'a> {
    pub flags_version: i32,
    pub payload: &'a [u8],
}

impl StaticProps<'_> {
    pub fn version(&self) -> u16 {
        version_of(self.flags_version)
    }
}

// Version lives in the high half of the combined field.
fn version_of(flags_version: i32) -> u16 {
    ((flags_version as u32) >> 16) as u16
}

/// Decodes the sub-lump directory of a game lump payload.
///
/// An empty payload has no sub-lumps.
pub fn decode_directory(game_lump: &[u8]) -> Result<Vec<SubLumpEntry>> {
    if game_lump.is_empty() {
        return Ok(Vec::new());
    }
    let mut buf = game_lump;
    if buf.remaining() < SUB_COUNT_LEN {
        return Err(BspError::malformed_lump(
            LUMP_GAME_LUMP,
            format!("{} bytes is too short for a sub-lump count", game_lump.len()),
        ));
    }
    let count = buf.get_i32_le();
    let Ok(count) = usize::try_from(count) else {
        return Err(BspError::malformed_lump(
            LUMP_GAME_LUMP,
            format!("negative sub-lump count {count}"),
        ));
    };
    if count > buf.remaining() / SUB_ENTRY_LEN {
        return Err(BspError::malformed_lump(
            LUMP_GAME_LUMP,
            format!(
                "sub-lump directory of {count} entries exceeds the {} byte lump",
                game_lump.len()
            ),
        ));
    }

    Ok((0..count)
        .map(|_| SubLumpEntry {
            id: buf.get_i32_le(),
            flags_version: buf.get_i32_le(),
            offset: buf.get_i32_le(),
            length: buf.get_i32_le(),
        })
        .collect())
}

/// Finds the static prop sub-lump and returns its payload, read from `file`
/// at the absolute offset its entry declares.
///
/// The first entry carrying the tag wins; later duplicates are ignored.
pub fn extract_static_props<'a>(
    game_lump: &[u8],
    file: &'a [u8],
) -> Result<Option<StaticProps<'a>>> {
    let Some(entry) = decode_directory(game_lump)?
        .into_iter()
        .find(|e| e.id == STATIC_PROPS_TAG)
    else {
        return Ok(None);
    };

    if entry.length == 0 {
        return Ok(Some(StaticProps {
            flags_version: entry.flags_version,
            payload: &[],
        }));
    }
    let (Ok(start), Ok(len)) = (usize::try_from(entry.offset), usize::try_from(entry.length))
    else {
        return Err(BspError::malformed_lump(
            LUMP_GAME_LUMP,
            format!(
                "static prop sub-lump has negative offset {} or length {}",
                entry.offset, entry.length
            ),
        ));
    };
    match start.checked_add(len) {
        Some(end) if end <= file.len() => Ok(Some(StaticProps {
            flags_version: entry.flags_version,
            payload: &file[start..end],
        })),
        _ => Err(BspError::malformed_lump(
            LUMP_GAME_LUMP,
            format!(
                "static prop sub-lump spans {start}+{len} bytes but the file has only {}",
                file.len()
            ),
        )),
    }
}

/// Builds a game lump holding only the static prop sub-lump.
///
/// The sub-lump offset is left zero until [`patch_file_offset`] knows where
/// the game lump lands.
pub fn rebuild(props: &StaticProps<'_>) -> Result<Vec<u8>> {
    let length = i32::try_from(props.payload.len()).map_err(|_| {
        BspError::malformed_lump(LUMP_GAME_LUMP, "static prop sub-lump exceeds 2 GiB")
    })?;
    let mut out = Vec::with_capacity(SUB_PAYLOAD_DELTA + props.payload.len());
    out.put_i32_le(1);
    out.put_i32_le(STATIC_PROPS_TAG);
    out.put_i32_le(props.flags_version);
    out.put_i32_le(0);
    out.put_i32_le(length);
    out.put_slice(props.payload);
    Ok(out)
}

/// Points the single sub-lump of a rebuilt game lump at its new absolute
/// position, given the game lump's own file offset.
pub fn patch_file_offset(rebuilt: &mut [u8], lump_offset: i32) -> Result<()> {
    let sub_offset = lump_offset
        .checked_add(SUB_PAYLOAD_DELTA as i32)
        .ok_or_else(|| {
            BspError::malformed_lump(LUMP_GAME_LUMP, "static prop offset overflows i32")
        })?;
    let Some(mut field) = rebuilt.get_mut(SUB_OFFSET_FIELD..SUB_OFFSET_FIELD + 4) else {
        return Err(BspError::malformed_lump(
            LUMP_GAME_LUMP,
            "rebuilt game lump is missing its directory",
        ));
    };
    field.put_i32_le(sub_offset);
    Ok(())
}
