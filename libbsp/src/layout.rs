//! Placement of retained lumps in the shrunk file.
//!
//! Lumps are laid out back to back in whitelist order starting right after the
//! header. Each lump starts on a 16 byte boundary and is followed by the zero
//! padding that reaches the next one, the last lump included.

use log::debug;

use crate::error::{BspError, Result};
use crate::header::LumpDirEntry;
use crate::lump::{LUMP_COUNT, lump_name};

pub const LUMP_ALIGNMENT: usize = 16;

/// Zero bytes needed after `len` bytes to reach the next aligned position.
pub fn pad16(len: usize) -> usize {
    (LUMP_ALIGNMENT - len % LUMP_ALIGNMENT) % LUMP_ALIGNMENT
}

/// Where one lump goes in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub index: usize,
    /// Zero for empty lumps.
    pub offset: usize,
    pub length: usize,
    pub padding: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    placements: Vec<Placement>,
    total_len: usize,
}

impl LayoutPlan {
    /// Lays out `(index, length)` pairs in the given order from `base`.
    pub fn new(lumps: impl IntoIterator<Item = (usize, usize)>, base: usize) -> Self {
        let mut cursor = base;
        let placements = lumps
            .into_iter()
            .map(|(index, length)| {
                let padding = pad16(length);
                let offset = if length == 0 { 0 } else { cursor };
                cursor += length + padding;
                debug!(
                    "lump {index:2} {:<22} -> offset {offset:>9} length {length:>9}",
                    lump_name(index)
                );
                Placement {
                    index,
                    offset,
                    length,
                    padding,
                }
            })
            .collect();
        LayoutPlan {
            placements,
            total_len: cursor,
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, index: usize) -> Option<&Placement> {
        self.placements.iter().find(|p| p.index == index)
    }

    /// Size of the whole output file, trailing padding included.
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// Builds the output directory. Placed lumps keep their version and
    /// fourCC from `original`; every other entry is zeroed.
    pub fn directory(
        &self,
        original: &[LumpDirEntry; LUMP_COUNT],
    ) -> Result<[LumpDirEntry; LUMP_COUNT]> {
        let mut dir = [LumpDirEntry::default(); LUMP_COUNT];
        for p in &self.placements {
            if p.index >= LUMP_COUNT {
                return Err(BspError::malformed(format!(
                    "lump index {} is outside the {LUMP_COUNT} entry directory",
                    p.index
                )));
            }
            dir[p.index] = LumpDirEntry {
                offset: to_i32(p.index, p.offset)?,
                length: to_i32(p.index, p.length)?,
                version: original[p.index].version,
                four_cc: original[p.index].four_cc,
            };
        }
        Ok(dir)
    }
}

fn to_i32(index: usize, value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        BspError::malformed_lump(index, format!("{value} does not fit a directory field"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad16() {
        assert_eq!(pad16(0), 0);
        assert_eq!(pad16(1), 15);
        assert_eq!(pad16(5), 11);
        assert_eq!(pad16(16), 0);
        assert_eq!(pad16(33), 15);
    }

    #[test]
    fn test_plan_follows_given_order() {
        let plan = LayoutPlan::new([(40, 20), (3, 16), (7, 1)], 1040);
        assert_eq!(
            plan.placements(),
            &[
                Placement {
                    index: 40,
                    offset: 1040,
                    length: 20,
                    padding: 12,
                },
                Placement {
                    index: 3,
                    offset: 1072,
                    length: 16,
                    padding: 0,
                },
                Placement {
                    index: 7,
                    offset: 1088,
                    length: 1,
                    padding: 15,
                },
            ]
        );
        assert_eq!(plan.total_len(), 1104);
    }

    #[test]
    fn test_empty_lumps_take_no_space() {
        let plan = LayoutPlan::new([(0, 0), (7, 5), (10, 0)], 1040);
        assert_eq!(plan.placement(0).unwrap().offset, 0);
        assert_eq!(plan.placement(7).unwrap().offset, 1040);
        assert_eq!(plan.placement(10).unwrap().offset, 0);
        assert_eq!(plan.total_len(), 1056);
    }

    #[test]
    fn test_offsets_are_aligned() {
        let lengths = [3usize, 17, 0, 64, 255, 1];
        let plan = LayoutPlan::new(lengths.iter().copied().enumerate(), 1040);
        for p in plan.placements() {
            assert_eq!(p.offset % LUMP_ALIGNMENT, 0, "lump {}", p.index);
        }
        let expected: usize = 1040 + lengths.iter().map(|&l| l + pad16(l)).sum::<usize>();
        assert_eq!(plan.total_len(), expected);
    }

    #[test]
    fn test_directory_keeps_version_and_zeroes_the_rest() {
        let mut original = [LumpDirEntry::default(); LUMP_COUNT];
        original[7] = LumpDirEntry {
            offset: 5000,
            length: 5,
            version: 1,
            four_cc: 0,
        };
        original[8] = LumpDirEntry {
            offset: 6000,
            length: 100,
            version: 3,
            four_cc: 77,
        };
        let plan = LayoutPlan::new([(7, 5)], 1040);
        let dir = plan.directory(&original).unwrap();
        assert_eq!(
            dir[7],
            LumpDirEntry {
                offset: 1040,
                length: 5,
                version: 1,
                four_cc: 0,
            }
        );
        assert_eq!(dir[8], LumpDirEntry::default());
    }

    #[test]
    fn test_directory_rejects_index_past_directory() {
        let original = [LumpDirEntry::default(); LUMP_COUNT];
        let plan = LayoutPlan::new([(7, 5), (LUMP_COUNT, 3)], 1040);
        let err = plan.directory(&original).unwrap_err();
        assert!(matches!(err, BspError::MalformedInput { lump: None, .. }));
    }
}
