//! Lump indices of the Source engine BSP format (version 21) and the
//! whitelists that select which of them survive a shrink.

use std::borrow::Cow;
use std::fmt;

use crate::error::{BspError, Result};

/// Number of entries in the lump directory.
pub const LUMP_COUNT: usize = 64;

pub const LUMP_ENTITIES: usize = 0;
pub const LUMP_PLANES: usize = 1;
pub const LUMP_TEXDATA: usize = 2;
pub const LUMP_VERTEXES: usize = 3;
pub const LUMP_NODES: usize = 5;
pub const LUMP_TEXINFO: usize = 6;
pub const LUMP_FACES: usize = 7;
pub const LUMP_LEAFS: usize = 10;
pub const LUMP_EDGES: usize = 12;
pub const LUMP_SURFEDGES: usize = 13;
pub const LUMP_MODELS: usize = 14;
pub const LUMP_LEAFBRUSHES: usize = 17;
pub const LUMP_BRUSHES: usize = 18;
pub const LUMP_BRUSHSIDES: usize = 19;
pub const LUMP_DISPINFO: usize = 26;
pub const LUMP_DISP_VERTS: usize = 33;
/// The lump whose payload is itself a directory of tagged sub-lumps.
pub const LUMP_GAME_LUMP: usize = 35;
/// Embedded zip archive, copied through untouched.
pub const LUMP_PAKFILE: usize = 40;
pub const LUMP_TEXDATA_STRING_DATA: usize = 43;
pub const LUMP_TEXDATA_STRING_TABLE: usize = 44;

const LUMP_NAMES: [&str; LUMP_COUNT] = [
    "ENTITIES",
    "PLANES",
    "TEXDATA",
    "VERTEXES",
    "VISIBILITY",
    "NODES",
    "TEXINFO",
    "FACES",
    "LIGHTING",
    "OCCLUSION",
    "LEAFS",
    "FACEIDS",
    "EDGES",
    "SURFEDGES",
    "MODELS",
    "WORLDLIGHTS",
    "LEAFFACES",
    "LEAFBRUSHES",
    "BRUSHES",
    "BRUSHSIDES",
    "AREAS",
    "AREAPORTALS",
    "PROPCOLLISION",
    "PROPHULLS",
    "PROPHULLVERTS",
    "PROPTRIS",
    "DISPINFO",
    "ORIGINALFACES",
    "PHYSDISP",
    "PHYSCOLLIDE",
    "VERTNORMALS",
    "VERTNORMALINDICES",
    "DISP_LIGHTMAP_ALPHAS",
    "DISP_VERTS",
    "DISP_LIGHTMAP_SAMPLE_POSITIONS",
    "GAME_LUMP",
    "LEAFWATERDATA",
    "PRIMITIVES",
    "PRIMVERTS",
    "PRIMINDICES",
    "PAKFILE",
    "CLIPPORTALVERTS",
    "CUBEMAPS",
    "TEXDATA_STRING_DATA",
    "TEXDATA_STRING_TABLE",
    "OVERLAYS",
    "LEAFMINDISTTOWATER",
    "FACE_MACRO_TEXTURE_INFO",
    "DISP_TRIS",
    "PROP_BLOB",
    "WATEROVERLAYS",
    "LEAF_AMBIENT_INDEX_HDR",
    "LEAF_AMBIENT_INDEX",
    "LIGHTING_HDR",
    "WORLDLIGHTS_HDR",
    "LEAF_AMBIENT_LIGHTING_HDR",
    "LEAF_AMBIENT_LIGHTING",
    "XZIPPAKFILE",
    "FACES_HDR",
    "MAP_FLAGS",
    "OVERLAY_FADES",
    "OVERLAY_SYSTEM_LEVELS",
    "PHYSLEVEL",
    "DISP_MULTIBLEND",
];

/// Human readable name of a lump index, `"UNKNOWN"` past the directory.
pub fn lump_name(idx: usize) -> &'static str {
    LUMP_NAMES.get(idx).copied().unwrap_or("UNKNOWN")
}

/// Ordered set of lump indices a consumer parses.
///
/// The order is the order the lumps are laid out in the shrunk file. A
/// whitelist must track the consumer's parser exactly: a lump the consumer
/// reads but the whitelist omits is silently dropped from the output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumpWhitelist {
    indices: Cow<'static, [usize]>,
}

impl LumpWhitelist {
    /// Lumps read by DZSimulator 0.0.4. Only static props are used from the
    /// game lump.
    pub const DZSIMULATOR: LumpWhitelist = LumpWhitelist::from_static(&[
        LUMP_ENTITIES,
        LUMP_PLANES,
        LUMP_TEXDATA,
        LUMP_VERTEXES,
        LUMP_NODES,
        LUMP_TEXINFO,
        LUMP_FACES,
        LUMP_LEAFS,
        LUMP_EDGES,
        LUMP_SURFEDGES,
        LUMP_MODELS,
        LUMP_LEAFBRUSHES,
        LUMP_BRUSHES,
        LUMP_BRUSHSIDES,
        LUMP_DISPINFO,
        LUMP_DISP_VERTS,
        LUMP_GAME_LUMP,
        LUMP_PAKFILE,
        LUMP_TEXDATA_STRING_DATA,
        LUMP_TEXDATA_STRING_TABLE,
    ]);

    /// Builds a whitelist from a compile-time list. Invalid lists fail to
    /// compile when used in a `const` item.
    pub const fn from_static(indices: &'static [usize]) -> Self {
        let mut i = 0;
        while i < indices.len() {
            assert!(indices[i] < LUMP_COUNT, "lump index out of range");
            let mut j = i + 1;
            while j < indices.len() {
                assert!(indices[i] != indices[j], "duplicate lump index");
                j += 1;
            }
            i += 1;
        }
        LumpWhitelist {
            indices: Cow::Borrowed(indices),
        }
    }

    pub fn new(indices: impl Into<Vec<usize>>) -> Result<Self> {
        let indices = indices.into();
        let mut seen = [false; LUMP_COUNT];
        for &idx in &indices {
            if idx >= LUMP_COUNT {
                return Err(BspError::InvalidWhitelist(format!(
                    "lump index {idx} is out of range (directory has {LUMP_COUNT} entries)"
                )));
            }
            if seen[idx] {
                return Err(BspError::InvalidWhitelist(format!(
                    "lump index {idx} ({}) is listed twice",
                    lump_name(idx)
                )));
            }
            seen[idx] = true;
        }
        Ok(LumpWhitelist {
            indices: Cow::Owned(indices),
        })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.indices.contains(&idx)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl fmt::Display for LumpWhitelist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.indices.iter().map(|&idx| lump_name(idx)).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dzsimulator_profile() {
        let wl = LumpWhitelist::DZSIMULATOR;
        assert_eq!(
            wl.indices(),
            &[0, 1, 2, 3, 5, 6, 7, 10, 12, 13, 14, 17, 18, 19, 26, 33, 35, 40, 43, 44]
        );
        assert!(wl.contains(LUMP_GAME_LUMP));
        assert!(!wl.contains(4));
    }

    #[test]
    fn test_new_keeps_order() {
        let wl = LumpWhitelist::new(vec![40, 7, 0]).unwrap();
        assert_eq!(wl.indices(), &[40, 7, 0]);
        assert_eq!(wl.to_string(), "[PAKFILE, FACES, ENTITIES]");
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        let err = LumpWhitelist::new(vec![1, 64]).unwrap_err();
        assert!(matches!(err, BspError::InvalidWhitelist(_)));
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let err = LumpWhitelist::new(vec![3, 5, 3]).unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn test_lump_names() {
        assert_eq!(lump_name(LUMP_GAME_LUMP), "GAME_LUMP");
        assert_eq!(lump_name(LUMP_PAKFILE), "PAKFILE");
        assert_eq!(lump_name(63), "DISP_MULTIBLEND");
        assert_eq!(lump_name(64), "UNKNOWN");
    }
}
