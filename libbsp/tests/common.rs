use std::sync::Once;

use bytes::BufMut;
use libbsp::header::{HEADER_LEN, Header, LumpDirEntry};
use libbsp::lump::LUMP_COUNT;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .is_test(true)
            .init();
    });
}

pub const VBSP_21: [u8; 8] = *b"VBSP\x15\0\0\0";

enum LumpBody {
    Raw(Vec<u8>),
    /// Sub-lumps as `(tag, flags_version, payload)`.
    Game(Vec<(i32, i32, Vec<u8>)>),
}

/// Builds synthetic map files. Lumps are stored in insertion order with a
/// few junk bytes in front of each, so nothing is aligned on input.
pub struct MapBuilder {
    preamble: [u8; 8],
    map_revision: i32,
    lumps: Vec<(usize, i32, LumpBody)>,
}

#[allow(dead_code)]
impl MapBuilder {
    pub fn new() -> Self {
        MapBuilder {
            preamble: VBSP_21,
            map_revision: 4711,
            lumps: Vec::new(),
        }
    }

    pub fn preamble(mut self, preamble: [u8; 8]) -> Self {
        self.preamble = preamble;
        self
    }

    pub fn lump(mut self, idx: usize, version: i32, data: &[u8]) -> Self {
        self.lumps.push((idx, version, LumpBody::Raw(data.to_vec())));
        self
    }

    pub fn game_lump(mut self, version: i32, subs: &[(i32, i32, &[u8])]) -> Self {
        let subs = subs
            .iter()
            .map(|(tag, fv, data)| (*tag, *fv, data.to_vec()))
            .collect();
        self.lumps.push((35, version, LumpBody::Game(subs)));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut dir = [LumpDirEntry::default(); LUMP_COUNT];
        let mut body = Vec::new();

        for (n, (idx, version, lump)) in self.lumps.iter().enumerate() {
            body.put_bytes(0x5a, n % 7 + 1);
            let offset = HEADER_LEN + body.len();
            match lump {
                LumpBody::Raw(data) => body.put_slice(data),
                LumpBody::Game(subs) => {
                    let mut sub_offset = offset + 4 + subs.len() * 16;
                    body.put_i32_le(subs.len() as i32);
                    for (tag, fv, data) in subs {
                        body.put_i32_le(*tag);
                        body.put_i32_le(*fv);
                        body.put_i32_le(sub_offset as i32);
                        body.put_i32_le(data.len() as i32);
                        sub_offset += data.len();
                    }
                    for (_, _, data) in subs {
                        body.put_slice(data);
                    }
                }
            }
            dir[*idx] = LumpDirEntry {
                offset: offset as i32,
                length: (HEADER_LEN + body.len() - offset) as i32,
                version: *version,
                four_cc: 0,
            };
        }
        body.put_bytes(0x5a, 3);

        let mut out = Vec::with_capacity(HEADER_LEN + body.len());
        out.put_slice(&self.preamble);
        for entry in &dir {
            out.put_i32_le(entry.offset);
            out.put_i32_le(entry.length);
            out.put_i32_le(entry.version);
            out.put_i32_le(entry.four_cc);
        }
        out.put_i32_le(self.map_revision);
        out.put_u32_le(0xdead_beef);
        out.put_slice(&body);
        out
    }
}

#[allow(dead_code)]
pub fn directory(data: &[u8]) -> [LumpDirEntry; LUMP_COUNT] {
    Header::decode(data).unwrap().lumps
}

/// Bytes a directory entry points at.
#[allow(dead_code)]
pub fn lump_bytes(data: &[u8], idx: usize) -> &[u8] {
    let range = directory(data)[idx].byte_range(idx, data.len()).unwrap();
    &data[range]
}

#[allow(dead_code)]
pub fn set_entry(data: &mut [u8], idx: usize, entry: LumpDirEntry) {
    let mut field = &mut data[8 + idx * 16..8 + idx * 16 + 16];
    field.put_i32_le(entry.offset);
    field.put_i32_le(entry.length);
    field.put_i32_le(entry.version);
    field.put_i32_le(entry.four_cc);
}
