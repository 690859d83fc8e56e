//! Serialization of the shrunk file.

use bytes::BufMut;

use crate::header::{Header, LumpDirEntry, encode_directory};
use crate::layout::LayoutPlan;
use crate::lump::LUMP_COUNT;

/// Writes header, `directory` and the payloads of `plan` into one buffer.
///
/// `payloads` holds one entry per placement, in plan order.
pub fn assemble(
    header: &Header,
    directory: &[LumpDirEntry; LUMP_COUNT],
    plan: &LayoutPlan,
    payloads: &[&[u8]],
) -> Vec<u8> {
    debug_assert_eq!(plan.placements().len(), payloads.len());

    let mut out = Vec::with_capacity(plan.total_len());
    out.put_slice(header.preamble.bytes());
    encode_directory(directory, &mut out);
    out.put_slice(&header.map_revision);
    out.put_i32_le(0);

    for (p, payload) in plan.placements().iter().zip(payloads) {
        debug_assert_eq!(p.length, payload.len());
        debug_assert!(p.length == 0 || p.offset == out.len());
        out.put_slice(payload);
        out.put_bytes(0, p.padding);
    }
    out
}
