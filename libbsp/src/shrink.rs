use std::borrow::Cow;
use std::fmt;

use log::{debug, info};

use crate::assemble::assemble;
use crate::error::Result;
use crate::game_lump;
use crate::header::{HEADER_LEN, Header};
use crate::layout::{LayoutPlan, Placement};
use crate::lump::{LUMP_COUNT, LUMP_GAME_LUMP, LumpWhitelist, lump_name};

#[derive(Debug)]
pub struct ShrinkOutput {
    pub data: Vec<u8>,
    pub report: ShrinkReport,
}

/// What a shrink kept and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrinkReport {
    pub input_len: usize,
    pub output_len: usize,
    pub map_revision: i32,
    /// Placements of the whitelisted lumps, in output order.
    pub retained: Vec<Placement>,
    /// Non-empty input lumps left out of the output.
    pub dropped: Vec<usize>,
    /// Version of the kept static prop sub-lump, `None` when the game lump
    /// was dropped for lack of static props.
    pub static_props_version: Option<u16>,
}

impl fmt::Display for ShrinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kept = self.retained.iter().filter(|p| p.length > 0).count();
        write!(
            f,
            "{} -> {} bytes, {kept} lumps kept, {} dropped",
            self.input_len,
            self.output_len,
            self.dropped.len()
        )
    }
}

/// Rewrites a map file so it holds only the lumps in `whitelist`.
///
/// The result depends only on directory-addressed content of `input`, so
/// shrinking an already shrunk file with the same whitelist is a no-op.
pub fn shrink(input: &[u8], whitelist: &LumpWhitelist) -> Result<ShrinkOutput> {
    let header = Header::decode(input)?;
    debug!(
        "map version {}, revision {}, {} bytes",
        header.preamble.version(),
        header.map_revision(),
        input.len()
    );

    let mut static_props_version = None;
    let mut payloads: Vec<Cow<'_, [u8]>> = Vec::with_capacity(whitelist.len());
    for &idx in whitelist.indices() {
        let range = header.lumps[idx].byte_range(idx, input.len())?;
        let data = &input[range];
        if idx != LUMP_GAME_LUMP {
            payloads.push(Cow::Borrowed(data));
            continue;
        }

        match game_lump::extract_static_props(data, input)? {
            Some(props) if !props.payload.is_empty() => {
                info!(
                    "keeping {} bytes of static props (version {})",
                    props.payload.len(),
                    props.version()
                );
                static_props_version = Some(props.version());
                payloads.push(Cow::Owned(game_lump::rebuild(&props)?));
            }
            _ => {
                info!("map has no static props, dropping the game lump");
                payloads.push(Cow::Borrowed(&[]));
            }
        }
    }

    let plan = LayoutPlan::new(
        whitelist.indices().iter().copied().zip(payloads.iter().map(|p| p.len())),
        HEADER_LEN,
    );
    let directory = plan.directory(&header.lumps)?;

    if let Some(pos) = whitelist.indices().iter().position(|&i| i == LUMP_GAME_LUMP) {
        if !payloads[pos].is_empty() {
            let offset = directory[LUMP_GAME_LUMP].offset;
            game_lump::patch_file_offset(payloads[pos].to_mut(), offset)?;
        }
    }

    let slices: Vec<&[u8]> = payloads.iter().map(|p| p.as_ref()).collect();
    let data = assemble(&header, &directory, &plan, &slices);

    let dropped: Vec<usize> = (0..LUMP_COUNT)
        .filter(|&idx| header.lumps[idx].length != 0 && !whitelist.contains(idx))
        .collect();
    for &idx in &dropped {
        debug!(
            "dropping lump {idx:2} {:<22} ({} bytes)",
            lump_name(idx),
            header.lumps[idx].length
        );
    }

    let report = ShrinkReport {
        input_len: input.len(),
        output_len: data.len(),
        map_revision: header.map_revision(),
        retained: plan.placements().to_vec(),
        dropped,
        static_props_version,
    };
    info!("shrunk map: {report}");
    Ok(ShrinkOutput { data, report })
}
