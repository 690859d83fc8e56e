use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bspshrink",
    version,
    about = "Shrink a CS:GO map file down to the lumps DZSimulator reads",
    long_about = "Shrink a CS:GO map file down to the lumps DZSimulator reads.\n\n\
        The file is rewritten in place. Remove unneeded packed files from the map \
        before shrinking it: a shrunk map can no longer be opened by the game or by \
        pakfile editing tools."
)]
pub struct Cli {
    /// Map file (.bsp) to shrink in place
    #[arg(value_name = "MAP_FILE")]
    pub map: PathBuf,
}
