//! Shrinking of Source engine BSP map files.
//!
//! A map is cut down to the lumps one consumer parses: every other lump is
//! dropped, the game lump is reduced to its static props, and the survivors
//! are repacked after the header on 16 byte boundaries with a rewritten lump
//! directory. [`shrink`] is a pure transform over byte buffers; [`store`]
//! handles the file on disk.

pub mod assemble;
pub mod error;
pub mod game_lump;
pub mod header;
pub mod layout;
pub mod lump;
pub mod shrink;
pub mod store;

pub use error::{BspError, Result};
pub use lump::LumpWhitelist;
pub use shrink::{ShrinkOutput, ShrinkReport, shrink};
