//! Locate and replace the database image embedded in a save file.
//!
//! A save file is a GVAS container. Somewhere inside it, a property named
//! `RawDatabaseImage` holds an SQLite database as a length-prefixed byte
//! array. Everything else in the container is opaque and must survive an
//! edit byte for byte.
//!
//! ```text
//! offset (m = marker start)   contents
//! 0                           "GVAS"
//! ...                         opaque
//! m                           "RawDatabaseImage"
//! m + 16                      opaque
//! m + 35                      outer size (u32 LE) = inner size + 4
//! m + 39                      opaque, 22 bytes
//! m + 61                      inner size (u32 LE) = blob length
//! m + 65                      blob
//! m + 65 + inner size         tail, opaque
//! ```
//!
//! [`SaveFile`] validates the layout once and keeps the resulting
//! [`HeaderOffsets`] so that extraction and reassembly agree on every
//! position.

mod file;
mod header;

pub use file::*;
pub use header::*;
