use crate::{Error, ErrorKind};
use std::ops::Range;

/// Signature found in the first four bytes of every save file
pub const MAGIC: [u8; 4] = *b"GVAS";

/// Name of the property that holds the embedded database image
pub const MARKER: &[u8] = b"RawDatabaseImage";

const OUTER_SIZE_DISPLACEMENT: usize = 35;
const MIDDLE_START_DISPLACEMENT: usize = 39;
const INNER_SIZE_DISPLACEMENT: usize = 61;
const BLOB_START_DISPLACEMENT: usize = 65;

/// Size in bytes of each of the two length fields
pub const SIZE_FIELD_LEN: usize = 4;

/// Verifies that the container begins with [`MAGIC`]
pub fn check_magic(container: &[u8]) -> Result<(), Error> {
    match container.first_chunk::<4>() {
        Some(head) if *head == MAGIC => Ok(()),
        _ => Err(ErrorKind::InvalidMagic {
            found: container.iter().take(MAGIC.len()).copied().collect(),
        }
        .into()),
    }
}

#[inline]
fn read_le_u32(data: &[u8], at: usize) -> u32 {
    let mut buf = [0u8; SIZE_FIELD_LEN];
    buf.copy_from_slice(&data[at..at + SIZE_FIELD_LEN]);
    u32::from_le_bytes(buf)
}

/// Positions of the database header fields, derived from the marker offset
///
/// Every value is an absolute offset into the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderOffsets {
    marker: usize,
    outer_size: u32,
    inner_size: u32,
}

impl HeaderOffsets {
    /// Computes the header layout for a marker found at `marker_offset` and
    /// validates it against the container.
    pub fn resolve(container: &[u8], marker_offset: usize) -> Result<Self, Error> {
        let required = marker_offset.saturating_add(BLOB_START_DISPLACEMENT);
        if required > container.len() {
            return Err(ErrorKind::TruncatedHeader {
                marker_offset,
                required,
                len: container.len(),
            }
            .into());
        }

        let outer_size = read_le_u32(container, marker_offset + OUTER_SIZE_DISPLACEMENT);
        let inner_size = read_le_u32(container, marker_offset + INNER_SIZE_DISPLACEMENT);
        if u64::from(outer_size) != u64::from(inner_size) + SIZE_FIELD_LEN as u64 {
            return Err(ErrorKind::InconsistentSizeFields {
                offset: marker_offset + OUTER_SIZE_DISPLACEMENT,
                outer: outer_size,
                inner: inner_size,
            }
            .into());
        }

        let offsets = HeaderOffsets {
            marker: marker_offset,
            outer_size,
            inner_size,
        };

        let available = container.len() - offsets.blob_start();
        if offsets.blob_len() > available {
            return Err(ErrorKind::TruncatedBlob {
                blob_start: offsets.blob_start(),
                blob_len: offsets.blob_len(),
                len: container.len(),
            }
            .into());
        }

        Ok(offsets)
    }

    /// Offset of the first byte of the marker
    pub fn marker(&self) -> usize {
        self.marker
    }

    /// Offset of the outer size field
    pub fn outer_size_field(&self) -> usize {
        self.marker + OUTER_SIZE_DISPLACEMENT
    }

    /// The opaque segment between the two size fields
    pub fn middle(&self) -> Range<usize> {
        self.marker + MIDDLE_START_DISPLACEMENT..self.inner_size_field()
    }

    /// Offset of the inner size field
    pub fn inner_size_field(&self) -> usize {
        self.marker + INNER_SIZE_DISPLACEMENT
    }

    /// Offset of the first blob byte
    pub fn blob_start(&self) -> usize {
        self.marker + BLOB_START_DISPLACEMENT
    }

    /// Length of the blob as declared by the inner size field
    pub fn blob_len(&self) -> usize {
        self.inner_size as usize
    }

    /// Byte range occupied by the blob
    pub fn blob_range(&self) -> Range<usize> {
        self.blob_start()..self.tail_start()
    }

    /// Offset of the first byte after the blob
    pub fn tail_start(&self) -> usize {
        self.blob_start() + self.blob_len()
    }

    /// Value stored in the outer size field
    pub fn outer_size(&self) -> u32 {
        self.outer_size
    }

    /// Value stored in the inner size field
    pub fn inner_size(&self) -> u32 {
        self.inner_size
    }
}
