use std::fmt;

/// An error that can occur when editing a save file
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Consume the error and return the specific type of error
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns the byte offset into the container that the error occurs (if available)
    pub fn offset(&self) -> Option<usize> {
        self.0.offset()
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// The first four bytes of the container are not the expected signature
    InvalidMagic { found: Vec<u8> },

    /// The database marker does not occur anywhere in the container
    MarkerNotFound,

    /// The container ends before the fixed header that follows the marker
    TruncatedHeader {
        marker_offset: usize,
        required: usize,
        len: usize,
    },

    /// The outer size field does not equal the inner size field plus four
    InconsistentSizeFields { offset: usize, outer: u32, inner: u32 },

    /// The container ends before the end of the blob announced by the inner size field
    TruncatedBlob {
        blob_start: usize,
        blob_len: usize,
        len: usize,
    },

    /// A replacement blob is too large to be described by a 32 bit size field
    BlobTooLarge { len: usize },

    /// Creating, writing, or reading back the staging file failed
    StagingIo(std::io::Error),

    /// The embedded database rejected an operation
    MutationEngine(rusqlite::Error),

    /// A statement that is expected to modify data touched zero rows
    RowNotUpdated { statement: &'static str },

    /// The appearance document could not be parsed or serialized
    Projection(serde_json::Error),

    /// Writing the reassembled container failed
    ReassemblyWrite(std::io::Error),
}

impl ErrorKind {
    pub fn offset(&self) -> Option<usize> {
        match *self {
            ErrorKind::InvalidMagic { .. } => Some(0),
            ErrorKind::TruncatedHeader { marker_offset, .. } => Some(marker_offset),
            ErrorKind::InconsistentSizeFields { offset, .. } => Some(offset),
            ErrorKind::TruncatedBlob { blob_start, .. } => Some(blob_start),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::StagingIo(ref err) => Some(err),
            ErrorKind::MutationEngine(ref err) => Some(err),
            ErrorKind::Projection(ref err) => Some(err),
            ErrorKind::ReassemblyWrite(ref err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::InvalidMagic { ref found } => {
                write!(f, "invalid save file magic (found: {:02x?})", found)
            }
            ErrorKind::MarkerNotFound => write!(f, "couldn't find the database image marker"),
            ErrorKind::TruncatedHeader {
                marker_offset,
                required,
                len,
            } => write!(
                f,
                "database header truncated (marker offset: {}, required length: {}, actual length: {})",
                marker_offset, required, len
            ),
            ErrorKind::InconsistentSizeFields {
                offset,
                outer,
                inner,
            } => write!(
                f,
                "inconsistent database size fields (offset: {}, outer: {}, inner: {}, expected outer: {})",
                offset,
                outer,
                inner,
                u64::from(inner) + 4
            ),
            ErrorKind::TruncatedBlob {
                blob_start,
                blob_len,
                len,
            } => write!(
                f,
                "database image truncated (start: {}, expected length: {}, available: {})",
                blob_start,
                blob_len,
                len.saturating_sub(blob_start)
            ),
            ErrorKind::BlobTooLarge { len } => {
                write!(f, "database image too large for size field ({} bytes)", len)
            }
            ErrorKind::StagingIo(ref err) => write!(f, "staging file error: {}", err),
            ErrorKind::MutationEngine(ref err) => write!(f, "database error: {}", err),
            ErrorKind::RowNotUpdated { statement } => {
                write!(f, "db row wasn't updated ({})", statement)
            }
            ErrorKind::Projection(ref err) => write!(f, "appearance json error: {}", err),
            ErrorKind::ReassemblyWrite(ref err) => write!(f, "unable to write save file: {}", err),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Error::new(ErrorKind::MutationEngine(error))
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::new(ErrorKind::Projection(error))
    }
}
