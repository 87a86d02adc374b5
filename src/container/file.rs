use crate::{
    container::{check_magic, HeaderOffsets, MARKER, SIZE_FIELD_LEN},
    scan, Error, ErrorKind,
};
use log::debug;
use std::io::Write;

/// A save file whose database header has been located and validated
///
/// The container bytes are borrowed for the lifetime of the value and are
/// never modified. Edits produce a new buffer via [`SaveFile::reassemble`].
#[derive(Debug, Clone, Copy)]
pub struct SaveFile<'a> {
    data: &'a [u8],
    offsets: HeaderOffsets,
}

impl<'a> SaveFile<'a> {
    /// Checks the magic, finds the first database marker, and resolves the
    /// header that follows it.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, Error> {
        check_magic(data)?;
        let marker = scan::locate(data, MARKER)?;
        let offsets = HeaderOffsets::resolve(data, marker)?;
        debug!(
            "located database image (marker: {}, start: {}, len: {})",
            marker,
            offsets.blob_start(),
            offsets.blob_len()
        );
        Ok(SaveFile { data, offsets })
    }

    /// The full, original container
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The resolved header layout
    pub fn offsets(&self) -> &HeaderOffsets {
        &self.offsets
    }

    /// The embedded database image, borrowed from the container
    pub fn blob(&self) -> &'a [u8] {
        &self.data[self.offsets.blob_range()]
    }

    /// Returns an owned copy of the embedded database image
    pub fn extract(&self) -> Vec<u8> {
        self.blob().to_vec()
    }

    /// Writes the container with `blob` in place of the original database
    /// image
    pub fn write_with_blob<W>(&self, writer: W, blob: &[u8]) -> Result<(), Error>
    where
        W: Write,
    {
        write_container(writer, self.data, &self.offsets, blob)
    }

    /// Returns a new container with `blob` in place of the original database
    /// image
    pub fn reassemble(&self, blob: &[u8]) -> Result<Vec<u8>, Error> {
        reassemble(self.data, &self.offsets, blob)
    }
}

/// Builds a new container from `original` with `blob` substituted for the
/// blob described by `offsets`.
///
/// Output length is `original.len() + blob.len() - offsets.blob_len()`. Every
/// byte outside the two size fields and the blob is copied unchanged.
///
/// Fails with `TruncatedBlob` if `offsets` describe a blob that does not fit
/// inside `original`.
pub fn reassemble(original: &[u8], offsets: &HeaderOffsets, blob: &[u8]) -> Result<Vec<u8>, Error> {
    check_bounds(original, offsets)?;
    let len = original.len() - offsets.blob_len() + blob.len();
    let mut out = Vec::with_capacity(len);
    write_container(&mut out, original, offsets, blob)?;
    debug_assert_eq!(out.len(), len);
    Ok(out)
}

fn check_bounds(original: &[u8], offsets: &HeaderOffsets) -> Result<(), Error> {
    if offsets.tail_start() > original.len() {
        return Err(ErrorKind::TruncatedBlob {
            blob_start: offsets.blob_start(),
            blob_len: offsets.blob_len(),
            len: original.len(),
        }
        .into());
    }
    Ok(())
}

fn size_fields(blob: &[u8]) -> Result<(u32, u32), Error> {
    let too_large = || Error::new(ErrorKind::BlobTooLarge { len: blob.len() });
    let inner = u32::try_from(blob.len()).map_err(|_| too_large())?;
    let outer = inner
        .checked_add(SIZE_FIELD_LEN as u32)
        .ok_or_else(too_large)?;
    Ok((outer, inner))
}

fn write_container<W>(
    mut writer: W,
    original: &[u8],
    offsets: &HeaderOffsets,
    blob: &[u8],
) -> Result<(), Error>
where
    W: Write,
{
    check_bounds(original, offsets)?;
    let (outer, inner) = size_fields(blob)?;
    let write = |writer: &mut W, data: &[u8]| {
        writer
            .write_all(data)
            .map_err(|e| Error::new(ErrorKind::ReassemblyWrite(e)))
    };

    write(&mut writer, &original[..offsets.outer_size_field()])?;
    write(&mut writer, &outer.to_le_bytes())?;
    write(&mut writer, &original[offsets.middle()])?;
    write(&mut writer, &inner.to_le_bytes())?;
    write(&mut writer, blob)?;
    write(&mut writer, &original[offsets.tail_start()..])?;
    writer
        .flush()
        .map_err(|e| Error::new(ErrorKind::ReassemblyWrite(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MAGIC;
    use quickcheck_macros::quickcheck;

    fn container(prefix: &[u8], middle: &[u8; 22], blob: &[u8], tail: &[u8]) -> Vec<u8> {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(prefix);
        data.extend_from_slice(MARKER);
        data.extend_from_slice(&[0x11; 19]);
        data.extend_from_slice(&(blob.len() as u32 + 4).to_le_bytes());
        data.extend_from_slice(middle);
        data.extend_from_slice(&(blob.len() as u32).to_le_bytes());
        data.extend_from_slice(blob);
        data.extend_from_slice(tail);
        data
    }

    fn field(data: &[u8], at: usize) -> u32 {
        u32::from_le_bytes(data[at..at + 4].try_into().unwrap())
    }

    #[test]
    fn test_hello_scenario() {
        let data = container(b"padding", &[0x22; 22], b"HELLO", b"END");
        let save = SaveFile::from_slice(&data).unwrap();
        assert_eq!(save.blob(), b"HELLO");
        assert_eq!(save.offsets().outer_size(), 9);
        assert_eq!(save.offsets().inner_size(), 5);

        let out = save.reassemble(b"HI").unwrap();
        assert_eq!(out.len(), data.len() - 3);

        let offsets = save.offsets();
        assert_eq!(field(&out, offsets.outer_size_field()), 6);
        assert_eq!(field(&out, offsets.inner_size_field()), 2);
        assert_eq!(&out[offsets.blob_start()..offsets.blob_start() + 2], b"HI");
        assert!(out.ends_with(b"END"));

        let reparsed = SaveFile::from_slice(&out).unwrap();
        assert_eq!(reparsed.blob(), b"HI");
    }

    #[test]
    fn test_identity() {
        let data = container(b"", &[0x33; 22], b"some database", b"tail bytes");
        let save = SaveFile::from_slice(&data).unwrap();
        assert_eq!(save.reassemble(&save.extract()).unwrap(), data);
    }

    #[test]
    fn test_extract_is_owned() {
        let data = container(b"x", &[0; 22], b"abc", b"");
        let blob = {
            let save = SaveFile::from_slice(&data).unwrap();
            save.extract()
        };
        drop(data);
        assert_eq!(blob, b"abc");
    }

    #[test]
    fn test_grow_then_shrink() {
        let data = container(b"pre", &[0x44; 22], b"12345", b"TAIL");
        let save = SaveFile::from_slice(&data).unwrap();

        let grown = save.reassemble(&[b'g'; 300]).unwrap();
        let grown_save = SaveFile::from_slice(&grown).unwrap();
        assert_eq!(grown_save.blob(), &[b'g'; 300][..]);
        assert!(grown.ends_with(b"TAIL"));
        assert_eq!(grown.len(), data.len() + 295);

        let shrunk = grown_save.reassemble(b"s").unwrap();
        let shrunk_save = SaveFile::from_slice(&shrunk).unwrap();
        assert_eq!(shrunk_save.blob(), b"s");
        assert_eq!(&shrunk[shrunk_save.offsets().tail_start()..], b"TAIL");
        assert_eq!(shrunk.len(), data.len() - 4);
    }

    #[test]
    fn test_first_marker_wins() {
        let mut tail = MARKER.to_vec();
        tail.extend_from_slice(&[0xff; 80]);
        let data = container(b"", &[0; 22], b"first", &tail);
        let save = SaveFile::from_slice(&data).unwrap();
        assert_eq!(save.blob(), b"first");
        assert_eq!(save.reassemble(b"first").unwrap(), data);
    }

    #[test]
    fn test_invalid_magic_rejected_first() {
        let mut data = container(b"", &[0; 22], b"abc", b"");
        data[0] = b'X';
        let err = SaveFile::from_slice(&data).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidMagic { .. }));

        // A bad magic wins over a missing marker
        let err = SaveFile::from_slice(b"XXXX").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidMagic { .. }));
    }

    #[test]
    fn test_missing_marker() {
        let err = SaveFile::from_slice(b"GVAS\x02\x00\x00\x00 nothing to see").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MarkerNotFound));
    }

    #[test]
    fn test_write_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let data = container(b"", &[0; 22], b"abc", b"");
        let save = SaveFile::from_slice(&data).unwrap();
        let err = save.write_with_blob(Broken, b"xyz").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ReassemblyWrite(_)));
    }

    #[test]
    fn test_offsets_from_other_container() {
        let big = container(b"", &[0; 22], &[b'b'; 100], b"END");
        let small = container(b"", &[0; 22], b"ab", b"END");
        let offsets = SaveFile::from_slice(&big).unwrap().offsets;

        let err = reassemble(&small, &offsets, b"x").unwrap_err();
        match err.kind() {
            ErrorKind::TruncatedBlob {
                blob_start,
                blob_len,
                len,
            } => {
                assert_eq!(*blob_start, offsets.blob_start());
                assert_eq!(*blob_len, 100);
                assert_eq!(*len, small.len());
            }
            x => panic!("unexpected error: {:?}", x),
        }

        let mut out = Vec::new();
        let err = write_container(&mut out, &small, &offsets, b"x").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TruncatedBlob { .. }));
        assert!(out.is_empty());
    }

    #[quickcheck]
    fn identity_holds(prefix: Vec<u8>, blob: Vec<u8>, tail: Vec<u8>) -> bool {
        let data = container(&prefix, &[0x5a; 22], &blob, &tail);
        let Ok(save) = SaveFile::from_slice(&data) else {
            // prefix happened to contain the marker
            return true;
        };
        save.reassemble(&save.extract()).unwrap() == data
    }

    #[quickcheck]
    fn regions_preserved(prefix: Vec<u8>, blob: Vec<u8>, tail: Vec<u8>, replacement: Vec<u8>) -> bool {
        let data = container(&prefix, &[0xa5; 22], &blob, &tail);
        let Ok(save) = SaveFile::from_slice(&data) else {
            return true;
        };
        let offsets = save.offsets();
        let out = save.reassemble(&replacement).unwrap();
        let new_tail = offsets.blob_start() + replacement.len();

        out.len() == data.len() - offsets.blob_len() + replacement.len()
            && out[..offsets.outer_size_field()] == data[..offsets.outer_size_field()]
            && field(&out, offsets.outer_size_field()) as usize == replacement.len() + 4
            && out[offsets.middle()] == data[offsets.middle()]
            && field(&out, offsets.inner_size_field()) as usize == replacement.len()
            && out[offsets.blob_start()..new_tail] == replacement[..]
            && out[new_tail..] == data[offsets.tail_start()..]
    }
}
