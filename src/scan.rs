use crate::{Error, ErrorKind};

/// Returns the index of the first occurrence of `needle` in `haystack`
#[inline]
pub fn find_first(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    memchr::memmem::find(haystack, needle)
}

/// Locates the first occurrence of `marker` within the container.
///
/// Later occurrences are ignored. Nothing after the marker is validated.
///
/// ```
/// use hlse::{locate, MARKER};
///
/// let mut data = b"GVAS...".to_vec();
/// data.extend_from_slice(MARKER);
/// assert_eq!(locate(&data, MARKER).unwrap(), 7);
/// ```
pub fn locate(container: &[u8], marker: &[u8]) -> Result<usize, Error> {
    find_first(container, marker).ok_or_else(|| Error::new(ErrorKind::MarkerNotFound))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(b"abcdef", b"cd", Some(2))]
    #[case(b"abcdef", b"abcdef", Some(0))]
    #[case(b"abcdef", b"abcdefg", None)]
    #[case(b"aXbXc", b"X", Some(1))]
    #[case(b"", b"a", None)]
    fn test_find_first(#[case] haystack: &[u8], #[case] needle: &[u8], #[case] expected: Option<usize>) {
        assert_eq!(find_first(haystack, needle), expected);
    }

    #[test]
    fn test_locate_first_of_many() {
        let data = b"..MARK..MARK..";
        assert_eq!(locate(data, b"MARK").unwrap(), 2);
    }

    #[test]
    fn test_locate_missing() {
        let err = locate(b"GVAS no marker here", b"MARK").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MarkerNotFound));
    }
}
