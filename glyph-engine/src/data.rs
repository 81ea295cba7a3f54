//! Shared font data.

use std::{borrow::Borrow, fs::File, ops::Deref, path::Path, sync::Arc};

use crate::error::LibraryError;

#[derive(Debug)]
enum Bytes {
    Owned(Vec<u8>),
    Mapped(memmap2::Mmap),
}

/// Reference counted font file contents.
///
/// Cloning is cheap. The bytes are either owned or a memory mapped file.
#[derive(Clone, Debug)]
pub struct FontData(Arc<Bytes>);

impl FontData {
    /// Creates font data from owned bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::new(Bytes::Owned(bytes.into())))
    }

    /// Memory maps the file at `path`.
    pub fn map_file(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref();
        let io_error = |e: std::io::Error| LibraryError::Io {
            path: path.to_owned(),
            reason: e.to_string(),
        };
        let file = File::open(path).map_err(io_error)?;
        // Safety: the mapping is read only. Modifying the file while it is
        // mapped is not supported.
        let map = unsafe { memmap2::Mmap::map(&file) }.map_err(io_error)?;
        Ok(Self(Arc::new(Bytes::Mapped(map))))
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self.0.as_ref() {
            Bytes::Owned(bytes) => bytes,
            Bytes::Mapped(map) => map,
        }
    }
}

impl From<Vec<u8>> for FontData {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl From<&[u8]> for FontData {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl Deref for FontData {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for FontData {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Borrow<[u8]> for FontData {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_bytes() {
        let data = FontData::new(vec![1, 2, 3]);
        let clone = data.clone();
        assert_eq!(&*clone, &[1, 2, 3]);
        assert_eq!(data.as_bytes(), clone.as_bytes());
    }

    #[test]
    fn missing_file() {
        let err = FontData::map_file("/this/path/does/not/exist.ttf").unwrap_err();
        assert!(matches!(err, LibraryError::Io { .. }));
    }
}
