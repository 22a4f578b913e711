use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Deref;
use std::path::Path;
use tracing::{debug, trace};

use crate::errors::{SearchError, SearchResult};

const BUFFER_CAPACITY: usize = 65536;
pub(crate) const MMAP_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// The whole content of the target binary.
///
/// Loaded once before a run and only ever handed out as `&[u8]`, so every
/// worker reads the same bytes without copying or locking.
#[derive(Debug)]
pub enum ByteBuffer {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl ByteBuffer {
    /// Loads a binary file, memory-mapping it when it is large
    pub fn load(path: &Path) -> SearchResult<Self> {
        let metadata = path.metadata().map_err(|e| map_open_error(path, e))?;
        if !metadata.is_file() {
            return Err(SearchError::file_not_found(path));
        }

        let size = metadata.len();
        if size >= MMAP_THRESHOLD {
            debug!("Memory-mapping {} ({} bytes)", path.display(), size);
            Self::map(path)
        } else {
            trace!("Reading {} ({} bytes)", path.display(), size);
            Self::read(path, size)
        }
    }

    fn read(path: &Path, size: u64) -> SearchResult<Self> {
        let file = File::open(path).map_err(|e| map_open_error(path, e))?;
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut bytes = Vec::with_capacity(size as usize);
        reader.read_to_end(&mut bytes)?;
        Ok(Self::Owned(bytes))
    }

    fn map(path: &Path) -> SearchResult<Self> {
        let file = File::open(path).map_err(|e| map_open_error(path, e))?;
        // SAFETY: the mapping is read-only and lives no longer than the run.
        let mmap = unsafe { Mmap::map(&file) }?;
        Ok(Self::Mapped(mmap))
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Owned(bytes) => bytes.as_slice(),
            Self::Mapped(mmap) => &mmap[..],
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::Mapped(_))
    }
}

impl Deref for ByteBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Owned(bytes)
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::Owned(bytes.to_vec())
    }
}

pub(crate) fn map_open_error(path: &Path, e: std::io::Error) -> SearchError {
    match e.kind() {
        std::io::ErrorKind::NotFound => SearchError::file_not_found(path),
        _ => SearchError::IoError(e),
    }
}
