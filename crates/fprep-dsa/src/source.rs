//! Read-only file mapping used as the run's byte source.

use core::ffi::c_void;
use core::num::NonZeroUsize;
use core::ptr::NonNull;
use std::fs::File;
use std::path::{Path, PathBuf};

use nix::sys::mman::{madvise, mmap, munmap, MapFlags, MmapAdvise, ProtFlags};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot map {path}: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is empty")]
    Empty { path: PathBuf },
}

/// A private, read-only mapping of a whole file.
///
/// ## Lifetime
/// The region stays valid until the value is dropped; `Drop` releases it with
/// `munmap`. The file descriptor is closed right after mapping, the mapping
/// keeps its own reference to the inode.
pub struct MappedFile {
    base: NonNull<c_void>,
    len: usize,
    path: PathBuf,
}

impl MappedFile {
    /// Maps `path` into memory.
    ///
    /// Any failure here is fatal to the run: the caller reports the path and
    /// the OS reason and stops before the first phase.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| SourceError::Open {
            path: path.clone(),
            source,
        })?;
        let file_len = file
            .metadata()
            .map_err(|source| SourceError::Open {
                path: path.clone(),
                source,
            })?
            .len();

        let len = usize::try_from(file_len).map_err(|_| SourceError::Map {
            path: path.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file does not fit in the address space",
            ),
        })?;
        let Some(length) = NonZeroUsize::new(len) else {
            return Err(SourceError::Empty { path });
        };

        // # Safety: the mapping is PROT_READ and MAP_PRIVATE, nothing in this
        // process writes through it. Truncation of the file by another process
        // while mapped is outside what the tool guards against.
        let base = unsafe {
            mmap(
                None,
                length,
                ProtFlags::PROT_READ,
                MapFlags::MAP_PRIVATE,
                &file,
                0,
            )
        }
        .map_err(|errno| SourceError::Map {
            path: path.clone(),
            source: std::io::Error::from(errno),
        })?;

        // Every phase walks the region front to back.
        // # Safety: `base`/`len` describe the mapping created above.
        if let Err(errno) = unsafe { madvise(base, len, MmapAdvise::MADV_SEQUENTIAL) } {
            tracing::debug!("madvise(SEQUENTIAL) on {} failed: {}", path.display(), errno);
        }

        tracing::debug!("Mapped {} ({} bytes)", path.display(), len);
        Ok(Self { base, len, path })
    }

    /// The mapped bytes.
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        // # Safety: `base` points to `len` readable bytes for as long as `self`
        // lives, and the mapping is never written.
        unsafe { core::slice::from_raw_parts(self.base.as_ptr() as *const u8, self.len) }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: `open` rejects empty files with [`SourceError::Empty`].
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for MappedFile {
    fn drop(&mut self) {
        // # Safety: base and len are the exact values returned by mmap and
        // owned by this struct.
        if let Err(errno) = unsafe { munmap(self.base, self.len) } {
            tracing::warn!("munmap of {} failed: {}", self.path.display(), errno);
        }
    }
}

impl core::fmt::Debug for MappedFile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MappedFile")
            .field("path", &self.path)
            .field("len", &self.len)
            .finish()
    }
}

unsafe impl Send for MappedFile {}
unsafe impl Sync for MappedFile {}
