//! Immutable model blobs and the asset stores they are read from.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memmap2::Mmap;

use crate::error::{Error, Result};

/// Bytes behind a [`ModelBlob`].
enum Backing {
    Mapped(Mmap),
    Owned(Box<[u8]>),
}

impl Backing {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Mapped(map) => &map[..],
            Self::Owned(bytes) => &bytes[..],
        }
    }
}

/// A named, read-only model artifact. Cloning shares the underlying bytes.
#[derive(Clone)]
pub struct ModelBlob {
    name: Arc<str>,
    bytes: Arc<Backing>,
}

impl ModelBlob {
    /// Wrap owned bytes.
    #[must_use]
    pub fn from_bytes(name: &str, bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::new(Backing::Owned(bytes.into())),
        }
    }

    /// Memory-map a file read-only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFound`] if the file does not exist and
    /// [`Error::ModelRead`] for any other I/O failure.
    pub fn map_file(name: &str, path: &Path) -> Result<Self> {
        let read_error = |source: io::Error| match source.kind() {
            io::ErrorKind::NotFound => Error::ModelNotFound {
                name: name.to_string(),
            },
            _ => Error::ModelRead {
                name: name.to_string(),
                source,
            },
        };

        let file = File::open(path).map_err(read_error)?;
        let metadata = file.metadata().map_err(read_error)?;

        if !metadata.is_file() {
            return Err(Error::ModelRead {
                name: name.to_string(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is not a regular file", path.display()),
                ),
            });
        }

        // Zero-length mappings are rejected on some platforms.
        if metadata.len() == 0 {
            return Ok(Self::from_bytes(name, Vec::new()));
        }

        // SAFETY: the asset store is immutable for the lifetime of the process;
        // the mapping is never written through.
        let map = unsafe { Mmap::map(&file) }.map_err(read_error)?;

        Ok(Self {
            name: name.into(),
            bytes: Arc::new(Backing::Mapped(map)),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_bytes()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Whether two handles share the same loaded bytes.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

impl fmt::Debug for ModelBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backing = match *self.bytes {
            Backing::Mapped(_) => "mapped",
            Backing::Owned(_) => "owned",
        };
        f.debug_struct("ModelBlob")
            .field("name", &self.name)
            .field("len", &self.len())
            .field("backing", &backing)
            .finish()
    }
}

/// A read-only store of named model artifacts.
pub trait AssetSource: Send + Sync {
    /// Open the named artifact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFound`] if no artifact has this name and
    /// [`Error::ModelRead`] if it cannot be read.
    fn open(&self, name: &str) -> Result<ModelBlob>;
}

/// Model files in a directory, memory-mapped on open.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform data directory for models:
    /// - Windows: `%APPDATA%\pastiche\models`
    /// - Linux: `~/.local/share/pastiche/models`
    /// - macOS: `~/Library/Application Support/pastiche/models`
    ///
    /// Falls back to `./models` when the platform has no data directory.
    #[must_use]
    pub fn default_location() -> PathBuf {
        dirs::data_dir().map_or_else(
            || PathBuf::from("models"),
            |base| base.join("pastiche").join("models"),
        )
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirectoryAssets {
    fn open(&self, name: &str) -> Result<ModelBlob> {
        // Names are plain file names; anything that could escape the root is absent.
        let plain = Path::new(name)
            .file_name()
            .is_some_and(|file_name| file_name == name);
        if !plain {
            return Err(Error::ModelNotFound {
                name: name.to_string(),
            });
        }

        let path = self.root.join(name);
        tracing::debug!("Mapping model {name} from {}", path.display());
        ModelBlob::map_file(name, &path)
    }
}

/// Model bytes held in memory, e.g. embedded with `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    blobs: HashMap<String, ModelBlob>,
}

impl MemoryAssets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact, replacing any previous one with the same name.
    #[must_use]
    pub fn with(mut self, name: &str, bytes: impl Into<Box<[u8]>>) -> Self {
        self.blobs
            .insert(name.to_string(), ModelBlob::from_bytes(name, bytes));
        self
    }
}

impl AssetSource for MemoryAssets {
    fn open(&self, name: &str) -> Result<ModelBlob> {
        self.blobs
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ModelNotFound {
                name: name.to_string(),
            })
    }
}
