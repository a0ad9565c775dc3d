use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::error::{Result, ShamirError};
use crate::shamir::Share;

/// Trait defining storage operations for share records
///
/// Implement this trait to create custom storage backends
///
/// # Example
/// ```
/// use prime_share::{ShareStore, Share};
///
/// struct MemoryStore;
///
/// impl ShareStore for MemoryStore {
///     fn store_share(&mut self, _: &Share) -> prime_share::Result<()> { Ok(()) }
///     fn load_share(&self, _: u32) -> prime_share::Result<Share> { unimplemented!() }
///     fn list_shares(&self) -> prime_share::Result<Vec<u32>> { Ok(Vec::new()) }
///     fn delete_share(&mut self, _: u32) -> prime_share::Result<()> { Ok(()) }
/// }
/// ```
pub trait ShareStore {
    /// Stores a share in persistent storage
    fn store_share(&mut self, share: &Share) -> Result<()>;

    /// Retrieves a share from storage by index
    fn load_share(&self, index: u32) -> Result<Share>;

    /// Lists all available share indices
    fn list_shares(&self) -> Result<Vec<u32>>;

    /// Deletes a share from storage
    fn delete_share(&mut self, index: u32) -> Result<()>;

    /// Stores every share of one distribution
    fn store_all(&mut self, shares: &[Share]) -> Result<()> {
        for share in shares {
            self.store_share(share)?;
        }
        Ok(())
    }
}

/// File system implementation of ShareStore
///
/// Each share is a bare record (see [`codec`](crate::codec)) in a file named
/// after its index: `<dir>/1`, `<dir>/2`, and so on. Files are created with
/// mode `0600` on Unix and written through a temporary file that is renamed
/// into place, so an interrupted write never leaves a truncated share.
///
/// # Example
/// ```
/// use prime_share::{FileShareStore, ShamirShare, ShareStore};
/// use tempfile::tempdir;
///
/// let temp_dir = tempdir().unwrap();
/// let mut store = FileShareStore::new(temp_dir.path()).unwrap();
///
/// let shares = ShamirShare::new(3, 2).unwrap().split(b"abc").unwrap();
/// store.store_all(&shares).unwrap();
///
/// let loaded = store.load_share(2).unwrap();
/// assert_eq!(loaded, shares[1]);
/// ```
pub struct FileShareStore {
    /// Base directory for storing shares
    base_dir: PathBuf,
}

impl FileShareStore {
    /// Creates a new file-based store at specified path
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Directory the shares live in
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Gets the path for a share file
    pub fn share_path(&self, index: u32) -> PathBuf {
        self.base_dir.join(index.to_string())
    }

    fn write_record(&self, index: u32, record: &[u8]) -> Result<()> {
        let path = self.share_path(index);
        let tmp_path = self.base_dir.join(format!(".{index}.tmp"));

        let result = (|| -> io::Result<()> {
            let mut file = create_private(&tmp_path)?;
            file.write_all(record)?;
            file.sync_all()?;
            fs::rename(&tmp_path, &path)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!(index, path = %path.display(), "stored share");
        Ok(())
    }
}

#[cfg(unix)]
fn create_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Reads and decodes a single share record from any path
pub fn read_share_file<P: AsRef<Path>>(path: P) -> Result<Share> {
    let record = fs::read(path)?;
    Share::from_bytes(&record)
}

impl ShareStore for FileShareStore {
    fn store_share(&mut self, share: &Share) -> Result<()> {
        let record = share.to_bytes()?;
        self.write_record(share.index, &record)
    }

    fn load_share(&self, index: u32) -> Result<Share> {
        let path = self.share_path(index);
        let record = fs::read(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ShamirError::ShareNotFound(index)
            } else {
                e.into()
            }
        })?;

        let share = Share::from_bytes(&record)?;

        // Verify stored index matches requested index
        if share.index != index {
            return Err(ShamirError::MalformedShare(format!(
                "file {} holds share {}",
                path.display(),
                share.index
            )));
        }

        Ok(share)
    }

    fn list_shares(&self) -> Result<Vec<u32>> {
        let mut indices = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();

            if let Ok(index) = file_name.parse::<u32>() {
                indices.push(index);
            }
        }

        indices.sort_unstable();
        Ok(indices)
    }

    fn delete_share(&mut self, index: u32) -> Result<()> {
        let path = self.share_path(index);
        fs::remove_file(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ShamirError::ShareNotFound(index)
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    /// Encodes every share before the first file is written, so an encoding
    /// failure never leaves a partial set on disk
    fn store_all(&mut self, shares: &[Share]) -> Result<()> {
        let records = shares
            .iter()
            .map(|s| -> Result<(u32, Bytes)> { Ok((s.index, s.to_bytes()?)) })
            .collect::<Result<Vec<(u32, Bytes)>>>()?;

        for (index, record) in &records {
            self.write_record(*index, record)?;
        }
        Ok(())
    }
}
