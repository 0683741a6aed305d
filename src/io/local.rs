use super::{ByteSource, available};
use crate::error::Result;
use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Local file source with random access support.
///
/// The file is only held open between the first read and the next
/// [`release`](ByteSource::release); constructing many of these costs no
/// file descriptors.
pub struct LocalFileSource {
    path: PathBuf,
    file: Mutex<Option<File>>,
    size: u64,
}

impl LocalFileSource {
    pub fn new(path: &Path) -> Result<Self> {
        let size = std::fs::metadata(path)?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(None),
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a file handle is currently held
    pub async fn is_open(&self) -> bool {
        self.file.lock().await.is_some()
    }
}

fn read_at(file: &File, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileExt;
        file.read_at(buf, offset)
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::FileExt;
        file.seek_read(buf, offset)
    }

    #[cfg(not(any(unix, windows)))]
    {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = file;
        file.seek(SeekFrom::Start(offset))?;
        file.read(buf)
    }
}

#[async_trait]
impl ByteSource for LocalFileSource {
    fn length(&self) -> u64 {
        self.size
    }

    async fn read_range(&self, position: u64, buf: &mut [u8]) -> Result<Option<usize>> {
        let Some(want) = available(self.size, position, buf.len()) else {
            return Ok(None);
        };

        let mut guard = self.file.lock().await;
        let file = match guard.take() {
            Some(file) => file,
            None => {
                log::trace!("opening {}", self.path.display());
                File::open(&self.path)?
            }
        };

        // pread may come back short; keep going until the file runs out.
        // A failed read drops the handle, the next read reopens it.
        let mut filled = 0;
        while filled < want {
            let n = read_at(&file, position + filled as u64, &mut buf[filled..want])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        *guard = Some(file);
        Ok(Some(filled))
    }

    async fn release(&self) -> Result<()> {
        if self.file.lock().await.take().is_some() {
            log::trace!("closed {}", self.path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn opens_lazily_and_closes_on_release() {
        let tmp = temp_file(b"hello world");
        let source = LocalFileSource::new(tmp.path()).unwrap();
        assert_eq!(source.length(), 11);
        assert!(!source.is_open().await);

        assert_eq!(source.read_byte(4).await.unwrap(), Some(b'o'));
        assert!(source.is_open().await);

        source.release().await.unwrap();
        assert!(!source.is_open().await);
        source.release().await.unwrap();

        let mut buf = [0u8; 32];
        assert_eq!(source.read_range(6, &mut buf).await.unwrap(), Some(5));
        assert_eq!(&buf[..5], b"world");
        assert!(source.is_open().await);
    }

    #[tokio::test]
    async fn end_of_data_does_not_open_the_file() {
        let tmp = temp_file(b"abc");
        let source = LocalFileSource::new(tmp.path()).unwrap();
        assert_eq!(source.read_byte(3).await.unwrap(), None);
        assert_eq!(source.read_range(3, &mut [0u8; 4]).await.unwrap(), None);
        assert!(!source.is_open().await);
    }

    #[tokio::test]
    async fn empty_file_has_no_addressable_bytes() {
        let tmp = temp_file(b"");
        let source = LocalFileSource::new(tmp.path()).unwrap();
        assert_eq!(source.length(), 0);
        assert_eq!(source.read_byte(0).await.unwrap(), None);
    }

    #[test]
    fn missing_file_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LocalFileSource::new(&dir.path().join("absent.bin")).is_err());
    }
}
