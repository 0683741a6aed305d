mod array;
mod ext;
mod http;
mod local;

pub use array::ArraySource;
pub use ext::ByteSourceExt;
pub use http::HttpRangeSource;
pub use local::LocalFileSource;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for random access reading from a fixed-length data source.
///
/// End of data is reported as `Ok(None)`, never as an error. A short count
/// from `read_range` is final for leaf sources: the bytes past it do not
/// exist, they are not being held back for a later call.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Total number of addressable bytes
    fn length(&self) -> u64;

    /// Read the byte at `position`, or `None` if `position >= length()`
    async fn read_byte(&self, position: u64) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        Ok(match self.read_range(position, &mut buf).await? {
            Some(1) => Some(buf[0]),
            _ => None,
        })
    }

    /// Read up to `buf.len()` bytes starting at `position`.
    ///
    /// Returns `None` only when `position >= length()`; otherwise the number
    /// of bytes copied, at most `length() - position`.
    async fn read_range(&self, position: u64, buf: &mut [u8]) -> Result<Option<usize>>;

    /// Close any held resource. Calling this when nothing is held is a no-op.
    async fn release(&self) -> Result<()>;
}

/// Number of bytes a leaf of `length` bytes can supply at `position` into a
/// buffer of `want` bytes, or `None` past the end.
pub(crate) fn available(length: u64, position: u64, want: usize) -> Option<usize> {
    if position >= length {
        return None;
    }
    Some((length - position).min(want as u64) as usize)
}
