use super::{ByteSource, available};
use crate::error::{Result, SourceError};
use async_trait::async_trait;
use std::sync::Arc;

/// In-memory byte source over a shared buffer, optionally windowed.
///
/// Always "open": `release` never changes anything.
#[derive(Clone, Debug)]
pub struct ArraySource {
    data: Arc<[u8]>,
    start: usize,
    length: usize,
}

impl ArraySource {
    /// Create a source exposing the whole buffer
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        let data = data.into();
        let length = data.len();
        Self {
            data,
            start: 0,
            length,
        }
    }

    /// Create a source exposing `length` bytes of `data` starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidWindow`] if the window does not fit
    /// inside the buffer.
    pub fn with_window(data: impl Into<Arc<[u8]>>, start: usize, length: usize) -> Result<Self> {
        let data = data.into();
        match start.checked_add(length) {
            Some(end) if end <= data.len() => Ok(Self {
                data,
                start,
                length,
            }),
            _ => Err(SourceError::InvalidWindow {
                start,
                length,
                buffer_len: data.len(),
            }),
        }
    }

    fn window(&self) -> &[u8] {
        &self.data[self.start..self.start + self.length]
    }
}

#[async_trait]
impl ByteSource for ArraySource {
    fn length(&self) -> u64 {
        self.length as u64
    }

    async fn read_byte(&self, position: u64) -> Result<Option<u8>> {
        Ok(usize::try_from(position)
            .ok()
            .and_then(|pos| self.window().get(pos).copied()))
    }

    async fn read_range(&self, position: u64, buf: &mut [u8]) -> Result<Option<usize>> {
        let Some(n) = available(self.length as u64, position, buf.len()) else {
            return Ok(None);
        };
        let pos = position as usize;
        buf[..n].copy_from_slice(&self.window()[pos..pos + n]);
        Ok(Some(n))
    }

    async fn release(&self) -> Result<()> {
        Ok(())
    }
}
