use super::ByteSource;
use crate::error::Result;
use async_trait::async_trait;
use byteorder::ByteOrder;
use std::io::{Error, ErrorKind};

/// Helpers built on top of [`ByteSource`] reads.
#[async_trait]
pub trait ByteSourceExt: ByteSource {
    /// Fill `buf` completely from `position`, reissuing short reads.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::UnexpectedEof`] if the source ends first.
    async fn read_exact_at(&self, position: u64, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self
                .read_range(position + filled as u64, &mut buf[filled..])
                .await?
            {
                Some(n) if n > 0 => filled += n,
                _ => {
                    return Err(Error::new(
                        ErrorKind::UnexpectedEof,
                        format!(
                            "needed {} bytes at {}, source ended after {}",
                            buf.len(),
                            position,
                            filled
                        ),
                    )
                    .into());
                }
            }
        }
        Ok(())
    }

    async fn read_u16_at<B: ByteOrder>(&self, position: u64) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact_at(position, &mut buf).await?;
        Ok(B::read_u16(&buf))
    }

    async fn read_u32_at<B: ByteOrder>(&self, position: u64) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact_at(position, &mut buf).await?;
        Ok(B::read_u32(&buf))
    }

    async fn read_u64_at<B: ByteOrder>(&self, position: u64) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read_exact_at(position, &mut buf).await?;
        Ok(B::read_u64(&buf))
    }

    /// Read the whole source into memory
    async fn read_all(&self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.length() as usize];
        self.read_exact_at(0, &mut buf).await?;
        Ok(buf)
    }
}

impl<S: ByteSource + ?Sized> ByteSourceExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::io::ArraySource;
    use byteorder::{BigEndian, LittleEndian};

    #[tokio::test]
    async fn reads_integers_in_either_order() {
        let source = ArraySource::new(vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        assert_eq!(source.read_u16_at::<LittleEndian>(0).await.unwrap(), 0x0201);
        assert_eq!(source.read_u16_at::<BigEndian>(0).await.unwrap(), 0x0102);
        assert_eq!(source.read_u32_at::<LittleEndian>(4).await.unwrap(), 0x0807_0605);
        assert_eq!(
            source.read_u64_at::<BigEndian>(0).await.unwrap(),
            0x0102_0304_0506_0708
        );
    }

    #[tokio::test]
    async fn read_exact_past_end_is_unexpected_eof() {
        let source = ArraySource::new(vec![1, 2, 3]);
        let err = source.read_u32_at::<LittleEndian>(1).await.unwrap_err();
        assert!(matches!(err, SourceError::Io(e) if e.kind() == ErrorKind::UnexpectedEof));
    }

    #[tokio::test]
    async fn read_all_copies_everything() {
        let source = ArraySource::new(b"rangecat".to_vec());
        assert_eq!(source.read_all().await.unwrap(), b"rangecat");
        let empty = ArraySource::new(Vec::<u8>::new());
        assert!(empty.read_all().await.unwrap().is_empty());
    }
}
