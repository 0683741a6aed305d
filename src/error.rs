use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

/// Failures raised by byte sources and the grouped composite.
///
/// Reaching the end of a source is not an error: reads report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP request failed with status: {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("Remote server does not support Range requests")]
    RangeUnsupported,
    #[error("Remote server did not return Content-Length")]
    MissingContentLength,
    #[error("Max retries exceeded ({0})")]
    RetriesExhausted(u32),
    #[error("A grouped source needs at least one member")]
    EmptyGroup,
    #[error("Total length overflows at member {0}")]
    LengthOverflow(usize),
    #[error("Window {start}+{length} exceeds buffer of {buffer_len} bytes")]
    InvalidWindow {
        start: usize,
        length: usize,
        buffer_len: usize,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
