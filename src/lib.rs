//! # rangecat
//!
//! Random-access byte sources, and a composite that presents an ordered list
//! of them as one contiguous byte space.
//!
//! Members can be in-memory buffers, local files or remote HTTP resources
//! (read with Range requests). The [`GroupedSource`] composite routes each
//! read to the member(s) holding the requested bytes and keeps exactly one
//! member "in use" at a time, so with lazily opened members such as
//! [`LocalFileSource`] a group of any size holds at most one file handle.
//!
//! ## Features
//!
//! - Exact addressing across member boundaries, including zero-length members
//! - Range reads that span members in one call, short only at end of data
//! - Acquire/release hooks around member transitions ([`LifecycleObserver`])
//! - Groups are byte sources themselves and can be nested
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use rangecat::{ByteSource, ByteSourceExt, GroupedSource, LocalFileSource, ReleaseOnSwitch};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let members: Vec<Arc<dyn ByteSource>> = vec![
//!         Arc::new(LocalFileSource::new(Path::new("volume.001"))?),
//!         Arc::new(LocalFileSource::new(Path::new("volume.002"))?),
//!     ];
//!     let grouped = GroupedSource::with_observer(members, Arc::new(ReleaseOnSwitch))?;
//!
//!     // Reads straddling the two files are served in one call
//!     let magic = grouped.read_u32_at::<byteorder::LittleEndian>(0).await?;
//!     println!("{magic:#010x} of {} bytes", grouped.length());
//!
//!     grouped.release().await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod group;
pub mod io;

pub use cli::Cli;
pub use error::{Result, SourceError};
pub use group::{GroupedSource, LifecycleObserver, NoopObserver, ReleaseOnSwitch};
pub use io::{ArraySource, ByteSource, ByteSourceExt, HttpRangeSource, LocalFileSource};
