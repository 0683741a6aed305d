//! Grouped byte sources.
//!
//! This module presents an ordered list of [`ByteSource`](crate::io::ByteSource)
//! members as one contiguous, randomly addressable byte space.
//!
//! ## Architecture
//!
//! - [`grouped`]: the composite itself; maps global positions to
//!   `(member, local offset)` and routes reads
//! - [`observer`]: acquire/release hooks fired whenever the active member changes
//!
//! ## Addressing
//!
//! Member `i` covers `[start(i), start(i) + length(i))`. A position equal to
//! the start of member `i + 1` belongs to member `i + 1`. Zero-length members
//! cover nothing and are skipped by lookups, but are still released on
//! shutdown.
//!
//! ## Lifecycle
//!
//! At most one member is "in use" at a time. Before a different member is
//! touched, the current one gets `on_release` and only then does the new one
//! get `on_acquire`. Revisiting a member after another was active acquires it
//! again.

mod grouped;
mod observer;

pub use grouped::GroupedSource;
pub use observer::{LifecycleObserver, NoopObserver, ReleaseOnSwitch};
