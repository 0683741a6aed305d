//! The grouped composite.
//!
//! Positions are resolved with a binary search over member start offsets. A
//! single "last resolved member" hint short-circuits the search for
//! sequential access; it is only ever checked, never trusted.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::observer::{LifecycleObserver, NoopObserver};
use crate::error::{Result, SourceError};
use crate::io::ByteSource;

/// A member and the global range it covers
struct Member {
    source: Arc<dyn ByteSource>,
    start: u64,
    length: u64,
}

impl Member {
    fn contains(&self, position: u64) -> bool {
        position >= self.start && position - self.start < self.length
    }
}

/// Mutable part of the composite, guarded for the whole of each operation
#[derive(Default)]
struct State {
    /// Member currently in use
    active: Option<usize>,
    /// Member that resolved the previous lookup
    hint: usize,
}

/// Ordered concatenation of byte sources, addressed as one.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use rangecat::{ArraySource, ByteSource, GroupedSource};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> rangecat::Result<()> {
/// let members: Vec<Arc<dyn ByteSource>> = vec![
///     Arc::new(ArraySource::new(b"hello ".to_vec())),
///     Arc::new(ArraySource::new(b"world".to_vec())),
/// ];
/// let grouped = GroupedSource::new(members)?;
///
/// let mut buf = [0u8; 16];
/// let n = grouped.read_range(3, &mut buf).await?;
/// assert_eq!(n, Some(8));
/// assert_eq!(&buf[..8], b"lo world");
/// assert_eq!(grouped.read_byte(11).await?, None);
///
/// grouped.release().await?;
/// # Ok(())
/// # }
/// ```
pub struct GroupedSource {
    members: Vec<Member>,
    length: u64,
    observer: Arc<dyn LifecycleObserver>,
    state: Mutex<State>,
}

impl GroupedSource {
    /// Group `members` in order, with no lifecycle hooks.
    ///
    /// # Errors
    ///
    /// Fails if `members` is empty or their lengths overflow `u64`.
    pub fn new(members: Vec<Arc<dyn ByteSource>>) -> Result<Self> {
        Self::with_observer(members, Arc::new(NoopObserver))
    }

    /// Group `members` in order, reporting member transitions to `observer`.
    pub fn with_observer(
        members: Vec<Arc<dyn ByteSource>>,
        observer: Arc<dyn LifecycleObserver>,
    ) -> Result<Self> {
        if members.is_empty() {
            return Err(SourceError::EmptyGroup);
        }

        let mut start = 0u64;
        let mut table = Vec::with_capacity(members.len());
        for (index, source) in members.into_iter().enumerate() {
            let length = source.length();
            table.push(Member {
                source,
                start,
                length,
            });
            start = start
                .checked_add(length)
                .ok_or(SourceError::LengthOverflow(index))?;
        }

        log::debug!("grouped {} members, {} bytes", table.len(), start);

        Ok(Self {
            members: table,
            length: start,
            observer,
            state: Mutex::new(State::default()),
        })
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Global position of the first byte of member `index`
    pub fn member_start(&self, index: usize) -> Option<u64> {
        self.members.get(index).map(|m| m.start)
    }

    pub fn member(&self, index: usize) -> Option<&Arc<dyn ByteSource>> {
        self.members.get(index).map(|m| &m.source)
    }

    /// Index of the member currently in use, if any
    pub async fn active_member(&self) -> Option<usize> {
        self.state.lock().await.active
    }

    /// Resolve a global position to the member holding it.
    fn locate(&self, position: u64, hint: usize) -> Option<usize> {
        if position >= self.length {
            return None;
        }
        if self.members.get(hint).is_some_and(|m| m.contains(position)) {
            return Some(hint);
        }
        // Greatest index whose start is <= position. Zero-length members
        // share their start with the next member, so this lands past them.
        let index = self.members.partition_point(|m| m.start <= position) - 1;
        debug_assert!(self.members[index].contains(position));
        Some(index)
    }

    /// Make member `index` the active one, releasing the previous one first.
    async fn switch_to(&self, state: &mut State, index: usize) -> Result<()> {
        if state.active == Some(index) {
            return Ok(());
        }
        if let Some(previous) = state.active {
            log::trace!("releasing member {previous}");
            self.observer
                .on_release(previous, self.members[previous].source.as_ref())
                .await?;
            state.active = None;
        }
        log::trace!("acquiring member {index}");
        self.observer
            .on_acquire(index, self.members[index].source.as_ref())
            .await?;
        state.active = Some(index);
        Ok(())
    }
}

#[async_trait]
impl ByteSource for GroupedSource {
    fn length(&self) -> u64 {
        self.length
    }

    async fn read_byte(&self, position: u64) -> Result<Option<u8>> {
        let mut state = self.state.lock().await;
        let Some(index) = self.locate(position, state.hint) else {
            return Ok(None);
        };
        state.hint = index;
        self.switch_to(&mut state, index).await?;

        let member = &self.members[index];
        member.source.read_byte(position - member.start).await
    }

    async fn read_range(&self, position: u64, buf: &mut [u8]) -> Result<Option<usize>> {
        let mut state = self.state.lock().await;
        if position >= self.length {
            return Ok(None);
        }

        let mut copied = 0;
        while copied < buf.len() {
            let global = position + copied as u64;
            let Some(index) = self.locate(global, state.hint) else {
                break;
            };
            state.hint = index;
            self.switch_to(&mut state, index).await?;

            let member = &self.members[index];
            let local = global - member.start;
            let want = ((buf.len() - copied) as u64).min(member.length - local) as usize;
            match member
                .source
                .read_range(local, &mut buf[copied..copied + want])
                .await?
            {
                Some(n) if n > 0 => copied += n.min(want),
                // A member that makes no progress is treated as exhausted
                _ => break,
            }
        }

        Ok(Some(copied))
    }

    async fn release(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let mut first_error = None;
        let mut released_by_hook = None;
        if let Some(active) = state.active.take() {
            log::trace!("releasing member {active}");
            match self
                .observer
                .on_release(active, self.members[active].source.as_ref())
                .await
            {
                Ok(()) if self.observer.releases_member() => released_by_hook = Some(active),
                Ok(()) => {}
                Err(e) => first_error = Some(e),
            }
        }

        // Every member, touched or not, so nothing handed to us stays open
        for (index, member) in self.members.iter().enumerate() {
            if released_by_hook == Some(index) {
                continue;
            }
            if let Err(e) = member.source.release().await {
                log::warn!("failed to release member {index}: {e}");
                first_error.get_or_insert(e);
            }
        }
        log::debug!("released {} members", self.members.len());

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
