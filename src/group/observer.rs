use async_trait::async_trait;

use crate::error::Result;
use crate::io::ByteSource;

/// Hooks fired by [`GroupedSource`](super::GroupedSource) around member
/// transitions, never per byte.
///
/// Errors returned from a hook abort the read that triggered it.
#[async_trait]
pub trait LifecycleObserver: Send + Sync {
    /// Called before member `index` is first touched as the active member
    async fn on_acquire(&self, _index: usize, _member: &dyn ByteSource) -> Result<()> {
        Ok(())
    }

    /// Called after member `index` stops being the active member
    async fn on_release(&self, _index: usize, _member: &dyn ByteSource) -> Result<()> {
        Ok(())
    }

    /// Whether a successful `on_release` has already called
    /// [`ByteSource::release`] on the member. Shutdown then skips that member
    /// in its release sweep.
    fn releases_member(&self) -> bool {
        false
    }
}

/// Observer that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LifecycleObserver for NoopObserver {}

/// Observer that releases a member's resources as soon as it stops being
/// active.
///
/// With lazily opened members such as
/// [`LocalFileSource`](crate::io::LocalFileSource) this keeps at most one
/// handle open for the whole group.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReleaseOnSwitch;

#[async_trait]
impl LifecycleObserver for ReleaseOnSwitch {
    async fn on_release(&self, _index: usize, member: &dyn ByteSource) -> Result<()> {
        member.release().await
    }

    fn releases_member(&self) -> bool {
        true
    }
}
