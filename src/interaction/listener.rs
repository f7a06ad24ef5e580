//! Click subscriptions.
//!
//! A [`Subscription`] is the bound form of a click listener: it records which
//! nodes a click is tested against. The owning manager keeps at most one per
//! hotspot and replaces it wholesale whenever the hotspot's state changes.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::scene::raycast::{Hit, Ray};
use crate::scene::{NodeHandle, Scene};

/// Callback invoked when a hotspot is clicked.
pub type ClickCallback = Box<dyn FnMut()>;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Unique, monotonically increasing listener id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A live click listener bound to a set of target nodes.
#[derive(Debug)]
pub struct Subscription {
    id: ListenerId,
    targets: Vec<NodeHandle>,
}

impl Subscription {
    #[must_use]
    pub fn bind(targets: Vec<NodeHandle>) -> Self {
        let id = ListenerId::next();
        log::trace!("Listener {} bound to {} node(s)", id.get(), targets.len());
        Self { id, targets }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    #[must_use]
    pub fn targets(&self) -> &[NodeHandle] {
        &self.targets
    }

    /// Ray-tests exactly this subscription's targets.
    #[must_use]
    pub fn hit_test(&self, scene: &Scene, ray: &Ray) -> Option<Hit> {
        scene.raycast(ray, &self.targets)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        log::trace!("Listener {} released", self.id.get());
    }
}
