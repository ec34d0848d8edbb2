//! Shared, hot-swappable router handle.
//!
//! # Responsibilities
//! - Publish a fully built router to request-handling threads
//! - Swap in a rebuilt router atomically (config reload)
//!
//! # Design Decisions
//! - Readers take a lock-free snapshot; an in-flight lookup keeps its
//!   snapshot alive even if a replacement is published mid-request
//! - No registration API: routers are built first, then published

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::routing::router::Router;

/// Frozen router shared across threads.
#[derive(Debug)]
pub struct SharedRouter<H> {
    current: ArcSwap<Router<H>>,
}

impl<H> SharedRouter<H> {
    pub fn new(router: Router<H>) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    /// Current router; hold it for the duration of one dispatch.
    pub fn snapshot(&self) -> Arc<Router<H>> {
        self.current.load_full()
    }

    /// Publish `router`, returning the one it replaced.
    pub fn replace(&self, router: Router<H>) -> Arc<Router<H>> {
        let previous = self.current.swap(Arc::new(router));
        info!("Router replaced");
        previous
    }
}

impl<H> From<Router<H>> for SharedRouter<H> {
    fn from(router: Router<H>) -> Self {
        Self::new(router)
    }
}
