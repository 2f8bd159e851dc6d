//! Simulated network latency for demo builds.
//!
//! The UI layer expects backend calls to take observable time so
//! loading states can be exercised. Production embeddings use
//! [`NoDelay`]; the demo factory installs a fixed pause.

use std::time::Duration;

/// Pause applied before answering a call from the UI layer.
pub trait DelayPolicy: Send + Sync {
    fn pause(&self);
}

/// No pause at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn pause(&self) {}
}

/// A fixed pause per call.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }
}

impl DelayPolicy for FixedDelay {
    fn pause(&self) {
        std::thread::sleep(self.0);
    }
}
