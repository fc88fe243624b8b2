//! Id assignment for records created through the facade

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::client::ClientId;

/// Time-derived id source.
///
/// Ids are milliseconds since the Unix epoch, bumped past the previous id
/// when two creates land in the same millisecond (or the clock steps
/// back), so every id handed out by one generator is distinct and
/// strictly increasing. They are not stable across snapshot reloads.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id
    pub fn next_id(&self) -> ClientId {
        let now = Utc::now().timestamp_millis();
        let step = |prev: ClientId| now.max(prev.saturating_add(1));

        // fetch_update only fails when the closure returns None.
        match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| Some(step(prev)))
        {
            Ok(prev) | Err(prev) => step(prev),
        }
    }
}
