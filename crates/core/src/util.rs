use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Debounce for search/filter inputs: fire one request per quiet period
/// instead of one per keystroke.
///
/// Each call bumps a generation counter, waits out the delay, and reports
/// whether it is still the latest call — the same discard-superseded
/// policy the cart store uses for refreshes. Only the winning caller
/// should issue its request.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    /// Wait out the quiet period. Returns `true` if no newer call arrived
    /// in the meantime.
    pub async fn settle(&self) -> bool {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        mine == self.generation.load(Ordering::SeqCst)
    }
}
