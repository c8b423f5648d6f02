use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-member serialization for check-in toggles and lifecycle writes.
/// Requests for different members never contend; the registry mutex is
/// held only long enough to clone out the member's entry.
#[derive(Default)]
pub struct MemberLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl MemberLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, member_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().expect("member lock registry poisoned");
            map.entry(member_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
