pub mod attendance;
pub mod codes;
pub mod lifecycle;
pub mod locks;

use crate::error::AppError;
use std::future::Future;
use std::time::Duration;

const READ_RETRIES: u32 = 2;

/// Bounded retry for read-only store lookups hitting transient failures
/// (connection drops, pool timeouts). Mutations must not go through this.
pub async fn retry_read<T, F, Fut>(mut op: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempts = 0;
    loop {
        match op().await {
            Err(e) if e.is_transient() && attempts < READ_RETRIES => {
                attempts += 1;
                tokio::time::sleep(Duration::from_millis(50 * attempts as u64)).await;
            }
            other => return other,
        }
    }
}
