use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::state::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Periodic expiration sweep. Reads already reconcile lazily; this loop
/// converges members nobody is reading, so dashboards and exports see
/// `expired` without waiting for traffic.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting subscription expiration sweep...");

    loop {
        let span = info_span!("expiration_sweep");

        async {
            match state.lifecycle.expire_lapsed(Utc::now()).await {
                Ok(0) => {}
                Ok(count) => info!("Expired {} lapsed subscriptions", count),
                Err(e) => error!("Expiration sweep failed: {:?}", e),
            }
        }
            .instrument(span)
            .await;

        sleep(SWEEP_INTERVAL).await;
    }
}
