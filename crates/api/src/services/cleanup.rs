//! Periodic housekeeping: sweep expired checkout sessions and release
//! matured payout holds.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::db::{CheckoutSessionRepository, OrderRepository};

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Spawn the background sweep loop. Runs until the process exits.
pub fn spawn_cleanup_task(pool: PgPool) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        // First tick fires immediately; skip it so startup stays quiet
        ticker.tick().await;

        loop {
            ticker.tick().await;
            run_sweep(&pool).await;
        }
    })
}

/// One sweep pass. Failures are logged, never fatal.
async fn run_sweep(pool: &PgPool) {
    let now = Utc::now();

    match CheckoutSessionRepository::new(pool).delete_expired(now).await {
        Ok(0) => debug!("No expired checkout sessions"),
        Ok(count) => info!(count, "Swept expired checkout sessions"),
        Err(e) => warn!(error = %e, "Checkout session sweep failed"),
    }

    match OrderRepository::new(pool).release_matured_holds(now).await {
        Ok(0) => debug!("No matured payout holds"),
        Ok(count) => info!(count, "Released matured payout holds"),
        Err(e) => warn!(error = %e, "Payout hold release failed"),
    }
}
