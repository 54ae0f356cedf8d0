//! Periodic cleanup of the logout denylist.
//!
//! Revoked token ids only matter until the token would have expired, so this
//! job drops entries whose expiry has passed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::auth::denylist::TokenDenylist;

/// Run the denylist sweep loop every `every` until `cancel` is triggered.
pub async fn run(denylist: Arc<TokenDenylist>, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "Denylist sweep job started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Denylist sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                let removed = denylist.sweep(Utc::now());
                if removed > 0 {
                    tracing::info!(
                        removed,
                        remaining = denylist.len(),
                        "Denylist sweep: purged expired entries"
                    );
                } else {
                    tracing::debug!("Denylist sweep: nothing to purge");
                }
            }
        }
    }
}
