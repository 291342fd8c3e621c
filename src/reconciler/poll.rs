// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bounded polling against an eventually consistent cluster.

use crate::error::{ClientError, ConvergentError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Evaluate `condition` every `interval` until it reports done or `timeout` elapses.
///
/// The first evaluation happens right away when `immediate` is set, after one
/// interval otherwise. An error from a single evaluation is logged and polling
/// continues; callers that treat an error as terminal map it to `Ok(true)`
/// inside the condition. The last swallowed error is kept in the timeout error.
pub async fn poll_until<F, Fut>(
    interval: Duration,
    timeout: Duration,
    immediate: bool,
    mut condition: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<bool, ClientError>>,
{
    if interval.is_zero() {
        return Err(ConvergentError::InvalidArgument(
            "poll interval must be greater than zero".to_string(),
        ));
    }

    let start = if immediate {
        Instant::now()
    } else {
        Instant::now() + interval
    };
    let mut ticker = time::interval_at(start, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_error: Option<String> = None;
    let mut attempts: u32 = 0;

    let polling = async {
        loop {
            ticker.tick().await;
            attempts += 1;

            match condition().await {
                Ok(true) => return,
                Ok(false) => debug!("Condition not met after {} attempts", attempts),
                Err(e) => {
                    debug!("Poll attempt {} failed, retrying: {}", attempts, e);
                    last_error = Some(e.to_string());
                }
            }
        }
    };

    let outcome = time::timeout(timeout, polling).await;
    match outcome {
        Ok(()) => Ok(()),
        Err(_) => {
            warn!(
                "Condition not met within {:?} after {} attempts",
                timeout, attempts
            );
            Err(ConvergentError::Timeout {
                timeout,
                last_error,
            })
        }
    }
}
