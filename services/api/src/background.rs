//! Daily housekeeping assignment.
//!
//! Sleeps until the configured local hour, asks the front desk to create the
//! day's cleaning tasks, and repeats until the server shuts down.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use hotel_desk::front_desk::{FrontDeskService, HotelRepository};
use tokio_util::sync::CancellationToken;

const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);

pub(crate) async fn run_daily_cleaning<R>(
    service: Arc<FrontDeskService<R>>,
    assignment_hour: u32,
    cancel: CancellationToken,
) where
    R: HotelRepository + 'static,
{
    tracing::info!(assignment_hour, "Daily cleaning scheduler started");

    loop {
        let wait = until_next_run(Local::now().naive_local(), assignment_hour);
        tracing::debug!(wait_secs = wait.as_secs(), "Daily cleaning scheduler sleeping");

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Daily cleaning scheduler stopping");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                match service.assign_daily_cleaning(Local::now().naive_local()) {
                    Ok(tasks) => {
                        tracing::info!(created = tasks.len(), "Daily cleaning tasks assigned");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Daily cleaning assignment failed");
                    }
                }
            }
        }
    }
}

/// Time left until the next `hour:00`, strictly after `now`.
pub(crate) fn until_next_run(now: NaiveDateTime, hour: u32) -> Duration {
    let Some(today) = now.date().and_hms_opt(hour, 0, 0) else {
        return ONE_DAY;
    };
    let next = if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    };
    (next - now).to_std().unwrap_or(ONE_DAY)
}
