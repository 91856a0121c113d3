pub mod aladhan;
pub mod base;

use std::time::Duration;

use async_trait::async_trait;

use crate::{DailyTimingRecord, Error, Result, TimingRequest};

pub use base::*;

/// Attempts per month before the whole run is abandoned
const MAX_FETCH_ATTEMPTS: u32 = 5;

/// Backoff unit between retries; attempt N waits N times this
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Pause between month requests, to stay polite to the upstream API
const MONTH_PAUSE: Duration = Duration::from_secs(3);

/// A source of daily prayer timings
#[async_trait]
pub trait TimingProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Provider description
    fn description(&self) -> &str;

    /// Fetch one month of day records, in day order.
    ///
    /// A single attempt; retry policy lives in
    /// [`fetch_month_with_retry`](TimingProvider::fetch_month_with_retry).
    async fn fetch_month(
        &self,
        request: &TimingRequest,
        month: u32,
    ) -> Result<Vec<DailyTimingRecord>>;

    /// Fetch one month, retrying failed attempts.
    ///
    /// Every failure kind is retried uniformly with a linearly growing
    /// backoff. An exhausted budget yields [`Error::Fetch`] for the month.
    async fn fetch_month_with_retry(
        &self,
        request: &TimingRequest,
        month: u32,
    ) -> Result<Vec<DailyTimingRecord>> {
        let mut last_error = None;

        for attempt in 0..MAX_FETCH_ATTEMPTS {
            match self.fetch_month(request, month).await {
                Ok(records) => return Ok(records),
                Err(error) => {
                    tracing::warn!(month, attempt, %error, "Request failed, retrying");
                    last_error = Some(error);
                    if attempt + 1 < MAX_FETCH_ATTEMPTS {
                        tokio::time::sleep(RETRY_DELAY * attempt).await;
                    }
                }
            }
        }

        Err(Error::Fetch {
            month,
            attempts: MAX_FETCH_ATTEMPTS,
            message: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    /// Fetch the configured months of the year as one day-ordered sequence.
    ///
    /// Months are requested in order starting from January; any month that
    /// exhausts its retry budget fails the whole fetch.
    async fn fetch_year(&self, request: &TimingRequest) -> Result<Vec<DailyTimingRecord>> {
        if !(1..=12).contains(&request.months) {
            return Err(Error::Config(format!(
                "months must be within 1..=12, got {}",
                request.months
            )));
        }

        let mut records = Vec::new();
        for month in 1..=request.months {
            tracing::info!(month, "Requesting month");
            records.extend(self.fetch_month_with_retry(request, month).await?);
            if month < request.months {
                tokio::time::sleep(MONTH_PAUSE).await;
            }
        }

        Ok(records)
    }
}
