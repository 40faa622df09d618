pub mod income;
pub mod lifecycle;
pub mod pricing;
pub mod rating;

use crate::error::app_error::AppError;
use std::future::Future;
use std::time::Duration;

const READ_RETRY_ATTEMPTS: u32 = 3;
const READ_RETRY_BASE_DELAY_MS: u64 = 50;

/// Retry a read-only store operation on transient transport failures.
///
/// Only aggregation reads go through here. Mutating transitions are never
/// retried: a write may have been applied before the connection dropped,
/// so the caller has to re-fetch and re-decide.
pub async fn with_read_retry<T, F, Fut>(op: F) -> Result<T, AppError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(e) if e.is_transient() && attempt + 1 < READ_RETRY_ATTEMPTS => {
                let delay = READ_RETRY_BASE_DELAY_MS << attempt;
                tracing::warn!(attempt, delay_ms = delay, error = %e, "transient store error, retrying read");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
