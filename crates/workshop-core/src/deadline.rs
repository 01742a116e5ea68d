//! Cooperative deadline handling for unary handlers that perform paced work.
//!
//! gRPC propagates the caller's time budget in the `grpc-timeout` request
//! metadata. Handlers doing bounded simulated work split it into fixed-size
//! increments and re-check the deadline at every increment boundary, so
//! detection latency is bounded by the step size rather than the total work.

use crate::Error;
use core::time::Duration;
use tokio::time::{sleep, Instant};
use tonic::metadata::MetadataMap;

/// Extracts the caller's timeout from the `grpc-timeout` request metadata.
///
/// Returns `None` when the metadata is absent or malformed, meaning the
/// caller imposed no deadline.
pub fn grpc_timeout(metadata: &MetadataMap) -> Option<Duration> {
    let raw = metadata.get("grpc-timeout")?.to_str().ok()?;
    parse_timeout(raw)
}

/// Parses the wire format of `grpc-timeout`: an integer value followed by a
/// single unit character (`H`, `M`, `S`, `m`, `u`, or `n`).
fn parse_timeout(raw: &str) -> Option<Duration> {
    if raw.len() < 2 {
        return None;
    }
    let (value, unit) = raw.split_at(raw.len() - 1);
    let value: u64 = value.parse().ok()?;
    match unit {
        "H" => Some(Duration::from_secs(value.checked_mul(3600)?)),
        "M" => Some(Duration::from_secs(value.checked_mul(60)?)),
        "S" => Some(Duration::from_secs(value)),
        "m" => Some(Duration::from_millis(value)),
        "u" => Some(Duration::from_micros(value)),
        "n" => Some(Duration::from_nanos(value)),
        _ => None,
    }
}

/// Performs `increments` fixed-size work steps of duration `step`.
///
/// The deadline is re-checked before every increment, not only at entry.
///
/// # Errors
///
/// Returns [`Error::DeadlineExceeded`] as soon as a checkpoint observes the
/// deadline has fired; the remaining work is never performed.
pub async fn run_paced(
    increments: u32,
    step: Duration,
    deadline: Option<Instant>,
) -> Result<(), Error> {
    for _ in 0..increments {
        if deadline.is_some_and(|at| Instant::now() >= at) {
            return Err(Error::DeadlineExceeded);
        }
        sleep(step).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_timeout_unit() {
        assert_eq!(parse_timeout("2H"), Some(Duration::from_secs(7200)));
        assert_eq!(parse_timeout("3M"), Some(Duration::from_secs(180)));
        assert_eq!(parse_timeout("5S"), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout("250m"), Some(Duration::from_millis(250)));
        assert_eq!(parse_timeout("500000u"), Some(Duration::from_micros(500_000)));
        assert_eq!(parse_timeout("100n"), Some(Duration::from_nanos(100)));
    }

    #[test]
    fn rejects_malformed_timeouts() {
        assert_eq!(parse_timeout(""), None);
        assert_eq!(parse_timeout("S"), None);
        assert_eq!(parse_timeout("12"), None);
        assert_eq!(parse_timeout("-5S"), None);
        assert_eq!(parse_timeout("5x"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn completes_when_no_deadline_is_set() {
        let result = run_paced(3, Duration::from_secs(1), None).await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn aborts_at_the_first_checkpoint_past_the_deadline() {
        let start = Instant::now();
        let deadline = Some(start + Duration::from_millis(1500));

        let result = run_paced(3, Duration::from_secs(1), deadline).await;

        assert!(matches!(result, Err(Error::DeadlineExceeded)));
        // Two increments ran (checks at t=0s and t=1s passed); the check at
        // t=2s fired. The full 3s of work must not have happened.
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn an_already_expired_deadline_does_no_work() {
        let start = Instant::now();
        let result = run_paced(3, Duration::from_secs(1), Some(start)).await;

        assert!(matches!(result, Err(Error::DeadlineExceeded)));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
