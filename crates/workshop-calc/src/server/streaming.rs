//! Exchange loops and factor generation for the streaming calculator
//! handlers.

use core::time::Duration;
use futures::Stream;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tonic::Status;
use workshop_core::calculator::{
    ComputeAverageRequest, ComputeAverageResponse, FindMaximumRequest, FindMaximumResponse,
    PrimeNumberDecompositionResponse,
};
use workshop_core::exchange::{Inbound, Outbound, Received};
use workshop_core::Error;

/// Running-maximum loop for `FindMaximum`.
///
/// The first received value seeds the accumulator without a notification;
/// each later value strictly greater than the accumulator replaces it and is
/// reported back to the client. Non-increasing values are not acknowledged.
/// The peer closing its send direction ends the loop normally.
pub async fn track_maximum<S>(
    inbound: &mut Inbound<S>,
    outbound: &Outbound<Result<FindMaximumResponse, Status>>,
) -> Result<(), Error>
where
    S: Stream<Item = Result<FindMaximumRequest, Status>> + Unpin,
{
    let mut maximum: Option<i32> = None;
    loop {
        match inbound.recv().await {
            Ok(Received::Message(req)) => match maximum {
                Some(current) if req.number > current => {
                    maximum = Some(req.number);
                    outbound
                        .send(Ok(FindMaximumResponse { maximum: req.number }))
                        .await?;
                }
                Some(_) => {}
                None => maximum = Some(req.number),
            },
            Ok(Received::EndOfStream) => return Ok(()),
            Err(status) => return Err(Error::internal(format!("receive failed: {status}"))),
        }
    }
}

/// Accumulation loop for `ComputeAverage`: sums every inbound number and
/// returns the arithmetic mean once the client closes its send direction.
///
/// # Errors
///
/// An empty stream is rejected with [`Error::InvalidArgument`] rather than
/// producing a NaN average.
pub async fn compute_average_over<S>(mut inbound: Inbound<S>) -> Result<ComputeAverageResponse, Error>
where
    S: Stream<Item = Result<ComputeAverageRequest, Status>> + Unpin,
{
    let mut total: i64 = 0;
    let mut count: i64 = 0;
    loop {
        match inbound.recv().await {
            Ok(Received::Message(req)) => {
                total += i64::from(req.number);
                count += 1;
            }
            Ok(Received::EndOfStream) => break,
            Err(status) => return Err(Error::internal(format!("receive failed: {status}"))),
        }
    }

    if count == 0 {
        return Err(Error::InvalidArgument {
            reason: "stream contained no numbers".to_string(),
        });
    }

    Ok(ComputeAverageResponse {
        average: total as f64 / count as f64,
    })
}

/// Streams the prime factors of `number` in non-decreasing order by trial
/// division, pausing `pace` between factors. Numbers below 2 produce an
/// empty stream. Exits early if the client goes away.
pub async fn decompose(
    number: i64,
    pace: Duration,
    tx: mpsc::Sender<Result<PrimeNumberDecompositionResponse, Status>>,
) {
    let mut remaining = number;
    let mut divisor: i64 = 2;

    while remaining > 1 {
        if remaining % divisor == 0 {
            remaining /= divisor;
            if tx
                .send(Ok(PrimeNumberDecompositionResponse {
                    prime_factor: divisor,
                }))
                .await
                .is_err()
            {
                tracing::debug!("client went away mid-decomposition");
                return;
            }
            if !pace.is_zero() {
                sleep(pace).await;
            }
        } else {
            divisor += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maximum_requests(numbers: &[i32]) -> Vec<Result<FindMaximumRequest, Status>> {
        numbers
            .iter()
            .map(|&number| Ok(FindMaximumRequest { number }))
            .collect()
    }

    async fn collect_maxima(numbers: &[i32]) -> Vec<i32> {
        let mut inbound = Inbound::new(tokio_stream::iter(maximum_requests(numbers)));
        let (tx, mut rx) = mpsc::channel(16);
        let outbound = Outbound::new(tx);

        track_maximum(&mut inbound, &outbound).await.unwrap();
        drop(outbound);

        let mut maxima = Vec::new();
        while let Some(res) = rx.recv().await {
            maxima.push(res.unwrap().maximum);
        }
        maxima
    }

    #[tokio::test]
    async fn emits_exactly_the_strict_running_maxima() {
        assert_eq!(collect_maxima(&[1, 5, 3, 6, 2, 20]).await, vec![5, 6, 20]);
    }

    #[tokio::test]
    async fn ties_do_not_renotify() {
        assert_eq!(collect_maxima(&[4, 4, 4, 5, 5]).await, vec![5]);
    }

    #[tokio::test]
    async fn an_empty_stream_emits_nothing() {
        assert_eq!(collect_maxima(&[]).await, Vec::<i32>::new());
    }

    #[tokio::test]
    async fn negative_inputs_are_tracked_like_any_other() {
        assert_eq!(collect_maxima(&[-7, -3, -5, -1]).await, vec![-3, -1]);
    }

    #[tokio::test]
    async fn a_transport_error_aborts_the_exchange() {
        let items: Vec<Result<FindMaximumRequest, Status>> = vec![
            Ok(FindMaximumRequest { number: 1 }),
            Err(Status::internal("wire failure")),
        ];
        let mut inbound = Inbound::new(tokio_stream::iter(items));
        let (tx, _rx) = mpsc::channel(4);
        let outbound = Outbound::new(tx);

        let result = track_maximum(&mut inbound, &outbound).await;
        assert!(matches!(result, Err(Error::Internal { .. })));
    }

    #[tokio::test]
    async fn average_of_one_through_four_is_two_point_five() {
        let requests: Vec<Result<ComputeAverageRequest, Status>> = [1, 2, 3, 4]
            .iter()
            .map(|&number| Ok(ComputeAverageRequest { number }))
            .collect();
        let inbound = Inbound::new(tokio_stream::iter(requests));

        let response = compute_average_over(inbound).await.unwrap();
        assert_eq!(response.average, 2.5);
    }

    #[tokio::test]
    async fn averaging_an_empty_stream_is_invalid() {
        let inbound = Inbound::new(tokio_stream::iter(Vec::<
            Result<ComputeAverageRequest, Status>,
        >::new()));

        let result = compute_average_over(inbound).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    async fn collect_factors(number: i64) -> Vec<i64> {
        let (tx, mut rx) = mpsc::channel(32);
        decompose(number, Duration::ZERO, tx).await;

        let mut factors = Vec::new();
        while let Some(res) = rx.recv().await {
            factors.push(res.unwrap().prime_factor);
        }
        factors
    }

    #[tokio::test]
    async fn decomposes_into_nondecreasing_prime_factors() {
        assert_eq!(collect_factors(120).await, vec![2, 2, 2, 3, 5]);
        assert_eq!(collect_factors(17).await, vec![17]);
    }

    #[tokio::test]
    async fn numbers_below_two_have_no_factors() {
        assert_eq!(collect_factors(1).await, Vec::<i64>::new());
        assert_eq!(collect_factors(0).await, Vec::<i64>::new());
        assert_eq!(collect_factors(-12).await, Vec::<i64>::new());
    }
}
