//! gRPC service implementation for the calculator service.

use crate::config::ServerConfig;
use crate::server::streaming::{compute_average_over, decompose, track_maximum};
use core::pin::Pin;
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use workshop_core::calculator::calculator_service_server::CalculatorService;
use workshop_core::calculator::{
    ComputeAverageRequest, ComputeAverageResponse, FindMaximumRequest, FindMaximumResponse,
    PrimeNumberDecompositionRequest, PrimeNumberDecompositionResponse, SquareRootRequest,
    SquareRootResponse, SumRequest, SumResponse,
};
use workshop_core::exchange::{Inbound, Outbound};
use workshop_core::Error;

#[derive(Clone)]
pub struct CalculatorHandler {
    config: ServerConfig,
}

impl CalculatorHandler {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

#[tonic::async_trait]
impl CalculatorService for CalculatorHandler {
    async fn sum(&self, request: Request<SumRequest>) -> Result<Response<SumResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(first = req.first_number, second = req.second_number, "sum invoked");

        // Widen before adding so i32::MAX + i32::MAX cannot overflow.
        let sum_result = i64::from(req.first_number) + i64::from(req.second_number);
        Ok(Response::new(SumResponse { sum_result }))
    }

    type PrimeNumberDecompositionStream =
        Pin<Box<dyn Stream<Item = Result<PrimeNumberDecompositionResponse, Status>> + Send>>;

    async fn prime_number_decomposition(
        &self,
        request: Request<PrimeNumberDecompositionRequest>,
    ) -> Result<Response<Self::PrimeNumberDecompositionStream>, Status> {
        let number = request.into_inner().number;
        tracing::info!(number, "prime_number_decomposition invoked");

        let pace = self.config.pace;
        let (tx, rx) = mpsc::channel(self.config.stream_buffer_size);
        tokio::spawn(decompose(number, pace, tx));

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    async fn compute_average(
        &self,
        request: Request<Streaming<ComputeAverageRequest>>,
    ) -> Result<Response<ComputeAverageResponse>, Status> {
        tracing::info!("compute_average invoked with a client stream");

        let inbound = Inbound::new(request.into_inner());
        let response = compute_average_over(inbound).await?;

        Ok(Response::new(response))
    }

    type FindMaximumStream =
        Pin<Box<dyn Stream<Item = Result<FindMaximumResponse, Status>> + Send>>;

    async fn find_maximum(
        &self,
        request: Request<Streaming<FindMaximumRequest>>,
    ) -> Result<Response<Self::FindMaximumStream>, Status> {
        tracing::info!("find_maximum invoked with a duplex stream");

        let mut inbound = Inbound::new(request.into_inner());
        let (tx, rx) = mpsc::channel(self.config.stream_buffer_size);
        tokio::spawn(async move {
            let outbound = Outbound::new(tx);
            if let Err(err) = track_maximum(&mut inbound, &outbound).await {
                tracing::warn!("find_maximum stream aborted: {err}");
                // Best effort; the client may already be gone.
                if outbound.send(Err(err.into())).await.is_err() {
                    tracing::debug!("client unreachable while surfacing stream error");
                }
            }
        });

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    async fn square_root(
        &self,
        request: Request<SquareRootRequest>,
    ) -> Result<Response<SquareRootResponse>, Status> {
        let number = request.into_inner().number;
        tracing::info!(number, "square_root invoked");

        if number < 0 {
            return Err(Error::InvalidArgument {
                reason: format!("received a negative number: {number}"),
            }
            .into());
        }

        Ok(Response::new(SquareRootResponse {
            number_root: f64::from(number).sqrt(),
        }))
    }
}
