//! gRPC service implementation for the greet service.
//!
//! [`GreetHandler`] implements the `GreetService` trait generated from
//! `greet.proto`. Streaming responses are produced by background tasks
//! feeding bounded channels; bidirectional exchanges run through the duplex
//! primitives in `workshop_core::exchange`.

use crate::config::ServerConfig;
use crate::server::streaming::{accumulate_greetings, greet_each};
use core::pin::Pin;
use futures::Stream;
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use workshop_core::deadline::{grpc_timeout, run_paced};
use workshop_core::exchange::{Inbound, Outbound};
use workshop_core::greet::greet_service_server::GreetService;
use workshop_core::greet::{
    GreetEveryoneRequest, GreetEveryoneResponse, GreetManyTimesRequest, GreetManyTimesResponse,
    GreetRequest, GreetResponse, GreetWithDeadlineRequest, GreetWithDeadlineResponse, Greeting,
    LongGreetRequest, LongGreetResponse,
};

/// Number of responses streamed by `GreetManyTimes`.
const MANY_TIMES: u32 = 10;

#[derive(Clone)]
pub struct GreetHandler {
    config: ServerConfig,
}

impl GreetHandler {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

fn first_name(greeting: Option<Greeting>) -> String {
    greeting.map(|g| g.first_name).unwrap_or_default()
}

#[tonic::async_trait]
impl GreetService for GreetHandler {
    async fn greet(&self, request: Request<GreetRequest>) -> Result<Response<GreetResponse>, Status> {
        let name = first_name(request.into_inner().greeting);
        tracing::info!(%name, "greet invoked");

        Ok(Response::new(GreetResponse {
            result: format!("Hello {name}"),
        }))
    }

    type GreetManyTimesStream =
        Pin<Box<dyn Stream<Item = Result<GreetManyTimesResponse, Status>> + Send>>;

    async fn greet_many_times(
        &self,
        request: Request<GreetManyTimesRequest>,
    ) -> Result<Response<Self::GreetManyTimesStream>, Status> {
        let name = first_name(request.into_inner().greeting);
        tracing::info!(%name, "greet_many_times invoked");

        let pace = self.config.pace;
        let (tx, rx) = mpsc::channel(self.config.stream_buffer_size);
        tokio::spawn(async move {
            for i in 0..MANY_TIMES {
                let result = format!("Hello {name} number {i}");
                if tx.send(Ok(GreetManyTimesResponse { result })).await.is_err() {
                    tracing::debug!("client went away mid-stream");
                    return;
                }
                if !pace.is_zero() {
                    sleep(pace).await;
                }
            }
        });

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    async fn long_greet(
        &self,
        request: Request<Streaming<LongGreetRequest>>,
    ) -> Result<Response<LongGreetResponse>, Status> {
        tracing::info!("long_greet invoked with a client stream");

        let inbound = Inbound::new(request.into_inner());
        let result = accumulate_greetings(inbound).await?;

        Ok(Response::new(LongGreetResponse { result }))
    }

    type GreetEveryoneStream =
        Pin<Box<dyn Stream<Item = Result<GreetEveryoneResponse, Status>> + Send>>;

    async fn greet_everyone(
        &self,
        request: Request<Streaming<GreetEveryoneRequest>>,
    ) -> Result<Response<Self::GreetEveryoneStream>, Status> {
        tracing::info!("greet_everyone invoked with a duplex stream");

        let mut inbound = Inbound::new(request.into_inner());
        let (tx, rx) = mpsc::channel(self.config.stream_buffer_size);
        tokio::spawn(async move {
            let outbound = Outbound::new(tx);
            if let Err(err) = greet_each(&mut inbound, &outbound).await {
                tracing::warn!("greet_everyone stream aborted: {err}");
                // Best effort; the client may already be gone.
                if outbound.send(Err(err.into())).await.is_err() {
                    tracing::debug!("client unreachable while surfacing stream error");
                }
            }
        });

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    async fn greet_with_deadline(
        &self,
        request: Request<GreetWithDeadlineRequest>,
    ) -> Result<Response<GreetWithDeadlineResponse>, Status> {
        let deadline = grpc_timeout(request.metadata()).map(|timeout| Instant::now() + timeout);
        let name = first_name(request.into_inner().greeting);
        tracing::info!(%name, ?deadline, "greet_with_deadline invoked");

        run_paced(
            self.config.deadline_work_increments,
            self.config.deadline_step,
            deadline,
        )
        .await?;

        Ok(Response::new(GreetWithDeadlineResponse {
            result: format!("Hello {name}"),
        }))
    }
}
