//! End-to-end tests driving a real tonic client against an in-process
//! calculator server bound to an ephemeral port.

use core::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tonic::transport::Server;
use tonic::Code;
use workshop_calc::config::ServerConfig;
use workshop_calc::server::handler::CalculatorHandler;
use workshop_core::calculator::calculator_service_client::CalculatorServiceClient;
use workshop_core::calculator::calculator_service_server::CalculatorServiceServer;
use workshop_core::calculator::{
    ComputeAverageRequest, FindMaximumRequest, SquareRootRequest, SumRequest,
};

fn fast_config() -> ServerConfig {
    ServerConfig {
        server_addr: "127.0.0.1:0".to_string(),
        pace: Duration::ZERO,
        stream_buffer_size: 8,
    }
}

async fn spawn_server(config: ServerConfig) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = CalculatorServiceServer::new(CalculatorHandler::new(config));
    tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn sum_round_trip() {
    let addr = spawn_server(fast_config()).await;
    let mut client = CalculatorServiceClient::connect(addr).await.unwrap();

    let response = client
        .sum(SumRequest {
            first_number: 23,
            second_number: 60,
        })
        .await
        .unwrap();

    assert_eq!(response.into_inner().sum_result, 83);
}

#[tokio::test]
async fn find_maximum_notifies_only_on_new_maxima() {
    let addr = spawn_server(fast_config()).await;
    let mut client = CalculatorServiceClient::connect(addr).await.unwrap();

    let (tx, rx) = mpsc::channel(8);
    for number in [1, 5, 3, 6, 2, 20] {
        tx.send(FindMaximumRequest { number }).await.unwrap();
    }
    // Closing the send direction ends the exchange on the server.
    drop(tx);

    let mut stream = client
        .find_maximum(ReceiverStream::new(rx))
        .await
        .unwrap()
        .into_inner();

    let mut maxima = Vec::new();
    while let Some(response) = stream.message().await.unwrap() {
        maxima.push(response.maximum);
    }

    assert_eq!(maxima, vec![5, 6, 20]);
}

#[tokio::test]
async fn compute_average_over_the_client_stream() {
    let addr = spawn_server(fast_config()).await;
    let mut client = CalculatorServiceClient::connect(addr).await.unwrap();

    let requests = [1, 2, 3, 4].map(|number| ComputeAverageRequest { number });
    let response = client
        .compute_average(tokio_stream::iter(requests))
        .await
        .unwrap();

    assert_eq!(response.into_inner().average, 2.5);
}

#[tokio::test]
async fn square_root_of_a_negative_number_is_invalid_argument() {
    let addr = spawn_server(fast_config()).await;
    let mut client = CalculatorServiceClient::connect(addr).await.unwrap();

    let status = client
        .square_root(SquareRootRequest { number: -32 })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}
