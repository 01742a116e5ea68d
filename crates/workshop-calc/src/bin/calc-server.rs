use clap::Parser;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use workshop_calc::config::{CliArgs, ServerConfig};
use workshop_calc::server::handler::CalculatorHandler;
use workshop_core::calculator::calculator_service_server::CalculatorServiceServer;
use workshop_core::shutdown::shutdown_signal;
use workshop_core::telemetry::init_tracing;
use workshop_core::FILE_DESCRIPTOR_SET;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;
    init_tracing();

    let listener = TcpListener::bind(&config.server_addr).await?;
    let incoming = TcpListenerStream::new(listener);
    tracing::info!("starting calculator service on {}", config.server_addr);

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<CalculatorServiceServer<CalculatorHandler>>()
        .await;

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    let service = CalculatorServiceServer::new(CalculatorHandler::new(config))
        .send_compressed(CompressionEncoding::Gzip)
        .accept_compressed(CompressionEncoding::Gzip);

    Server::builder()
        .add_service(health_service)
        .add_service(reflection)
        .add_service(service)
        .serve_with_incoming_shutdown(incoming, async move {
            shutdown_signal().await;
            health_reporter
                .set_not_serving::<CalculatorServiceServer<CalculatorHandler>>()
                .await;
            tracing::info!("shutting down gracefully");
        })
        .await?;

    tracing::info!("calculator service shut down");
    Ok(())
}
