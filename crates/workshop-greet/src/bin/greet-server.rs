use clap::Parser;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use workshop_core::greet::greet_service_server::GreetServiceServer;
use workshop_core::shutdown::shutdown_signal;
use workshop_core::telemetry::init_tracing;
use workshop_core::FILE_DESCRIPTOR_SET;
use workshop_greet::config::{CliArgs, ServerConfig};
use workshop_greet::server::handler::GreetHandler;

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
    tracing::info!("starting greet service on {}", config.server_addr);

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<GreetServiceServer<GreetHandler>>()
        .await;

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    let service = GreetServiceServer::new(GreetHandler::new(config))
        .send_compressed(CompressionEncoding::Gzip)
        .accept_compressed(CompressionEncoding::Gzip);

    Server::builder()
        .add_service(health_service)
        .add_service(reflection)
        .add_service(service)
        .serve_with_incoming_shutdown(incoming, async move {
            shutdown_signal().await;
            health_reporter
                .set_not_serving::<GreetServiceServer<GreetHandler>>()
                .await;
            tracing::info!("shutting down gracefully");
        })
        .await?;

    tracing::info!("greet service shut down");
    Ok(())
}
