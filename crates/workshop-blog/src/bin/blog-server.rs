use clap::Parser;
use mongodb::options::ClientOptions;
use mongodb::Client;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use workshop_blog::config::{CliArgs, ServerConfig};
use workshop_blog::server::handler::BlogHandler;
use workshop_blog::server::store::BlogDocument;
use workshop_core::blog::blog_service_server::BlogServiceServer;
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

    let mut options = ClientOptions::parse(&config.mongo_uri).await?;
    options.connect_timeout = Some(config.mongo_connect_timeout);
    options.server_selection_timeout = Some(config.mongo_connect_timeout);
    let client = Client::with_options(options)?;
    let collection = client
        .database(&config.mongo_db)
        .collection::<BlogDocument>(&config.mongo_collection);
    tracing::info!(
        "connected to MongoDB at {} ({}/{})",
        config.mongo_uri,
        config.mongo_db,
        config.mongo_collection
    );

    let listener = TcpListener::bind(&config.server_addr).await?;
    let incoming = TcpListenerStream::new(listener);
    tracing::info!("starting blog service on {}", config.server_addr);

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<BlogServiceServer<BlogHandler>>()
        .await;

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    let service = BlogServiceServer::new(BlogHandler::new(collection))
        .send_compressed(CompressionEncoding::Gzip)
        .accept_compressed(CompressionEncoding::Gzip);

    Server::builder()
        .add_service(health_service)
        .add_service(reflection)
        .add_service(service)
        .serve_with_incoming_shutdown(incoming, async move {
            shutdown_signal().await;
            health_reporter
                .set_not_serving::<BlogServiceServer<BlogHandler>>()
                .await;
            tracing::info!("shutting down gracefully");
        })
        .await?;

    tracing::info!("blog service shut down");
    Ok(())
}
