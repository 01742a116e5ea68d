use anyhow::bail;
use clap::Parser;
use core::time::Duration;

/// Runtime configuration for the `blog-server` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "blog-server",
    version,
    about = "A gRPC blog service backed by MongoDB"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:50051"))]
    pub server_addr: String,

    /// MongoDB connection string.
    ///
    /// Environment variable: `MONGO_URI`
    #[arg(long, env = "MONGO_URI", default_value_t = String::from("mongodb://localhost:27017"))]
    pub mongo_uri: String,

    /// MongoDB database holding the blog collection.
    ///
    /// Environment variable: `MONGO_DB`
    #[arg(long, env = "MONGO_DB", default_value_t = String::from("mydb"))]
    pub mongo_db: String,

    /// Collection the blog documents live in.
    ///
    /// Environment variable: `MONGO_COLLECTION`
    #[arg(long, env = "MONGO_COLLECTION", default_value_t = String::from("blog"))]
    pub mongo_collection: String,

    /// Timeout for establishing the MongoDB connection, in milliseconds.
    ///
    /// Environment variable: `MONGO_CONNECT_TIMEOUT_MS`
    #[arg(long, env = "MONGO_CONNECT_TIMEOUT_MS", default_value_t = 10_000)]
    pub mongo_connect_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub mongo_uri: String,
    pub mongo_db: String,
    pub mongo_collection: String,
    pub mongo_connect_timeout: Duration,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.mongo_db.is_empty() || args.mongo_collection.is_empty() {
            bail!("MONGO_DB and MONGO_COLLECTION must be non-empty");
        }

        Ok(Self {
            server_addr: args.server_addr,
            mongo_uri: args.mongo_uri,
            mongo_db: args.mongo_db,
            mongo_collection: args.mongo_collection,
            mongo_connect_timeout: Duration::from_millis(args.mongo_connect_timeout_ms),
        })
    }
}
