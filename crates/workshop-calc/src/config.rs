use anyhow::bail;
use clap::Parser;
use core::time::Duration;

/// Runtime configuration for the `calc-server` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "calc-server",
    version,
    about = "A gRPC calculator service demonstrating the four RPC shapes"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:50051"))]
    pub server_addr: String,

    /// Delay between consecutive PrimeNumberDecomposition responses, in
    /// milliseconds.
    ///
    /// Environment variable: `PACE_MS`
    #[arg(long, env = "PACE_MS", default_value_t = 1000)]
    pub pace_ms: u64,

    /// Capacity of the response buffer between handler tasks and the gRPC
    /// stream.
    ///
    /// Environment variable: `STREAM_BUFFER_SIZE`
    #[arg(long, env = "STREAM_BUFFER_SIZE", default_value_t = 8)]
    pub stream_buffer_size: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub pace: Duration,
    pub stream_buffer_size: usize,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.stream_buffer_size == 0 {
            bail!("STREAM_BUFFER_SIZE must be greater than 0");
        }

        Ok(Self {
            server_addr: args.server_addr,
            pace: Duration::from_millis(args.pace_ms),
            stream_buffer_size: args.stream_buffer_size,
        })
    }
}
