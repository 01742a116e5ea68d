use anyhow::bail;
use clap::Parser;
use core::time::Duration;

/// Runtime configuration for the `greet-server` binary.
///
/// All values are parsed from CLI arguments or environment variables.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "greet-server",
    version,
    about = "A gRPC greeting service demonstrating the four RPC shapes"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:50051"))]
    pub server_addr: String,

    /// Delay between consecutive GreetManyTimes responses, in milliseconds.
    ///
    /// Environment variable: `PACE_MS`
    #[arg(long, env = "PACE_MS", default_value_t = 1000)]
    pub pace_ms: u64,

    /// Number of simulated work increments performed by GreetWithDeadline.
    ///
    /// The caller's deadline is re-checked before each increment.
    ///
    /// Environment variable: `DEADLINE_WORK_INCREMENTS`
    #[arg(long, env = "DEADLINE_WORK_INCREMENTS", default_value_t = 3)]
    pub deadline_work_increments: u32,

    /// Duration of each GreetWithDeadline work increment, in milliseconds.
    ///
    /// Environment variable: `DEADLINE_STEP_MS`
    #[arg(long, env = "DEADLINE_STEP_MS", default_value_t = 1000)]
    pub deadline_step_ms: u64,

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
    pub deadline_work_increments: u32,
    pub deadline_step: Duration,
    pub stream_buffer_size: usize,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.deadline_work_increments == 0 {
            bail!("DEADLINE_WORK_INCREMENTS must be greater than 0");
        }
        if args.stream_buffer_size == 0 {
            bail!("STREAM_BUFFER_SIZE must be greater than 0");
        }

        Ok(Self {
            server_addr: args.server_addr,
            pace: Duration::from_millis(args.pace_ms),
            deadline_work_increments: args.deadline_work_increments,
            deadline_step: Duration::from_millis(args.deadline_step_ms),
            stream_buffer_size: args.stream_buffer_size,
        })
    }
}
