use clap::{Parser, Subcommand};
use core::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Channel;
use tonic::Code;
use workshop_core::calculator::calculator_service_client::CalculatorServiceClient;
use workshop_core::calculator::{
    ComputeAverageRequest, FindMaximumRequest, PrimeNumberDecompositionRequest, SquareRootRequest,
    SumRequest,
};
use workshop_core::exchange::{Inbound, Outbound, Received};

#[derive(Parser, Debug)]
#[command(name = "calc-client", version, about = "Demo client for the calculator service")]
struct Cli {
    /// Server endpoint.
    #[arg(long, env = "SERVER_URL", default_value = "http://127.0.0.1:50051")]
    addr: String,

    /// Delay between consecutive streamed requests, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pace_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Unary Sum call.
    Sum {
        #[arg(default_value_t = 23)]
        first: i32,
        #[arg(default_value_t = 60)]
        second: i32,
    },
    /// Server-streaming PrimeNumberDecomposition call.
    Primes {
        #[arg(default_value_t = 120)]
        number: i64,
    },
    /// Client-streaming ComputeAverage call over 1..=4.
    Average,
    /// Bidirectional FindMaximum call with concurrent send and receive
    /// tasks.
    Maximum,
    /// SquareRoot demos: one valid call and one rejected negative call.
    SquareRoot,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let pace = Duration::from_millis(cli.pace_ms);

    let mut client = CalculatorServiceClient::connect(cli.addr.clone()).await?;

    match cli.command {
        Command::Sum { first, second } => sum(&mut client, first, second).await?,
        Command::Primes { number } => primes(&mut client, number).await?,
        Command::Average => compute_average(&mut client, pace).await?,
        Command::Maximum => find_maximum(&mut client, pace).await?,
        Command::SquareRoot => {
            square_root(&mut client, 2).await?;
            square_root(&mut client, -32).await?;
        }
    }

    Ok(())
}

async fn sum(
    client: &mut CalculatorServiceClient<Channel>,
    first: i32,
    second: i32,
) -> anyhow::Result<()> {
    let response = client
        .sum(SumRequest {
            first_number: first,
            second_number: second,
        })
        .await?;

    println!("Sum response: {}", response.into_inner().sum_result);
    Ok(())
}

async fn primes(client: &mut CalculatorServiceClient<Channel>, number: i64) -> anyhow::Result<()> {
    let mut stream = client
        .prime_number_decomposition(PrimeNumberDecompositionRequest { number })
        .await?
        .into_inner();

    while let Some(response) = stream.message().await? {
        println!("prime factor: {}", response.prime_factor);
    }
    println!("reached end of stream");
    Ok(())
}

async fn compute_average(
    client: &mut CalculatorServiceClient<Channel>,
    pace: Duration,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel(4);

    let sender = tokio::spawn(async move {
        let mut outbound = Outbound::new(tx);
        for number in 1..=4 {
            println!("sending: {number}");
            outbound.send(ComputeAverageRequest { number }).await?;
            sleep(pace).await;
        }
        outbound.close_send();
        Ok::<(), workshop_core::Error>(())
    });

    let response = client.compute_average(ReceiverStream::new(rx)).await?;
    sender.await??;

    println!("ComputeAverage response: {}", response.into_inner().average);
    Ok(())
}

async fn find_maximum(
    client: &mut CalculatorServiceClient<Channel>,
    pace: Duration,
) -> anyhow::Result<()> {
    let numbers = [1, 5, 3, 6, 2, 20];

    let (tx, rx) = mpsc::channel(4);
    let response = client.find_maximum(ReceiverStream::new(rx)).await?;
    let mut inbound = Inbound::new(response.into_inner());

    let sender = tokio::spawn(async move {
        let mut outbound = Outbound::new(tx);
        for number in numbers {
            println!("sending: {number}");
            outbound.send(FindMaximumRequest { number }).await?;
            sleep(pace).await;
        }
        outbound.close_send();
        Ok::<(), workshop_core::Error>(())
    });

    let receiver = tokio::spawn(async move {
        loop {
            match inbound.recv().await? {
                Received::Message(response) => println!("new maximum: {}", response.maximum),
                Received::EndOfStream => return Ok::<(), tonic::Status>(()),
            }
        }
    });

    // Both halves of the exchange must finish before the call is released.
    let (sent, received) = tokio::try_join!(sender, receiver)?;
    sent?;
    received?;
    Ok(())
}

async fn square_root(
    client: &mut CalculatorServiceClient<Channel>,
    number: i32,
) -> anyhow::Result<()> {
    match client.square_root(SquareRootRequest { number }).await {
        Ok(response) => println!(
            "square root of {number} is {}",
            response.into_inner().number_root
        ),
        Err(status) if status.code() == Code::InvalidArgument => {
            println!("server rejected {number}: {}", status.message());
        }
        Err(status) => return Err(status.into()),
    }
    Ok(())
}
