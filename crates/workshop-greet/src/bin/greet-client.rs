use clap::{Parser, Subcommand};
use core::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Channel;
use tonic::{Code, Request};
use workshop_core::exchange::{Inbound, Outbound, Received};
use workshop_core::greet::greet_service_client::GreetServiceClient;
use workshop_core::greet::{
    GreetEveryoneRequest, GreetManyTimesRequest, GreetRequest, GreetWithDeadlineRequest, Greeting,
    LongGreetRequest,
};

#[derive(Parser, Debug)]
#[command(name = "greet-client", version, about = "Demo client for the greet service")]
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
    /// Unary Greet call.
    Unary,
    /// Server-streaming GreetManyTimes call, drained to end-of-stream.
    ServerStreaming,
    /// Client-streaming LongGreet call: paced sends, then close and await
    /// the single aggregate reply.
    ClientStreaming,
    /// Bidirectional GreetEveryone call with concurrent send and receive
    /// tasks.
    Bidi,
    /// GreetWithDeadline with a caller-side timeout.
    Deadline {
        #[arg(long, default_value_t = 1000)]
        timeout_ms: u64,
    },
}

const NAMES: [&str; 4] = ["Ada", "Grace", "Edsger", "Barbara"];

fn greeting(first_name: &str) -> Greeting {
    Greeting {
        first_name: first_name.to_string(),
        last_name: String::new(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let pace = Duration::from_millis(cli.pace_ms);

    let mut client = GreetServiceClient::connect(cli.addr.clone()).await?;

    match cli.command {
        Command::Unary => greet_once(&mut client).await?,
        Command::ServerStreaming => greet_many_times(&mut client).await?,
        Command::ClientStreaming => long_greet(&mut client, pace).await?,
        Command::Bidi => greet_everyone(&mut client, pace).await?,
        Command::Deadline { timeout_ms } => {
            greet_with_deadline(&mut client, Duration::from_millis(timeout_ms)).await?;
        }
    }

    Ok(())
}

async fn greet_once(client: &mut GreetServiceClient<Channel>) -> anyhow::Result<()> {
    let response = client
        .greet(GreetRequest {
            greeting: Some(greeting("Ada")),
        })
        .await?;

    println!("Greet response: {}", response.into_inner().result);
    Ok(())
}

async fn greet_many_times(client: &mut GreetServiceClient<Channel>) -> anyhow::Result<()> {
    let mut stream = client
        .greet_many_times(GreetManyTimesRequest {
            greeting: Some(greeting("Ada")),
        })
        .await?
        .into_inner();

    while let Some(response) = stream.message().await? {
        println!("received: {}", response.result);
    }
    println!("reached end of stream");
    Ok(())
}

async fn long_greet(client: &mut GreetServiceClient<Channel>, pace: Duration) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel(4);

    let sender = tokio::spawn(async move {
        let mut outbound = Outbound::new(tx);
        for name in NAMES {
            println!("sending: {name}");
            outbound
                .send(LongGreetRequest {
                    greeting: Some(greeting(name)),
                })
                .await?;
            sleep(pace).await;
        }
        outbound.close_send();
        Ok::<(), workshop_core::Error>(())
    });

    let response = client.long_greet(ReceiverStream::new(rx)).await?;
    sender.await??;

    println!("LongGreet response: {}", response.into_inner().result);
    Ok(())
}

async fn greet_everyone(
    client: &mut GreetServiceClient<Channel>,
    pace: Duration,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel(4);
    let response = client.greet_everyone(ReceiverStream::new(rx)).await?;
    let mut inbound = Inbound::new(response.into_inner());

    let sender = tokio::spawn(async move {
        let mut outbound = Outbound::new(tx);
        for name in NAMES {
            println!("sending: {name}");
            outbound
                .send(GreetEveryoneRequest {
                    greeting: Some(greeting(name)),
                })
                .await?;
            sleep(pace).await;
        }
        outbound.close_send();
        Ok::<(), workshop_core::Error>(())
    });

    let receiver = tokio::spawn(async move {
        loop {
            match inbound.recv().await? {
                Received::Message(response) => println!("received: {}", response.result),
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

async fn greet_with_deadline(
    client: &mut GreetServiceClient<Channel>,
    timeout: Duration,
) -> anyhow::Result<()> {
    let mut request = Request::new(GreetWithDeadlineRequest {
        greeting: Some(greeting("Ada")),
    });
    request.set_timeout(timeout);

    match client.greet_with_deadline(request).await {
        Ok(response) => println!(
            "GreetWithDeadline response: {}",
            response.into_inner().result
        ),
        Err(status) if matches!(status.code(), Code::DeadlineExceeded | Code::Cancelled) => {
            println!("deadline was hit before the server finished");
        }
        Err(status) => return Err(status.into()),
    }
    Ok(())
}
