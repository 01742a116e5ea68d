//! Exchange loops for the streaming greet handlers.
//!
//! These are written against generic inbound streams rather than
//! `tonic::Streaming` directly so the per-message policies can be exercised
//! in isolation.

use futures::Stream;
use tonic::Status;
use workshop_core::exchange::{Inbound, Outbound, Received};
use workshop_core::greet::{GreetEveryoneRequest, GreetEveryoneResponse, LongGreetRequest};
use workshop_core::Error;

fn first_name(greeting: Option<workshop_core::greet::Greeting>) -> String {
    greeting.map(|g| g.first_name).unwrap_or_default()
}

/// Broadcast-echo loop for `GreetEveryone`.
///
/// Sends exactly one response per inbound greeting, in order, before
/// receiving the next message. The peer closing its send direction ends the
/// loop normally with no further sends.
pub async fn greet_each<S>(
    inbound: &mut Inbound<S>,
    outbound: &Outbound<Result<GreetEveryoneResponse, Status>>,
) -> Result<(), Error>
where
    S: Stream<Item = Result<GreetEveryoneRequest, Status>> + Unpin,
{
    loop {
        match inbound.recv().await {
            Ok(Received::Message(req)) => {
                let result = format!("Hello {}! ", first_name(req.greeting));
                outbound.send(Ok(GreetEveryoneResponse { result })).await?;
            }
            Ok(Received::EndOfStream) => return Ok(()),
            Err(status) => return Err(Error::internal(format!("receive failed: {status}"))),
        }
    }
}

/// Accumulation loop for `LongGreet`: one greeting line per inbound message,
/// returned as a single concatenated result once the client closes its send
/// direction.
pub async fn accumulate_greetings<S>(mut inbound: Inbound<S>) -> Result<String, Status>
where
    S: Stream<Item = Result<LongGreetRequest, Status>> + Unpin,
{
    let mut result = String::new();
    loop {
        match inbound.recv().await? {
            Received::Message(req) => {
                result.push_str(&format!("Hello {}! \n", first_name(req.greeting)));
            }
            Received::EndOfStream => return Ok(result),
        }
    }
}
