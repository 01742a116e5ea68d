//! Duplex streaming primitives used by the bidirectional handlers and the
//! client binaries.
//!
//! A duplex gRPC call carries two independent directions: a send direction
//! and a receive direction. Each direction closes exactly once and never
//! reopens; the peer observes closure as an explicit end-of-data signal, not
//! an error. [`Outbound`] wraps the send direction and enforces the
//! close-once contract, while [`Inbound`] wraps the receive direction and
//! turns stream exhaustion into a sticky [`Received::EndOfStream`].
//!
//! Both sides of a call run their send loop and receive loop as separate
//! tokio tasks that communicate only through these handles and are joined
//! before the call is released.

use crate::Error;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tonic::Status;

/// One step of the receive direction: either the next message or the peer's
/// end-of-stream signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received<T> {
    Message(T),
    EndOfStream,
}

/// Send half of a duplex exchange.
///
/// Wraps a bounded channel feeding the transport. Closing the send direction
/// is idempotent; sending afterwards fails with [`Error::StreamClosed`].
pub struct Outbound<T> {
    tx: Option<mpsc::Sender<T>>,
}

impl<T> Outbound<T> {
    pub fn new(tx: mpsc::Sender<T>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Enqueues one message for transmission.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StreamClosed`] if [`close_send`](Self::close_send)
    /// was already called, or [`Error::Internal`] if the peer dropped its
    /// receive direction.
    pub async fn send(&self, message: T) -> Result<(), Error> {
        let tx = self.tx.as_ref().ok_or(Error::StreamClosed)?;
        tx.send(message)
            .await
            .map_err(|_| Error::internal("peer closed the receive direction"))
    }

    /// Signals the peer that no further messages will be sent. Idempotent.
    pub fn close_send(&mut self) {
        self.tx = None;
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

/// Receive half of a duplex exchange.
///
/// Once the peer's send direction closes, every subsequent call to
/// [`recv`](Self::recv) yields [`Received::EndOfStream`] again without
/// blocking.
pub struct Inbound<S> {
    stream: S,
    finished: bool,
}

impl<S, T> Inbound<S>
where
    S: Stream<Item = core::result::Result<T, Status>> + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            finished: false,
        }
    }

    /// Suspends until the next inbound message is available or the peer has
    /// closed its send direction.
    ///
    /// # Errors
    ///
    /// A transport-level failure is returned as-is and also terminates the
    /// exchange: later calls report end-of-stream.
    pub async fn recv(&mut self) -> core::result::Result<Received<T>, Status> {
        if self.finished {
            return Ok(Received::EndOfStream);
        }
        match self.stream.next().await {
            Some(Ok(message)) => Ok(Received::Message(message)),
            Some(Err(status)) => {
                self.finished = true;
                Err(status)
            }
            None => {
                self.finished = true;
                Ok(Received::EndOfStream)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recv_after_end_of_stream_is_sticky() {
        let mut inbound = Inbound::new(tokio_stream::iter(vec![Ok(1_u32), Ok(2)]));

        assert_eq!(inbound.recv().await.unwrap(), Received::Message(1));
        assert_eq!(inbound.recv().await.unwrap(), Received::Message(2));
        assert_eq!(inbound.recv().await.unwrap(), Received::EndOfStream);
        // Exhaustion never blocks and never turns into an error.
        assert_eq!(inbound.recv().await.unwrap(), Received::EndOfStream);
        assert_eq!(inbound.recv().await.unwrap(), Received::EndOfStream);
    }

    #[tokio::test]
    async fn transport_error_terminates_the_exchange() {
        let items: Vec<Result<u32, Status>> = vec![Ok(7), Err(Status::internal("wire failure"))];
        let mut inbound = Inbound::new(tokio_stream::iter(items));

        assert_eq!(inbound.recv().await.unwrap(), Received::Message(7));
        assert!(inbound.recv().await.is_err());
        assert_eq!(inbound.recv().await.unwrap(), Received::EndOfStream);
    }

    #[tokio::test]
    async fn close_send_is_idempotent_and_rejects_later_sends() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut outbound = Outbound::new(tx);

        outbound.send(42_u32).await.unwrap();
        outbound.close_send();
        outbound.close_send();
        assert!(outbound.is_closed());
        assert!(matches!(
            outbound.send(43).await,
            Err(Error::StreamClosed)
        ));

        // The message sent before closure is still delivered, followed by
        // the end-of-data signal.
        assert_eq!(rx.recv().await, Some(42));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn send_to_a_departed_peer_is_internal() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let outbound = Outbound::new(tx);

        assert!(matches!(
            outbound.send(1_u32).await,
            Err(Error::Internal { .. })
        ));
    }
}
