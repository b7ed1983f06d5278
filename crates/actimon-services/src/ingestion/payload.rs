use std::io;

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::mpsc;

/// Owned upload body handed to the storage backend
pub type PayloadStream = BoxStream<'static, io::Result<Bytes>>;

/// Producing half of [`payload_channel`]
#[derive(Clone)]
pub struct PayloadSender {
    tx: mpsc::Sender<io::Result<Bytes>>,
}

impl PayloadSender {
    /// Push one chunk. Returns false once the consumer has gone away.
    pub async fn send(&self, chunk: Bytes) -> bool {
        self.tx.send(Ok(chunk)).await.is_ok()
    }

    /// Abort the stream; the consumer sees `err` as its next item.
    pub async fn fail(&self, err: io::Error) {
        let _ = self.tx.send(Err(err)).await;
    }
}

/// Bounded bridge from a borrowed body source into a `'static` stream.
///
/// At most `capacity` chunks are buffered; the stream ends when every sender is dropped.
pub fn payload_channel(capacity: usize) -> (PayloadSender, PayloadStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let stream = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    })
    .boxed();

    (PayloadSender { tx }, stream)
}
