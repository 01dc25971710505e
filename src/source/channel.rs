use tokio::sync::mpsc;

/// Sending half of the URL channel
///
/// Sends block the calling thread, so this half belongs to the blocking
/// source task.
#[derive(Debug, Clone)]
pub enum UrlSender {
    Unbounded(mpsc::UnboundedSender<String>),
    Bounded(mpsc::Sender<String>),
}

/// Receiving half of the URL channel
#[derive(Debug)]
pub enum UrlReceiver {
    Unbounded(mpsc::UnboundedReceiver<String>),
    Bounded(mpsc::Receiver<String>),
}

/// Creates the URL channel
///
/// `None` gives an unbounded channel; `Some(n)` bounds it to `n` queued URLs
/// so a large provider cannot outrun the fetcher without limit.
pub fn url_channel(capacity: Option<usize>) -> (UrlSender, UrlReceiver) {
    match capacity {
        Some(capacity) => {
            let (tx, rx) = mpsc::channel(capacity.max(1));
            (UrlSender::Bounded(tx), UrlReceiver::Bounded(rx))
        }
        None => {
            let (tx, rx) = mpsc::unbounded_channel();
            (UrlSender::Unbounded(tx), UrlReceiver::Unbounded(rx))
        }
    }
}

impl UrlSender {
    /// Sends a URL, waiting for room on a bounded channel
    ///
    /// Must not be called from inside an async task. Returns false when the
    /// receiver is gone.
    pub fn send_blocking(&self, url: String) -> bool {
        match self {
            Self::Unbounded(tx) => tx.send(url).is_ok(),
            Self::Bounded(tx) => tx.blocking_send(url).is_ok(),
        }
    }
}

impl UrlReceiver {
    /// Receives the next URL; `None` once the source has closed
    pub async fn recv(&mut self) -> Option<String> {
        match self {
            Self::Unbounded(rx) => rx.recv().await,
            Self::Bounded(rx) => rx.recv().await,
        }
    }
}
