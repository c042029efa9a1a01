//! Paginated account streams
//!
//! A list operation runs as its own tokio task. The task fetches pages,
//! publishes their items into a bounded queue and follows `links.next` until
//! the last page, an error, or a stop request. The consumer reads the queue
//! through [`AccountStream`], which implements [`futures::Stream`].
//!
//! The producer writes the final error (or its absence) into a one-shot slot
//! strictly before it drops the queue sender, so once the consumer has seen
//! the end of the stream, [`AccountStream::error`] is settled.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use accountapi_core::retry::Pacer;
use futures::{Stream, StreamExt};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::warn;

use crate::{
    client::Client,
    error::{Error, Result},
    observability::StreamContext,
    types::{Account, AccountPage},
};

/// Consumer side of one paginated list operation.
///
/// Dropping the stream stops the producer.
///
/// # Example
///
/// ```rust,no_run
/// use futures::StreamExt;
///
/// # async fn example(client: accountapi::Client) -> accountapi::Result<()> {
/// let mut stream = client.accounts().list([("country", "GB")]).await?;
/// while let Some(account) = stream.next().await {
///     println!("{}", account.id);
/// }
/// if let Some(err) = stream.error() {
///     eprintln!("listing ended early: {err}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct AccountStream {
    items: mpsc::Receiver<Account>,
    stop: Arc<watch::Sender<bool>>,
    error_slot: Option<oneshot::Receiver<Option<Error>>>,
    outcome: Option<Option<Error>>,
}

impl AccountStream {
    /// Request the producer to stop.
    ///
    /// Never blocks and may be called any number of times. Items already
    /// queued can still be read; the stream then ends without an error.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    /// A handle that can stop this stream from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            stop: Arc::clone(&self.stop),
        }
    }

    /// Whether the end of the stream has been observed.
    pub fn is_closed(&self) -> bool {
        self.outcome.is_some()
    }

    /// The error that ended the stream.
    ///
    /// `None` while the stream is still open, and after a clean end or a
    /// stop.
    pub fn error(&self) -> Option<&Error> {
        self.outcome.as_ref().and_then(Option::as_ref)
    }

    /// Drain the stream, returning every item or the error that ended it.
    pub async fn collect_all(mut self) -> Result<Vec<Account>> {
        let mut accounts = Vec::new();
        while let Some(account) = self.next().await {
            accounts.push(account);
        }
        match self.outcome.take().flatten() {
            Some(err) => Err(err),
            None => Ok(accounts),
        }
    }

    fn finish(&mut self) -> Option<Error> {
        let mut slot = self.error_slot.take()?;
        match slot.try_recv() {
            Ok(outcome) => outcome,
            Err(_) => Some(Error::transport("account stream producer terminated unexpectedly")),
        }
    }
}

impl Stream for AccountStream {
    type Item = Account;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Account>> {
        if self.outcome.is_some() {
            return Poll::Ready(None);
        }
        match self.items.poll_recv(cx) {
            Poll::Ready(Some(account)) => Poll::Ready(Some(account)),
            Poll::Ready(None) => {
                let outcome = self.finish();
                self.outcome = Some(outcome);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for AccountStream {
    fn drop(&mut self) {
        self.stop.send_replace(true);
    }
}

impl std::fmt::Debug for AccountStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStream")
            .field("closed", &self.is_closed())
            .field("error", &self.error())
            .finish_non_exhaustive()
    }
}

/// Cloneable handle that stops an [`AccountStream`].
#[derive(Debug, Clone)]
pub struct StopHandle {
    stop: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// Request the producer to stop. Non-blocking and idempotent.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }
}

/// Settings for one stream session.
#[derive(Debug, Clone)]
pub(crate) struct StreamOptions {
    pub capacity: usize,
    pub wait_for_first_page: bool,
}

/// Spawn the producer for `first_target` and return the consumer side.
///
/// With `wait_for_first_page`, returns only after the first fetch finished
/// and surfaces its error directly.
pub(crate) async fn spawn(
    client: Client,
    first_target: String,
    options: StreamOptions,
) -> Result<AccountStream> {
    let (queue, items) = mpsc::channel(options.capacity.max(1));
    let (stop_tx, stop_rx) = watch::channel(false);
    let (error_tx, error_rx) = oneshot::channel();
    let (ready_tx, ready_rx) = if options.wait_for_first_page {
        let (tx, rx) = oneshot::channel();
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };

    let mut producer = Producer {
        pacer: Pacer::new(client.page_backoff()),
        client,
        queue,
        stop: stop_rx,
        ready: ready_tx,
    };

    tokio::spawn(async move {
        let outcome = producer.run(first_target).await;
        let _ = error_tx.send(outcome);
        drop(producer);
    });

    let stream = AccountStream {
        items,
        stop: Arc::new(stop_tx),
        error_slot: Some(error_rx),
        outcome: None,
    };

    if let Some(ready) = ready_rx {
        match ready.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(err),
            Err(_) => {
                return Err(Error::transport(
                    "account stream producer terminated before the first page",
                ));
            }
        }
    }

    Ok(stream)
}

struct Producer {
    client: Client,
    pacer: Pacer,
    queue: mpsc::Sender<Account>,
    stop: watch::Receiver<bool>,
    ready: Option<oneshot::Sender<Result<()>>>,
}

impl Producer {
    /// Drive the session to its end. Returns the error that ended it, if any.
    async fn run(&mut self, first_target: String) -> Option<Error> {
        let mut ctx = StreamContext::start(&first_target);
        let mut target = Some(first_target);

        while let Some(current) = target.take() {
            if self.is_stopped() {
                ctx.log_stopped();
                return None;
            }

            tokio::select! {
                biased;
                _ = stopped(&mut self.stop) => {
                    ctx.log_stopped();
                    return None;
                }
                _ = self.pacer.pace() => {}
            }

            let page = tokio::select! {
                biased;
                _ = stopped(&mut self.stop) => {
                    ctx.log_stopped();
                    return None;
                }
                page = fetch_page(&self.client, &current) => page,
            };

            let page = match page {
                Ok(page) => {
                    self.signal_ready(Ok(()));
                    page
                }
                Err(err) => {
                    ctx.log_error(&err);
                    self.signal_ready(Err(err.clone()));
                    return Some(err);
                }
            };

            target = page.next_page().map(str::to_string);
            ctx.log_page(page.data.len(), target.is_some());

            for account in page.data {
                tokio::select! {
                    biased;
                    _ = stopped(&mut self.stop) => {
                        ctx.log_stopped();
                        return None;
                    }
                    sent = self.queue.send(account) => {
                        if sent.is_err() {
                            // Consumer went away.
                            ctx.log_stopped();
                            return None;
                        }
                        ctx.record_item();
                    }
                }
            }
        }

        ctx.log_complete();
        None
    }

    fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }

    fn signal_ready(&mut self, result: Result<()>) {
        if let Some(ready) = self.ready.take()
            && ready.send(result).is_err()
        {
            warn!("list caller went away before the first page arrived");
        }
    }
}

/// Resolves once a stop was requested or every stopper is gone.
async fn stopped(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}

async fn fetch_page(client: &Client, target: &str) -> Result<AccountPage> {
    client
        .json_request::<()>(http::Method::GET, target, None)
        .await?
        .decode()
}
