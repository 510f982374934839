use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::client::JobsClient;
use crate::error::FeedError;
use crate::models::JobPosting;

type Outcome = Result<Vec<JobPosting>, FeedError>;

/// Retrieval progress of the job feed.
///
/// Starts in `Loading` and moves to exactly one of `Loaded` or `Failed`.
/// Both of those are terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeedState {
    #[default]
    Loading,
    Loaded(Vec<JobPosting>),
    Failed,
}

impl FeedState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FeedState::Loading)
    }

    /// Postings in service order; empty unless loaded.
    pub fn postings(&self) -> &[JobPosting] {
        match self {
            FeedState::Loaded(postings) => postings,
            _ => &[],
        }
    }

    pub fn count(&self) -> usize {
        self.postings().len()
    }

    fn load(&mut self, postings: Vec<JobPosting>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = FeedState::Loaded(postings);
        true
    }

    fn fail(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = FeedState::Failed;
        true
    }
}

/// Owns the feed state for one on-screen lifetime and runs the loader for it.
///
/// `mount` fires the request once. The result comes back over a oneshot
/// channel and is applied by `poll` or `settled`. After `unmount` (or drop)
/// a late result is discarded without touching the state.
pub struct FeedView {
    state: FeedState,
    client: JobsClient,
    fired: bool,
    alive: Arc<AtomicBool>,
    pending: Option<oneshot::Receiver<Outcome>>,
}

impl FeedView {
    pub fn new(client: JobsClient) -> Self {
        Self {
            state: FeedState::Loading,
            client,
            fired: false,
            alive: Arc::new(AtomicBool::new(true)),
            pending: None,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Start the one request for this view. Must be called inside a Tokio runtime.
    pub fn mount(&mut self) {
        if self.fired {
            tracing::debug!("job feed already requested for this view");
            return;
        }
        if !self.is_mounted() {
            tracing::debug!("view already torn down, not requesting job feed");
            return;
        }
        self.fired = true;

        let (tx, rx) = oneshot::channel();
        self.pending = Some(rx);

        let client = self.client.clone();
        let alive = Arc::clone(&self.alive);
        tokio::spawn(async move {
            let outcome = client.list_jobs().await;
            if let Err(err) = &outcome {
                report_failure(err);
            }

            if !alive.load(Ordering::Acquire) {
                tracing::debug!("job feed resolved after teardown, dropping result");
                return;
            }
            if tx.send(outcome).is_err() {
                tracing::debug!("job feed receiver gone, dropping result");
            }
        });
    }

    /// Apply the loader's result if it has arrived. Returns whether the state changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.pending.as_mut() else {
            return false;
        };
        let delivered = match rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => None,
        };
        self.pending = None;
        self.resolve(delivered)
    }

    /// Wait for the loader to finish and return the resulting state.
    pub async fn settled(&mut self) -> &FeedState {
        if let Some(rx) = self.pending.take() {
            let delivered = rx.await.ok();
            self.resolve(delivered);
        }
        &self.state
    }

    pub fn unmount(&mut self) {
        self.alive.store(false, Ordering::Release);
        self.pending = None;
    }

    fn resolve(&mut self, delivered: Option<Outcome>) -> bool {
        if !self.is_mounted() {
            return false;
        }
        match delivered {
            Some(Ok(postings)) => {
                tracing::info!(count = postings.len(), "job feed loaded");
                self.state.load(postings)
            }
            // already reported by the loader task
            Some(Err(_)) => self.state.fail(),
            None => {
                tracing::warn!("job feed loader stopped without a result");
                self.state.fail()
            }
        }
    }
}

impl Drop for FeedView {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn report_failure(err: &FeedError) {
    tracing::error!(
        kind = err.kind().as_str(),
        status = ?err.status(),
        "Backend connection failed: {}",
        err
    );
}
