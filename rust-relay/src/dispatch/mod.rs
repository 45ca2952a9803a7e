//! Fire-and-forget card dispatch.
//!
//! The webhook handler hands a [`CardJob`] to the [`Dispatcher`] and responds
//! immediately. The card call runs as a detached task:
//!
//! ```text
//! Webhook → CardJob → Dispatcher::dispatch → TaskSpawner → TrelloClient::create_card
//! ```
//!
//! The only ordering guarantee is that the handler does not await the task.
//! On a multi-threaded runtime the call can start, or complete, before the
//! webhook response is written; nothing depends on either order.
//!
//! There is no result or error channel back to the webhook caller. A failed
//! card call is logged and dropped; it is never retried and `return_url` is
//! never notified.

pub mod card;
pub mod trello;

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{error, info};

pub use card::{CardDraft, CardJob, TrelloCredentials, DEFAULT_AUTHOR, DEFAULT_CARD_NAME};
pub use trello::{DispatchError, TrelloClient};

/// Something that can run a detached unit of work.
pub trait TaskSpawner: Send + Sync {
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

/// Spawns onto the ambient tokio runtime. The task may run on another worker
/// thread immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl TaskSpawner for TokioSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        tokio::spawn(task);
    }
}

/// Schedules card creation off the request path.
#[derive(Clone)]
pub struct Dispatcher {
    trello: TrelloClient,
    spawner: Arc<dyn TaskSpawner>,
}

impl Dispatcher {
    pub fn new(trello: TrelloClient) -> Self {
        Self::with_spawner(trello, Arc::new(TokioSpawner))
    }

    pub fn with_spawner(trello: TrelloClient, spawner: Arc<dyn TaskSpawner>) -> Self {
        Self { trello, spawner }
    }

    /// Schedule one card creation and return without awaiting it.
    pub fn dispatch(&self, job: CardJob) {
        info!(
            channel_id = %job.channel_id,
            list_id = %job.credentials.list_id,
            card_name_length = job.card.name.len(),
            "trello_card_dispatched"
        );

        let trello = self.trello.clone();
        self.spawner.spawn(Box::pin(async move {
            run_card_job(&trello, &job).await;
        }));
    }
}

/// Body of the detached task: one attempt, outcome logged only.
async fn run_card_job(trello: &TrelloClient, job: &CardJob) {
    match trello.create_card(job).await {
        Ok(()) => {
            info!(
                channel_id = %job.channel_id,
                list_id = %job.credentials.list_id,
                "trello_card_created"
            );
        }
        Err(e) => {
            let (is_timeout, status) = match &e {
                DispatchError::Request(err) => (err.is_timeout(), None),
                DispatchError::Status { status, .. } => (false, Some(status.as_u16())),
            };
            error!(
                channel_id = %job.channel_id,
                list_id = %job.credentials.list_id,
                status_code = ?status,
                is_timeout = is_timeout,
                error = %e,
                "trello_card_failed"
            );
        }
    }
}
