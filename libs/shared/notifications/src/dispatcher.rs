use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{MailTransport, OutgoingEmail};

pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Queues emails for a background worker so that request handlers never
/// wait on, or fail because of, the mail provider.
#[derive(Clone)]
pub struct EmailDispatcher {
    sender: mpsc::Sender<OutgoingEmail>,
}

/// Owned by `main`; awaiting it drains whatever is still queued once every
/// `EmailDispatcher` clone has been dropped.
pub struct DispatcherHandle {
    worker: JoinHandle<()>,
}

impl EmailDispatcher {
    pub fn spawn(transport: Arc<dyn MailTransport>, capacity: usize) -> (Self, DispatcherHandle) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(receiver, transport));

        (Self { sender }, DispatcherHandle { worker })
    }

    /// Enqueues without waiting. Returns false if the email was dropped.
    pub fn dispatch(&self, email: OutgoingEmail) -> bool {
        match self.sender.try_send(email) {
            Ok(()) => true,
            Err(TrySendError::Full(email)) => {
                warn!("Email queue full, dropping email to {}", email.to);
                false
            }
            Err(TrySendError::Closed(email)) => {
                warn!("Email dispatcher stopped, dropping email to {}", email.to);
                false
            }
        }
    }
}

impl DispatcherHandle {
    pub async fn drain(self) {
        if let Err(e) = self.worker.await {
            error!("Email dispatcher worker panicked: {}", e);
        }
    }
}

async fn run_worker(mut receiver: mpsc::Receiver<OutgoingEmail>, transport: Arc<dyn MailTransport>) {
    info!("Email dispatcher started");

    while let Some(email) = receiver.recv().await {
        debug!("Delivering email to {}", email.to);
        if let Err(e) = transport.send(&email).await {
            error!("Failed to send email to {}: {}", email.to, e);
        }
    }

    info!("Email dispatcher stopped");
}
