/// Background notification queue for status-change emails.
///
/// Handlers enqueue without blocking; a single worker task drains the
/// queue and talks to SMTP. Counters expose queue health for tests and
/// the dashboard without a metrics dependency.
use crate::{appointments::AppointmentStatus, mailer::Mailer};
use chrono::{DateTime, Utc};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::mpsc;

const QUEUE_CAPACITY: usize = 256;

/// A unit of deferred work for the notification worker.
#[derive(Debug, Clone)]
pub enum Notification {
    StatusChange {
        status: AppointmentStatus,
        name: String,
        email: String,
        doctor: String,
        date: DateTime<Utc>,
        phone: String,
    },
}

/// Handle shared across handlers. Cheap to clone.
pub struct Notifier {
    tx: mpsc::Sender<Notification>,
    enqueued: Arc<AtomicU64>,
    sent: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl Notifier {
    /// Spawn the worker task and return the handle used to enqueue.
    pub fn start(mailer: Arc<Mailer>) -> Self {
        let (tx, mut rx) = mpsc::channel::<Notification>(QUEUE_CAPACITY);

        let enqueued = Arc::new(AtomicU64::new(0));
        let sent = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicU64::new(0));

        let worker_sent = sent.clone();
        let worker_failed = failed.clone();

        tokio::spawn(async move {
            while let Some(notification) = rx.recv().await {
                match deliver(&mailer, notification).await {
                    Ok(()) => {
                        worker_sent.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        worker_failed.fetch_add(1, Ordering::Relaxed);
                        tracing::error!("Notification delivery failed: {}", e);
                    }
                }
            }
            tracing::debug!("Notification worker shutting down");
        });

        Self {
            tx,
            enqueued,
            sent,
            failed,
        }
    }

    /// Non-blocking enqueue. A full queue drops the notification with a
    /// warning rather than stalling the request that triggered it.
    pub fn enqueue(&self, notification: Notification) {
        match self.tx.try_send(notification) {
            Ok(()) => {
                self.enqueued.fetch_add(1, Ordering::Relaxed);
            }
            Err(mpsc::error::TrySendError::Full(n)) => {
                tracing::warn!("Notification queue full, dropping {:?}", n);
            }
            Err(mpsc::error::TrySendError::Closed(n)) => {
                tracing::warn!("Notification worker gone, dropping {:?}", n);
            }
        }
    }

    pub fn enqueued_count(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

async fn deliver(mailer: &Mailer, notification: Notification) -> crate::error::ClinicResult<()> {
    match notification {
        Notification::StatusChange {
            status,
            name,
            email,
            doctor,
            date,
            phone,
        } => {
            mailer
                .send_status_update(status, &email, &name, &doctor, &date, &phone)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(status: AppointmentStatus) -> Notification {
        Notification::StatusChange {
            status,
            name: "Alice".into(),
            email: "alice@example.com".into(),
            doctor: "Dr. Smith".into(),
            date: Utc::now(),
            phone: "555-0100".into(),
        }
    }

    #[tokio::test]
    async fn unconfigured_mailer_counts_as_sent() {
        let mailer = Arc::new(Mailer::new(None).unwrap());
        let notifier = Notifier::start(mailer);

        notifier.enqueue(notification(AppointmentStatus::Rescheduled));
        notifier.enqueue(notification(AppointmentStatus::Completed));

        // Give the worker a moment to drain.
        for _ in 0..50 {
            if notifier.sent_count() == 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert_eq!(notifier.enqueued_count(), 2);
        assert_eq!(notifier.sent_count(), 2);
        assert_eq!(notifier.failed_count(), 0);
    }
}
