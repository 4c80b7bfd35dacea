//! Fixed-size async worker pool over a pre-filled work queue.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

/// Runs `work` over every item with at most `workers` calls in flight.
///
/// Items are queued up front and shared by `min(workers, items.len())`
/// tasks. Every `Some` a call returns is forwarded on the returned channel,
/// which closes once the last worker exits. Workers stop taking items as
/// soon as `cancel` fires or the receiver is dropped, and an in-flight call
/// is dropped.
pub fn spawn_pool<T, R, F, Fut>(
    items: Vec<T>,
    workers: usize,
    cancel: CancellationToken,
    work: F,
) -> mpsc::UnboundedReceiver<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<R>> + Send + 'static,
{
    let (result_tx, result_rx) = mpsc::unbounded_channel::<R>();
    let worker_count: usize = workers.max(1).min(items.len());

    let (queue_tx, queue_rx) = mpsc::unbounded_channel::<T>();
    for item in items {
        let _ = queue_tx.send(item);
    }
    drop(queue_tx);

    let queue = Arc::new(Mutex::new(queue_rx));
    let work = Arc::new(work);

    for _ in 0..worker_count {
        let queue = Arc::clone(&queue);
        let work = Arc::clone(&work);
        let result_tx = result_tx.clone();
        let cancel = cancel.clone();

        tokio::spawn(async move {
            loop {
                if cancel.is_cancelled() || result_tx.is_closed() {
                    break;
                }

                let item = {
                    let mut rx = queue.lock().await;
                    rx.recv().await
                };
                let Some(item) = item else { break };

                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = result_tx.closed() => break,
                    outcome = (*work)(item) => outcome,
                };

                if let Some(result) = outcome {
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            }
        });
    }

    result_rx
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
