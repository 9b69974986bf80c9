//! Trailing-edge debouncer for search input.
//!
//! Values pushed in quick succession collapse into one call with the latest
//! value, made once the input has been quiet for the configured window.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(400);

pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the debounce loop on the current tokio runtime. `on_fire` runs
    /// on that task with each settled value.
    #[must_use]
    pub fn spawn<F>(window: Duration, on_fire: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(rx, window, on_fire));
        Self { tx, task }
    }

    /// Records a new input value. Returns `false` once the loop has stopped.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }

    /// Stops accepting input, fires any pending value, and waits for the loop
    /// to finish.
    pub async fn close(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "debounce task ended abnormally");
        }
    }
}

async fn run<T, F>(mut rx: mpsc::UnboundedReceiver<T>, window: Duration, mut on_fire: F)
where
    F: FnMut(T),
{
    let mut pending: Option<T> = None;
    loop {
        if pending.is_none() {
            match rx.recv().await {
                Some(value) => pending = Some(value),
                None => return,
            }
            continue;
        }

        tokio::select! {
            next = rx.recv() => match next {
                Some(value) => pending = Some(value),
                None => {
                    if let Some(value) = pending.take() {
                        on_fire(value);
                    }
                    return;
                }
            },
            () = tokio::time::sleep(window) => {
                if let Some(value) = pending.take() {
                    on_fire(value);
                }
            }
        }
    }
}
