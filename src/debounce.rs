//! Trailing-edge debounce.
//!
//! A [`Debouncer`] takes a stream of values and publishes the latest one on a
//! `watch` channel once no new value has arrived for `delay`.
//!
//! ```ignore
//! let (search, mut settled) = Debouncer::new(String::new(), Duration::from_millis(300));
//! search.set("buy".to_string());
//! search.set("buy milk".to_string());
//! settled.changed().await?; // "buy milk", 300 ms after the last keystroke
//! ```

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Debounces values of `T`. Dropping it cancels any pending publication.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<(T, Instant)>,
    settled: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Starts the debounce task. `initial` is the settled value until the first publication.
    pub fn new(initial: T, delay: Duration) -> (Self, watch::Receiver<T>) {
        let (input, receiver) = mpsc::unbounded_channel();
        let (publisher, settled) = watch::channel(initial);
        let task = tokio::spawn(Self::run(receiver, publisher, delay));

        let debouncer = Self {
            input,
            settled: settled.clone(),
            task,
        };
        (debouncer, settled)
    }

    /// Feeds a new value, restarting the timer.
    pub fn set(&self, value: T) {
        // Only fails once the task is gone, i.e. after drop.
        let _ = self.input.send((value, Instant::now()));
    }

    /// Another receiver for the settled values.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.settled.clone()
    }

    /// The value most recently published.
    pub fn settled(&self) -> T {
        self.settled.borrow().clone()
    }

    async fn run(
        mut input: mpsc::UnboundedReceiver<(T, Instant)>,
        publisher: watch::Sender<T>,
        delay: Duration,
    ) {
        let mut pending: Option<(T, Instant)> = None;

        loop {
            match pending.take() {
                None => match input.recv().await {
                    Some((value, at)) => pending = Some((value, at + delay)),
                    None => return,
                },
                Some((value, deadline)) => {
                    tokio::select! {
                        biased;
                        next = input.recv() => match next {
                            Some((next, at)) => pending = Some((next, at + delay)),
                            None => return,
                        },
                        _ = sleep_until(deadline) => {
                            // A value sent on the same tick as the deadline still counts.
                            tokio::task::yield_now().await;
                            if let Ok((next, at)) = input.try_recv() {
                                pending = Some((next, at + delay));
                                continue;
                            }
                            trace!("Debounce settled");
                            publisher.send_if_modified(|current| {
                                if *current == value {
                                    false
                                } else {
                                    *current = value;
                                    true
                                }
                            });
                        }
                    }
                }
            }
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_settles_once_on_trailing_edge() {
        let start = Instant::now();
        let (debouncer, mut settled) = Debouncer::new(String::new(), Duration::from_millis(300));

        debouncer.set("a".to_string());
        advance(Duration::from_millis(100)).await;
        debouncer.set("ab".to_string());
        advance(Duration::from_millis(300)).await;
        debouncer.set("abc".to_string());

        settled.changed().await.unwrap();
        assert_eq!(*settled.borrow_and_update(), "abc");
        assert_eq!(start.elapsed(), Duration::from_millis(700));

        // Nothing else is pending.
        let more = tokio::time::timeout(Duration::from_secs(5), settled.changed()).await;
        assert!(more.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_leading_edge() {
        let (debouncer, settled) = Debouncer::new(0u32, Duration::from_millis(300));
        debouncer.set(1);
        advance(Duration::from_millis(299)).await;

        assert_eq!(*settled.borrow(), 0);
        assert_eq!(debouncer.settled(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_equal_value_is_not_republished() {
        let (debouncer, mut settled) = Debouncer::new(5u32, Duration::from_millis(50));
        debouncer.set(5);

        let changed = tokio::time::timeout(Duration::from_secs(1), settled.changed()).await;
        assert!(changed.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_timer() {
        let (debouncer, mut settled) = Debouncer::new(0u32, Duration::from_millis(300));
        debouncer.set(1);
        advance(Duration::from_millis(100)).await;
        drop(debouncer);

        // The sender side is gone, so `changed` errors instead of yielding a value.
        assert!(settled.changed().await.is_err());
        assert_eq!(*settled.borrow(), 0);
    }
}
