//! Settling stage between input-change events and query dispatch. Search
//! fields emit on every keystroke; dispatching a backend fetch per
//! keystroke is redundant load, so inputs are debounced: a value is
//! forwarded only once `delay` passes with nothing newer, and the final
//! forwarded value always equals the latest input.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

pub fn debounce<T: Send + 'static>(
    mut input: mpsc::Receiver<T>,
    delay: Duration,
) -> mpsc::Receiver<T> {
    let (tx, output) = mpsc::channel(1);

    tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            match pending.take() {
                None => match input.recv().await {
                    Some(value) => pending = Some(value),
                    None => break,
                },
                Some(value) => {
                    tokio::select! {
                        next = input.recv() => match next {
                            // Newer input supersedes the held value.
                            Some(newer) => pending = Some(newer),
                            None => {
                                // Input closed: the held value is the
                                // settled query, flush it.
                                let _ = tx.send(value).await;
                                break;
                            }
                        },
                        _ = sleep(delay) => {
                            if tx.send(value).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        }
    });

    output
}
