//! Driving a batch future while consuming its progress events.

use std::future::Future;

use tokio::sync::mpsc::UnboundedReceiver;

/// Run `task`, handing each event to `on_event` as it arrives, and return
/// the task's output.
///
/// Events the task queued before it returned are still delivered. Once the
/// task is done the channel is closed, so a sender that outlives it cannot
/// stall the caller.
pub async fn run_with_events<F, E, R>(task: F, mut events: UnboundedReceiver<E>, mut on_event: impl FnMut(E)) -> R
where
    F: Future<Output = R>,
{
    tokio::pin!(task);
    let mut seen = 0usize;

    let output = loop {
        tokio::select! {
            biased;
            Some(e) = events.recv() => {
                seen += 1;
                on_event(e);
            }
            r = &mut task => break r,
        }
    };

    events.close();
    while let Ok(e) = events.try_recv() {
        seen += 1;
        on_event(e);
    }
    log::debug!("Batch finished after {} events", seen);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_all_events_delivered_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = async move {
            for i in 0..10 {
                let _ = tx.send(i);
                tokio::task::yield_now().await;
            }
            "done"
        };

        let mut got = Vec::new();
        let out = run_with_events(task, rx, |e| got.push(e)).await;
        assert_eq!(out, "done");
        assert_eq!(got, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_events_queued_without_yield_are_drained() {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = async move {
            for i in 0..3 {
                let _ = tx.send(i);
            }
            5
        };

        let mut got = Vec::new();
        let out = run_with_events(task, rx, |e| got.push(e)).await;
        assert_eq!(out, 5);
        assert_eq!(got, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_sender_outliving_task_does_not_block() {
        let (tx, rx) = mpsc::unbounded_channel::<u32>();
        let _ = tx.send(1);
        let mut got = Vec::new();
        let out = run_with_events(async { 7 }, rx, |e| got.push(e)).await;
        assert_eq!(out, 7);
        assert_eq!(got, vec![1]);
        assert!(tx.send(2).is_err());
    }
}
