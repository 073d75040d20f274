//! Event delivery: immediate forwarding or queue-and-flush batching.
//!
//! The mode is fixed when the monitor is constructed. Immediate mode hands
//! each event to the caller's sink synchronously, in production order.
//! Queued mode appends to a shared queue that the flush timer drains on a
//! fixed period, delivering one batch per non-empty flush; an empty queue
//! at flush time produces no delivery at all.

use std::mem;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use invigil_model::{EventBatch, MonitorSignal, ProctorEvent};

/// Caller-supplied handler receiving single events or flushed batches.
///
/// A panicking sink is the caller's problem: nothing here catches it.
pub type EventSink = Arc<dyn Fn(MonitorSignal) + Send + Sync>;

type SharedQueue = Arc<Mutex<Vec<ProctorEvent>>>;

/// Delivers classifier output to the caller's sink.
pub struct EventDispatcher {
    mode: DispatchMode,
}

enum DispatchMode {
    Immediate { sink: EventSink },
    Queued { queue: SharedQueue },
}

impl EventDispatcher {
    /// Immediate mode: every event goes straight to the sink.
    pub fn immediate(sink: EventSink) -> Self {
        Self {
            mode: DispatchMode::Immediate { sink },
        }
    }

    /// Queued mode: events accumulate in a queue owned jointly with the
    /// returned flush timer, which delivers batches every `flush_period`.
    pub fn queued(sink: EventSink, flush_period: Duration) -> (Self, FlushTimer) {
        let queue: SharedQueue = Arc::new(Mutex::new(Vec::new()));
        let timer = FlushTimer::spawn(sink, queue.clone(), flush_period);
        (
            Self {
                mode: DispatchMode::Queued { queue },
            },
            timer,
        )
    }

    /// Deliver or enqueue one event.
    pub fn dispatch(&self, event: ProctorEvent) {
        match &self.mode {
            DispatchMode::Immediate { sink } => sink(MonitorSignal::Event(event)),
            DispatchMode::Queued { queue } => {
                if let Ok(mut queue) = queue.lock() {
                    queue.push(event);
                }
            }
        }
    }
}

/// Periodic queue flusher for queued mode.
#[derive(Debug)]
pub struct FlushTimer {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl FlushTimer {
    fn spawn(sink: EventSink, queue: SharedQueue, period: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let drained = match queue.lock() {
                            Ok(mut queue) => mem::take(&mut *queue),
                            Err(_) => {
                                warn!("event queue poisoned; flush timer exiting");
                                break;
                            }
                        };
                        if drained.is_empty() {
                            continue;
                        }
                        debug!(events = drained.len(), "flushing queued events");
                        sink(MonitorSignal::Batch(EventBatch::new(drained)));
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });
        Self {
            shutdown,
            task: Some(task),
        }
    }

    /// Stop the timer. No flushes fire after this returns. Idempotent.
    pub async fn halt(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "flush timer join failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invigil_model::{DetectionType, EventData};

    fn event(detection_type: DetectionType, message: &str) -> ProctorEvent {
        ProctorEvent {
            detection_type,
            timestamp: 0,
            screen_shot: String::new(),
            data: EventData {
                message: message.to_string(),
            },
        }
    }

    fn collecting_sink() -> (Arc<Mutex<Vec<MonitorSignal>>>, EventSink) {
        let collected = Arc::new(Mutex::new(Vec::new()));
        let inner = collected.clone();
        let sink: EventSink = Arc::new(move |signal| {
            inner.lock().unwrap().push(signal);
        });
        (collected, sink)
    }

    #[test]
    fn test_immediate_mode_forwards_in_order() {
        let (collected, sink) = collecting_sink();
        let dispatcher = EventDispatcher::immediate(sink);

        dispatcher.dispatch(event(DetectionType::Mobile, "first"));
        dispatcher.dispatch(event(DetectionType::Book, "second"));

        let signals = collected.lock().unwrap();
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].events()[0].data.message, "first");
        assert_eq!(signals[1].events()[0].data.message, "second");
        assert!(matches!(signals[0], MonitorSignal::Event(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_mode_delivers_one_batch_per_flush() {
        let (collected, sink) = collecting_sink();
        let (dispatcher, mut timer) = EventDispatcher::queued(sink, Duration::from_secs(5));

        dispatcher.dispatch(event(DetectionType::Mobile, "first"));
        dispatcher.dispatch(event(DetectionType::Book, "second"));
        dispatcher.dispatch(event(DetectionType::Laptop, "third"));

        // Nothing is delivered individually before the flush tick.
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(collected.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        {
            let signals = collected.lock().unwrap();
            assert_eq!(signals.len(), 1);
            let MonitorSignal::Batch(batch) = &signals[0] else {
                panic!("expected a batch");
            };
            let messages: Vec<_> = batch
                .events
                .iter()
                .map(|e| e.data.message.as_str())
                .collect();
            assert_eq!(messages, vec!["first", "second", "third"]);
        }

        // The queue was cleared: later empty flush ticks stay silent.
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(collected.lock().unwrap().len(), 1);

        timer.halt().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_after_flush_go_to_next_batch() {
        let (collected, sink) = collecting_sink();
        let (dispatcher, mut timer) = EventDispatcher::queued(sink, Duration::from_secs(5));

        dispatcher.dispatch(event(DetectionType::Mobile, "first"));
        tokio::time::sleep(Duration::from_secs(6)).await;

        dispatcher.dispatch(event(DetectionType::Book, "second"));
        tokio::time::sleep(Duration::from_secs(5)).await;

        let signals = collected.lock().unwrap();
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].events()[0].data.message, "first");
        assert_eq!(signals[1].events()[0].data.message, "second");
        drop(signals);

        timer.halt().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_flush_is_silence() {
        let (collected, sink) = collecting_sink();
        let (_dispatcher, mut timer) = EventDispatcher::queued(sink, Duration::from_secs(5));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(collected.lock().unwrap().is_empty());

        timer.halt().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_halt_stops_the_timer() {
        let (collected, sink) = collecting_sink();
        let (dispatcher, mut timer) = EventDispatcher::queued(sink, Duration::from_secs(5));

        dispatcher.dispatch(event(DetectionType::Mobile, "undelivered"));
        timer.halt().await;
        // Halting twice is fine.
        timer.halt().await;

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(collected.lock().unwrap().is_empty());
    }
}
