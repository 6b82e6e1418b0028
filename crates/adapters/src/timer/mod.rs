use std::cell::RefCell;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use recipe_book_application::{ApplicationError, TimerHandle, TimerScheduler, TimerToken};
use tracing::{debug, warn};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Delivers ticks into the host's event channel from a short-lived thread
/// per timer. `wrap` turns a token into the host's event type.
pub struct ThreadTimerScheduler<E> {
    events: Sender<E>,
    period: Duration,
    wrap: fn(TimerToken) -> E,
}

impl<E> ThreadTimerScheduler<E> {
    pub fn new(events: Sender<E>, wrap: fn(TimerToken) -> E) -> Self {
        Self::with_period(events, wrap, TICK_INTERVAL)
    }

    pub fn with_period(events: Sender<E>, wrap: fn(TimerToken) -> E, period: Duration) -> Self {
        Self {
            events,
            period,
            wrap,
        }
    }
}

impl<E: Send + 'static> TimerScheduler for ThreadTimerScheduler<E> {
    fn schedule_ticks(&self, token: TimerToken) -> Result<Box<dyn TimerHandle>, ApplicationError> {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let events = self.events.clone();
        let period = self.period;
        let wrap = self.wrap;

        let worker = thread::Builder::new()
            .name(format!("recipe-timer-{}", token.0))
            .spawn(move || loop {
                match cancel_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        if events.send(wrap(token)).is_err() {
                            debug!(%token, "event loop gone, timer thread exiting");
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|error| ApplicationError::Io(error.to_string()))?;

        Ok(Box::new(ThreadTimerHandle {
            token,
            cancel: cancel_tx,
            worker: RefCell::new(Some(worker)),
        }))
    }
}

struct ThreadTimerHandle {
    token: TimerToken,
    cancel: Sender<()>,
    worker: RefCell<Option<JoinHandle<()>>>,
}

impl TimerHandle for ThreadTimerHandle {
    /// Returns once the worker has exited, so no tick is sent afterwards.
    fn cancel(&self) {
        let Some(worker) = self.worker.borrow_mut().take() else {
            return;
        };
        let _ = self.cancel.send(());
        if worker.join().is_err() {
            warn!(token = %self.token, "timer thread panicked");
        }
    }
}

impl Drop for ThreadTimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
