use crate::error::RuntimeError;
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Default upper bound of callbacks a single drain may run.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Fire-once timer callback.
pub type TimerCallback = Box<dyn FnOnce() + Send>;

/// Handle returned by [`EventLoop::set_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Tasks are ordered by due time, then by scheduling order.
type TaskKey = (Duration, u64);

struct Task {
    id: TimerId,
    callback: TimerCallback,
}

struct Scheduler {
    now: Duration,
    seq: u64,
    queue: BTreeMap<TaskKey, Task>,
    index: FxHashMap<TimerId, TaskKey>,
    max_steps: usize,
}

/// A cooperative, single-threaded timer loop.
///
/// Time is virtual: it only moves when [`EventLoop::advance`], [`EventLoop::advance_to`],
/// [`EventLoop::run_until_idle`] or [`EventLoop::run_realtime`] move it. Callbacks run one at
/// a time with no internal lock held, so they may schedule or cancel other timers.
#[derive(Clone)]
pub struct EventLoop {
    scheduler: Arc<Mutex<Scheduler>>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheduler = self.scheduler.lock();
        f.debug_struct("EventLoop")
            .field("now", &scheduler.now)
            .field("pending", &scheduler.queue.len())
            .field("max_steps", &scheduler.max_steps)
            .finish()
    }
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scheduler: Arc::new(Mutex::new(Scheduler {
                now: Duration::ZERO,
                seq: 0,
                queue: BTreeMap::new(),
                index: FxHashMap::default(),
                max_steps: DEFAULT_MAX_STEPS,
            })),
        }
    }

    /// Caps how many callbacks one drain may run before failing with
    /// [`RuntimeError::StepLimit`]. Zero is treated as one.
    #[must_use = "The limit only applies to the returned loop"]
    pub fn with_max_steps(self, max_steps: usize) -> Self {
        self.scheduler.lock().max_steps = max_steps.max(1);
        self
    }

    /// Current virtual time since the loop was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.lock().now
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.scheduler.lock().queue.len()
    }

    /// Virtual time at which the next timer fires.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.lock().queue.first_key_value().map(|((due, _), _)| *due)
    }

    /// Schedules `callback` to run once, `delay` after the current virtual time.
    pub fn set_timeout<F>(&self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        let mut scheduler = self.scheduler.lock();
        scheduler.seq += 1;
        let id = TimerId(scheduler.seq);
        let key = (scheduler.now.saturating_add(delay), scheduler.seq);
        scheduler.queue.insert(key, Task { id, callback: Box::new(callback) });
        scheduler.index.insert(id, key);
        trace!(timer = id.0, due_ms = key.0.as_millis(), "Timer scheduled");
        id
    }

    /// Cancels a pending timer. Returns `false` if it already fired or was cancelled.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        let mut scheduler = self.scheduler.lock();
        let Some(key) = scheduler.index.remove(&id) else {
            return false;
        };
        scheduler.queue.remove(&key);
        trace!(timer = id.0, "Timer cancelled");
        true
    }

    /// Moves the clock forward by `delta`, running every timer that comes due on the way.
    ///
    /// # Errors
    /// Returns [`RuntimeError::StepLimit`] if more than `max_steps` callbacks ran.
    pub fn advance(&self, delta: Duration) -> Result<usize, RuntimeError> {
        let target = self.now().saturating_add(delta);
        self.advance_to(target)
    }

    /// Moves the clock to `target`, running every timer due at or before it.
    ///
    /// # Errors
    /// Returns [`RuntimeError::Clock`] if `target` is in the past and
    /// [`RuntimeError::StepLimit`] if more than `max_steps` callbacks ran.
    pub fn advance_to(&self, target: Duration) -> Result<usize, RuntimeError> {
        let from = self.now();
        if target < from {
            return Err(RuntimeError::Clock {
                message: format!(
                    "cannot move from {}ms back to {}ms",
                    from.as_millis(),
                    target.as_millis()
                )
                .into(),
                context: None,
            });
        }

        let ran = self.drain(Some(target))?;
        let mut scheduler = self.scheduler.lock();
        scheduler.now = scheduler.now.max(target);
        debug!(from_ms = from.as_millis(), to_ms = target.as_millis(), ran, "Clock advanced");
        Ok(ran)
    }

    /// Runs timers that are already due without moving the clock.
    ///
    /// # Errors
    /// Returns [`RuntimeError::StepLimit`] if more than `max_steps` callbacks ran.
    pub fn run_due(&self) -> Result<usize, RuntimeError> {
        let now = self.now();
        self.drain(Some(now))
    }

    /// Runs every timer, jumping the clock to each due time, until the queue is empty.
    ///
    /// # Errors
    /// Returns [`RuntimeError::StepLimit`] if more than `max_steps` callbacks ran.
    pub fn run_until_idle(&self) -> Result<usize, RuntimeError> {
        let ran = self.drain(None)?;
        debug!(now_ms = self.now().as_millis(), ran, "Timer queue drained");
        Ok(ran)
    }

    /// Like [`EventLoop::run_until_idle`] but waits in real time (through `tokio::time`)
    /// until each timer comes due.
    ///
    /// # Errors
    /// Returns [`RuntimeError::StepLimit`] if more than `max_steps` callbacks ran in total.
    pub async fn run_realtime(&self) -> Result<usize, RuntimeError> {
        let max_steps = self.scheduler.lock().max_steps;
        let mut total = 0usize;

        while let Some(due) = self.next_due() {
            let wait = due.saturating_sub(self.now());
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
            total += self.advance_to(due.max(self.now()))?;
            if total > max_steps {
                return Err(step_limit_error(max_steps, total, self.now(), self.pending()));
            }
        }

        Ok(total)
    }

    fn drain(&self, limit: Option<Duration>) -> Result<usize, RuntimeError> {
        let mut steps = 0usize;

        loop {
            let task = {
                let mut scheduler = self.scheduler.lock();
                let Some(((due, _), _)) = scheduler.queue.first_key_value() else {
                    break;
                };
                if limit.is_some_and(|limit| *due > limit) {
                    break;
                }

                steps += 1;
                if steps > scheduler.max_steps {
                    return Err(step_limit_error(
                        scheduler.max_steps,
                        steps,
                        scheduler.now,
                        scheduler.queue.len(),
                    ));
                }

                let Some(((due, _), task)) = scheduler.queue.pop_first() else {
                    break;
                };
                scheduler.index.remove(&task.id);
                if due > scheduler.now {
                    scheduler.now = due;
                }
                trace!(timer = task.id.0, now_ms = scheduler.now.as_millis(), "Timer fired");
                task
            };

            (task.callback)();
        }

        Ok(steps)
    }
}

fn step_limit_error(max_steps: usize, steps: usize, now: Duration, pending: usize) -> RuntimeError {
    RuntimeError::StepLimit {
        message: format!(
            "limit={max_steps}, steps={steps}, now_ms={}, pending={pending}",
            now.as_millis()
        )
        .into(),
        context: Some("possible self-rescheduling timer".into()),
    }
}
