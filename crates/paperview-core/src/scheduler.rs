//! Frame-driven scheduling primitives.
//!
//! Nothing here owns a timer or a thread: the host drives everything by
//! reporting frame ticks, and each primitive answers "is anything due now?".

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Waker};
use std::time::Duration;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// When a debounced call fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    /// On the next frame tick.
    #[default]
    Frame,
    /// Once the given delay elapsed since the first pending call.
    Delay(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheduled {
    Frame,
    At(Instant),
}

/// Coalesces repeated requests into a single deferred firing.
///
/// Each [`call`](Self::call) replaces the stored value, but only the first
/// call after a firing schedules anything; later calls ride along with the
/// pending one.
#[derive(Debug)]
pub struct Debouncer<T> {
    timeout: Timeout,
    scheduled: Option<Scheduled>,
    value: Option<T>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(Timeout::Frame)
    }
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given timeout.
    pub fn new(timeout: Timeout) -> Self {
        Self {
            timeout,
            scheduled: None,
            value: None,
        }
    }

    pub fn timeout(&self) -> Timeout {
        self.timeout
    }

    /// Change the timeout used for subsequent schedules.
    pub fn set_timeout(&mut self, timeout: Timeout) {
        self.timeout = timeout;
    }

    /// Whether a firing is pending.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Request a firing with `value`, measuring delays from now.
    pub fn call(&mut self, value: T) {
        self.call_at(value, Instant::now());
    }

    /// Request a firing with `value`, measuring delays from `now`.
    pub fn call_at(&mut self, value: T, now: Instant) {
        self.value = Some(value);
        if self.scheduled.is_none() {
            self.scheduled = Some(match self.timeout {
                Timeout::Frame => Scheduled::Frame,
                Timeout::Delay(delay) => Scheduled::At(now + delay),
            });
        }
    }

    /// Fire if due at `now`; returns the latest requested value.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = match self.scheduled? {
            Scheduled::Frame => true,
            Scheduled::At(deadline) => now >= deadline,
        };
        if due { self.run_synchronously() } else { None }
    }

    /// Fire immediately if a firing is pending.
    pub fn run_synchronously(&mut self) -> Option<T> {
        if self.cancel() { self.value.take() } else { None }
    }

    /// Drop any pending firing.
    pub fn dispose(&mut self) {
        self.cancel();
        self.value = None;
    }

    fn cancel(&mut self) -> bool {
        self.scheduled.take().is_some()
    }
}

/// Cancellation token for cooperative cancellation of animations.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel this token and all of its clones. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Result of advancing an [`AnimationInterval`] by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Still running; elapsed fraction in `[0, 1)`.
    Running(f64),
    /// Reached the end; the final progress is always `1.0`.
    Finished,
    /// The cancellation token was triggered; no progress is reported.
    Cancelled,
}

/// Duration-based progress driver stepped once per frame.
///
/// The first tick marks the start time, so the first reported progress is 0.
#[derive(Debug, Clone)]
pub struct AnimationInterval {
    duration: Duration,
    start: Option<Instant>,
    token: CancellationToken,
}

impl AnimationInterval {
    pub fn new(duration: Duration, token: CancellationToken) -> Self {
        Self {
            duration,
            start: None,
            token,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Advance to the frame at `now`.
    pub fn tick(&mut self, now: Instant) -> Tick {
        if self.token.is_cancelled() {
            return Tick::Cancelled;
        }
        if self.duration.is_zero() {
            return Tick::Finished;
        }
        let start = *self.start.get_or_insert(now);
        let passed = now.saturating_duration_since(start).min(self.duration);
        if passed < self.duration {
            Tick::Running(passed.as_secs_f64() / self.duration.as_secs_f64())
        } else {
            Tick::Finished
        }
    }
}

/// Smoothstep easing `t²(3 − 2t)`, clamped to `[0, 1]`.
pub fn ease_in_out(t: f64) -> f64 {
    if t < 0.0 {
        return 0.0;
    }
    if t > 1.0 {
        return 1.0;
    }
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Default)]
struct TransitionState {
    finished: bool,
    cancelled: bool,
    waker: Option<Waker>,
}

/// Completion handle for a viewport operation.
///
/// Resolves when the operation's animation reaches its end or is cancelled;
/// immediate operations return an already resolved handle. Await it from an
/// async embedder or query it between frames.
#[derive(Debug, Clone)]
pub struct Transition {
    state: Rc<RefCell<TransitionState>>,
    token: CancellationToken,
}

impl Transition {
    pub(crate) fn pending(token: CancellationToken) -> Self {
        Self {
            state: Rc::default(),
            token,
        }
    }

    /// A handle that has already completed.
    pub fn resolved() -> Self {
        let transition = Self::pending(CancellationToken::new());
        transition.finish(false);
        transition
    }

    pub fn is_finished(&self) -> bool {
        self.state.borrow().finished
    }

    /// Whether the operation was aborted before reaching its end.
    pub fn is_cancelled(&self) -> bool {
        self.state.borrow().cancelled
    }

    /// Abort the operation. Resolves the handle immediately.
    pub fn cancel(&self) {
        self.token.cancel();
        self.finish(true);
    }

    pub(crate) fn finish(&self, cancelled: bool) {
        let waker = {
            let mut state = self.state.borrow_mut();
            if state.finished {
                return;
            }
            state.finished = true;
            state.cancelled = cancelled;
            state.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl Future for Transition {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = self.state.borrow_mut();
        if state.finished {
            Poll::Ready(())
        } else {
            state.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::task::Wake;

    struct CountingWaker(std::sync::atomic::AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_debouncer_frame_coalesces_calls() {
        let mut debouncer = Debouncer::new(Timeout::Frame);
        let now = Instant::now();
        for i in 0..5 {
            debouncer.call_at(i, now);
        }
        assert!(debouncer.is_scheduled());
        assert_eq!(debouncer.poll(now), Some(4));
        assert!(!debouncer.is_scheduled());
        assert_eq!(debouncer.poll(now), None);
    }

    #[test]
    fn test_debouncer_delay_waits_for_deadline() {
        let mut debouncer = Debouncer::new(Timeout::Delay(Duration::from_millis(100)));
        let start = Instant::now();
        debouncer.call_at("first", start);
        debouncer.call_at("second", start + Duration::from_millis(60));

        assert_eq!(debouncer.poll(start + Duration::from_millis(50)), None);
        // The deadline is measured from the first pending call.
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(100)),
            Some("second")
        );
    }

    #[test]
    fn test_debouncer_run_synchronously_and_dispose() {
        let mut debouncer = Debouncer::default();
        assert_eq!(debouncer.run_synchronously(), None::<u8>);

        debouncer.call(7);
        assert_eq!(debouncer.run_synchronously(), Some(7));

        debouncer.call(8);
        debouncer.dispose();
        assert!(!debouncer.is_scheduled());
        assert_eq!(debouncer.poll(Instant::now()), None);
    }

    #[test]
    fn test_ease_in_out() {
        assert!(ease_in_out(-1.0).abs() < f64::EPSILON);
        assert!((ease_in_out(2.0) - 1.0).abs() < f64::EPSILON);
        assert!((ease_in_out(0.5) - 0.5).abs() < f64::EPSILON);
        assert!((ease_in_out(0.25) - 0.15625).abs() < 1e-12);
    }

    #[test]
    fn test_animation_interval_progress() {
        let start = Instant::now();
        let mut interval =
            AnimationInterval::new(Duration::from_millis(200), CancellationToken::new());
        assert_eq!(interval.tick(start), Tick::Running(0.0));
        match interval.tick(start + Duration::from_millis(50)) {
            Tick::Running(p) => assert!((p - 0.25).abs() < 1e-9),
            other => panic!("unexpected tick {other:?}"),
        }
        assert_eq!(interval.tick(start + Duration::from_millis(500)), Tick::Finished);
    }

    #[test]
    fn test_animation_interval_cancel_and_zero_duration() {
        let token = CancellationToken::new();
        let mut interval = AnimationInterval::new(Duration::from_millis(200), token.clone());
        token.cancel();
        assert_eq!(interval.tick(Instant::now()), Tick::Cancelled);

        let mut instant = AnimationInterval::new(Duration::ZERO, CancellationToken::new());
        assert_eq!(instant.tick(Instant::now()), Tick::Finished);
    }

    #[test]
    fn test_transition_wakes_on_finish() {
        let counter = Arc::new(CountingWaker(std::sync::atomic::AtomicUsize::new(0)));
        let waker = Waker::from(counter.clone());
        let mut cx = Context::from_waker(&waker);

        let mut transition = Transition::pending(CancellationToken::new());
        assert_eq!(Pin::new(&mut transition).poll(&mut cx), Poll::Pending);

        transition.finish(false);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(Pin::new(&mut transition).poll(&mut cx), Poll::Ready(()));
        assert!(transition.is_finished());
        assert!(!transition.is_cancelled());
    }

    #[test]
    fn test_transition_cancel_resolves_immediately() {
        let token = CancellationToken::new();
        let transition = Transition::pending(token.clone());
        transition.cancel();
        assert!(token.is_cancelled());
        assert!(transition.is_finished());
        assert!(transition.is_cancelled());

        // Finishing again does not flip the outcome.
        transition.finish(false);
        assert!(transition.is_cancelled());
        assert!(Transition::resolved().is_finished());
    }
}
