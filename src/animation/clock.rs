//! Animation clock
//!
//! Owns every running tween and steps them once per frame. Starting a tween
//! returns a [`TweenHandle`] that is also a future: awaiting it suspends the
//! calling task until the tween completes, which lets multi-step sequences be
//! written as straight-line async code instead of nested callbacks.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use log::trace;

use super::tween::{Interpolate, Tween, TweenOptions};

/// Completion state shared between the clock and a handle
#[derive(Default)]
struct Completion {
    finished: Cell<bool>,
    killed: Cell<bool>,
    waker: RefCell<Option<Waker>>,
}

impl Completion {
    fn complete(&self) {
        self.finished.set(true);
        if let Some(waker) = self.waker.borrow_mut().take() {
            waker.wake();
        }
    }
}

struct ActiveTween {
    id: u64,
    /// Steps the tween, applies its value and reports whether it finished
    step: Box<dyn FnMut(f32) -> bool>,
    completion: Rc<Completion>,
}

#[derive(Default)]
struct ClockInner {
    tweens: RefCell<Vec<ActiveTween>>,
    time: Cell<f32>,
    next_id: Cell<u64>,
}

/// Shared frame clock for tweens; clones refer to the same clock
#[derive(Clone, Default)]
pub struct AnimationClock {
    inner: Rc<ClockInner>,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a tween from `from` to `to`
    ///
    /// `apply` receives the eased value on every [`advance`](Self::advance)
    /// until the tween completes or is killed.
    pub fn animate<T, F>(&self, from: T, to: T, options: TweenOptions, apply: F) -> TweenHandle
    where
        T: Interpolate,
        F: FnMut(T) + 'static,
    {
        self.start(Tween::new(from, to, options), apply)
    }

    /// Starts a tween from `from` to `from + delta`
    pub fn animate_by<T, F>(&self, from: T, delta: T, options: TweenOptions, apply: F) -> TweenHandle
    where
        T: Interpolate,
        F: FnMut(T) + 'static,
    {
        self.start(Tween::by(from, delta, options), apply)
    }

    fn start<T, F>(&self, mut tween: Tween<T>, mut apply: F) -> TweenHandle
    where
        T: Interpolate,
        F: FnMut(T) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let completion = Rc::new(Completion::default());
        let step = Box::new(move |delta: f32| {
            apply(tween.advance(delta));
            tween.is_finished()
        });

        self.inner.tweens.borrow_mut().push(ActiveTween {
            id,
            step,
            completion: completion.clone(),
        });
        trace!("Started tween #{}", id);

        TweenHandle { id, completion }
    }

    /// Steps every running tween by `delta` seconds
    ///
    /// Tweens started from inside an `apply` callback join the next frame.
    pub fn advance(&self, delta: f32) {
        self.inner.time.set(self.inner.time.get() + delta);

        let mut running = std::mem::take(&mut *self.inner.tweens.borrow_mut());
        running.retain_mut(|tween| {
            if tween.completion.killed.get() {
                trace!("Dropped killed tween #{}", tween.id);
                return false;
            }
            if (tween.step)(delta) {
                trace!("Tween #{} complete", tween.id);
                tween.completion.complete();
                return false;
            }
            true
        });

        let mut tweens = self.inner.tweens.borrow_mut();
        running.append(&mut tweens);
        *tweens = running;
    }

    /// Number of tweens still running
    pub fn active_count(&self) -> usize {
        self.inner.tweens.borrow().len()
    }

    /// Total seconds advanced so far
    pub fn time(&self) -> f32 {
        self.inner.time.get()
    }

    /// Stops every tween, resolving their handles
    pub fn kill_all(&self) {
        for tween in self.inner.tweens.borrow_mut().drain(..) {
            tween.completion.killed.set(true);
            tween.completion.complete();
        }
    }
}

/// Handle to a running tween; await it to wait for completion
pub struct TweenHandle {
    id: u64,
    completion: Rc<Completion>,
}

impl TweenHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.completion.finished.get()
    }

    /// Stops the tween where it is and resolves the handle
    pub fn kill(&self) {
        self.completion.killed.set(true);
        self.completion.complete();
    }
}

impl Future for TweenHandle {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.completion.finished.get() {
            Poll::Ready(())
        } else {
            *self.completion.waker.borrow_mut() = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Easing;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;

    fn linear(duration: f32) -> TweenOptions {
        TweenOptions::new(duration, Easing::Linear)
    }

    #[test]
    fn test_advance_applies_values() {
        let clock = AnimationClock::new();
        let value = Rc::new(Cell::new(0.0f32));
        let sink = value.clone();

        let handle = clock.animate(0.0, 8.0, linear(1.0), move |v| sink.set(v));
        clock.advance(0.5);
        assert_eq!(value.get(), 4.0);
        assert!(!handle.is_finished());

        clock.advance(0.5);
        assert_eq!(value.get(), 8.0);
        assert!(handle.is_finished());
        assert_eq!(clock.active_count(), 0);
    }

    #[test]
    fn test_zero_length_tween_lands_on_a_zero_step() {
        let clock = AnimationClock::new();
        let value = Rc::new(Cell::new(0.0f32));
        let sink = value.clone();

        let handle = clock.animate(0.0, 5.0, linear(0.0), move |v| sink.set(v));
        clock.advance(0.0);

        assert_eq!(value.get(), 5.0);
        assert!(handle.is_finished());
        assert_eq!(clock.active_count(), 0);
    }

    #[test]
    fn test_awaiting_sequences_tweens() {
        let clock = AnimationClock::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pool = LocalPool::new();

        let task_clock = clock.clone();
        let task_log = log.clone();
        pool.spawner()
            .spawn_local(async move {
                task_log.borrow_mut().push("start");
                task_clock.animate(0.0f32, 1.0, linear(0.2), |_| {}).await;
                task_log.borrow_mut().push("first");
                task_clock.animate(0.0f32, 1.0, linear(0.2), |_| {}).await;
                task_log.borrow_mut().push("second");
            })
            .unwrap();

        pool.run_until_stalled();
        assert_eq!(*log.borrow(), vec!["start"]);
        assert_eq!(clock.active_count(), 1);

        clock.advance(0.25);
        pool.run_until_stalled();
        assert_eq!(*log.borrow(), vec!["start", "first"]);
        assert_eq!(clock.active_count(), 1);

        clock.advance(0.25);
        pool.run_until_stalled();
        assert_eq!(*log.borrow(), vec!["start", "first", "second"]);
        assert_eq!(clock.active_count(), 0);
    }

    #[test]
    fn test_kill_resolves_and_stops_applying() {
        let clock = AnimationClock::new();
        let value = Rc::new(Cell::new(0.0f32));
        let sink = value.clone();

        let handle = clock.animate(0.0, 1.0, linear(1.0), move |v| sink.set(v));
        clock.advance(0.5);
        handle.kill();
        assert!(handle.is_finished());

        clock.advance(0.5);
        assert_eq!(value.get(), 0.5);
        assert_eq!(clock.active_count(), 0);
    }

    #[test]
    fn test_infinite_tweens_stay_active_until_killed() {
        let clock = AnimationClock::new();
        clock.animate_by(0.0f32, 0.1, linear(1.0).forever_yoyo(), |_| {});
        clock.animate_by(0.0f32, 0.1, linear(1.5).forever_yoyo(), |_| {});

        for _ in 0..600 {
            clock.advance(1.0 / 60.0);
        }
        assert_eq!(clock.active_count(), 2);
        assert!((clock.time() - 10.0).abs() < 1e-2);

        clock.kill_all();
        assert_eq!(clock.active_count(), 0);
    }
}
