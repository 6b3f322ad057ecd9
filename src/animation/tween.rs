//! Tween timing
//!
//! [`Tween`] is the pure timing model: it turns accumulated time into a value
//! between `from` and `to`, honouring delay, repeats and yoyo. The
//! [`AnimationClock`](super::AnimationClock) drives tweens and applies their
//! values to scene objects.

use cgmath::Vector3;

use super::easing::Easing;

/// Values a tween can move between
pub trait Interpolate: Copy + 'static {
    /// Value at `t` between `self` (t = 0) and `other` (t = 1); `t` may leave [0, 1]
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// `self` moved by a relative delta
    fn offset(&self, delta: &Self) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn offset(&self, delta: &Self) -> Self {
        self + delta
    }
}

impl Interpolate for Vector3<f32> {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn offset(&self, delta: &Self) -> Self {
        self + delta
    }
}

/// Linear RGB colors
impl Interpolate for [f32; 3] {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        [
            self[0].lerp(&other[0], t),
            self[1].lerp(&other[1], t),
            self[2].lerp(&other[2], t),
        ]
    }

    fn offset(&self, delta: &Self) -> Self {
        [self[0] + delta[0], self[1] + delta[1], self[2] + delta[2]]
    }
}

/// How many times a tween plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Once,
    /// Plays once plus `n` repeats
    Times(u32),
    Infinite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenOptions {
    /// Seconds per iteration
    pub duration: f32,
    pub ease: Easing,
    /// Seconds before the first iteration starts
    pub delay: f32,
    pub repeat: Repeat,
    /// Alternate direction on every repeat
    pub yoyo: bool,
}

impl Default for TweenOptions {
    fn default() -> Self {
        Self {
            duration: 0.5,
            ease: Easing::Power1Out,
            delay: 0.0,
            repeat: Repeat::Once,
            yoyo: false,
        }
    }
}

impl TweenOptions {
    pub fn new(duration: f32, ease: Easing) -> Self {
        Self {
            duration,
            ease,
            ..Self::default()
        }
    }

    /// Builder pattern: Set start delay
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Builder pattern: Repeat forever, reversing every other iteration
    pub fn forever_yoyo(mut self) -> Self {
        self.repeat = Repeat::Infinite;
        self.yoyo = true;
        self
    }

    /// Builder pattern: Set repeat mode
    pub fn with_repeat(mut self, repeat: Repeat, yoyo: bool) -> Self {
        self.repeat = repeat;
        self.yoyo = yoyo;
        self
    }
}

/// Value moving from `from` to `to` over time
#[derive(Debug, Clone)]
pub struct Tween<T> {
    from: T,
    to: T,
    options: TweenOptions,
    elapsed: f32,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, options: TweenOptions) -> Self {
        Self {
            from,
            to,
            options,
            elapsed: 0.0,
        }
    }

    /// Tween towards `from` offset by `delta`
    pub fn by(from: T, delta: T, options: TweenOptions) -> Self {
        Self::new(from, from.offset(&delta), options)
    }

    /// Advances time and returns the new value
    pub fn advance(&mut self, delta: f32) -> T {
        self.elapsed += delta.max(0.0);
        self.value()
    }

    /// Current value
    pub fn value(&self) -> T {
        let (_, local) = self.position();
        self.from.lerp(&self.to, self.options.ease.apply(local))
    }

    pub fn is_finished(&self) -> bool {
        match self.total_iterations() {
            None => false,
            Some(total) => {
                let active = self.elapsed - self.options.delay;
                active >= 0.0
                    && (self.options.duration <= 0.0
                        || active >= self.options.duration * total as f32)
            }
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn total_iterations(&self) -> Option<u32> {
        match self.options.repeat {
            Repeat::Once => Some(1),
            Repeat::Times(n) => Some(n.saturating_add(1)),
            Repeat::Infinite => None,
        }
    }

    /// (iteration index, linear progress within it), yoyo already applied
    fn position(&self) -> (u32, f32) {
        let active = self.elapsed - self.options.delay;
        if active < 0.0 {
            return (0, 0.0);
        }

        let duration = self.options.duration;
        let (cycle, local) = if duration <= 0.0 {
            (self.total_iterations().unwrap_or(1).saturating_sub(1), 1.0)
        } else {
            let cycle = (active / duration).floor() as u32;
            match self.total_iterations() {
                Some(total) if cycle >= total => (total - 1, 1.0),
                _ => (cycle, (active - cycle as f32 * duration) / duration),
            }
        };

        if self.options.yoyo && cycle % 2 == 1 {
            (cycle, 1.0 - local)
        } else {
            (cycle, local)
        }
    }
}
