//! # Animation
//!
//! Time- and scroll-driven property animation for the scenes.
//!
//! ## Key Components
//!
//! - [`Easing`] - Easing curves
//! - [`Tween`] / [`TweenOptions`] - Timing model with delay, repeat and yoyo
//! - [`AnimationClock`] - Steps running tweens each frame; [`TweenHandle`]s are futures
//! - [`ScrollTimeline`] / [`ScrollTrigger`] - Progress bound to scroll position

pub mod clock;
pub mod easing;
pub mod scroll;
pub mod tween;

pub use clock::{AnimationClock, TweenHandle};
pub use easing::Easing;
pub use scroll::{ScrollTimeline, ScrollTrigger};
pub use tween::{Interpolate, Repeat, Tween, TweenOptions};
