//! Scroll-linked animation
//!
//! A [`ScrollTimeline`] binds animation progress to the page scroll position
//! instead of wall-clock time. The [`ScrollTrigger`] maps a scroll offset to
//! progress between its start and end markers; `scrub` makes the displayed
//! progress trail the scroll position by roughly that many seconds.

use super::easing::Easing;
use super::tween::Interpolate;

/// Scroll range a timeline spans
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrigger {
    /// Scroll offset (pixels) where progress is 0
    pub start: f32,
    /// Scroll offset (pixels) where progress is 1
    pub end: f32,
    /// Catch-up time in seconds; 0 follows the scroll position exactly
    pub scrub: f32,
}

impl ScrollTrigger {
    pub fn new(start: f32, end: f32, scrub: f32) -> Self {
        Self {
            start,
            end,
            scrub: scrub.max(0.0),
        }
    }

    /// Linear progress at a scroll offset, clamped to [0, 1]
    pub fn progress_at(&self, scroll_y: f32) -> f32 {
        if self.end <= self.start {
            return if scroll_y >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }
}

struct ScrollTrack {
    /// Portion of the timeline this track occupies
    range: (f32, f32),
    apply: Box<dyn FnMut(f32)>,
}

impl ScrollTrack {
    fn local_progress(&self, progress: f32) -> f32 {
        let (start, end) = self.range;
        if end <= start {
            return if progress >= start { 1.0 } else { 0.0 };
        }
        ((progress - start) / (end - start)).clamp(0.0, 1.0)
    }
}

/// Set of property tracks driven by one scroll trigger
pub struct ScrollTimeline {
    trigger: ScrollTrigger,
    target: f32,
    progress: f32,
    tracks: Vec<ScrollTrack>,
}

/// Below this gap the scrubbed progress snaps to its target
const SNAP_EPSILON: f32 = 1e-4;

impl ScrollTimeline {
    pub fn new(trigger: ScrollTrigger) -> Self {
        Self {
            trigger,
            target: 0.0,
            progress: 0.0,
            tracks: Vec::new(),
        }
    }

    /// Adds a track spanning the whole timeline
    pub fn track<T, F>(&mut self, from: T, to: T, ease: Easing, apply: F) -> &mut Self
    where
        T: Interpolate,
        F: FnMut(T) + 'static,
    {
        self.track_in((0.0, 1.0), from, to, ease, apply)
    }

    /// Adds a track occupying `range` (fractions of the timeline)
    ///
    /// The track is applied immediately at the current progress.
    pub fn track_in<T, F>(
        &mut self,
        range: (f32, f32),
        from: T,
        to: T,
        ease: Easing,
        mut apply: F,
    ) -> &mut Self
    where
        T: Interpolate,
        F: FnMut(T) + 'static,
    {
        let mut track = ScrollTrack {
            range,
            apply: Box::new(move |t| apply(from.lerp(&to, ease.apply(t)))),
        };
        let local = track.local_progress(self.progress);
        (track.apply)(local);
        self.tracks.push(track);
        self
    }

    /// Sets the scroll position the timeline should move towards
    pub fn set_scroll(&mut self, scroll_y: f32) {
        self.target = self.trigger.progress_at(scroll_y);
    }

    /// Moves displayed progress towards the scroll target and applies tracks
    pub fn advance(&mut self, delta: f32) {
        let before = self.progress;
        let gap = self.target - self.progress;

        if self.trigger.scrub <= 0.0 || gap.abs() < SNAP_EPSILON {
            self.progress = self.target;
        } else {
            let blend = 1.0 - (-delta.max(0.0) / self.trigger.scrub).exp();
            self.progress += gap * blend;
        }

        if self.progress != before {
            self.apply_tracks();
        }
    }

    fn apply_tracks(&mut self) {
        let progress = self.progress;
        for track in &mut self.tracks {
            let local = track.local_progress(progress);
            (track.apply)(local);
        }
    }

    /// Displayed progress
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Progress the scroll position asks for
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}
