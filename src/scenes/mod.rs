//! # Scenes
//!
//! The two scenes of the page, assembled from the shared [`AppContext`].
//!
//! ## Key Components
//!
//! - [`HeroScene`] - Floating keyboard and keycaps, scroll-driven camera and light
//! - [`ConfiguratorScene`] - Keyboard on a stage with theme buttons
//!
//! Models load on the task queue. Finished loads land in the scene's
//! [`Inbox`] and are attached on the next [`update`](HeroScene::update), so a
//! scene renders without its models until they arrive.

pub mod configurator;
pub mod hero;

use std::cell::RefCell;
use std::rc::Rc;

use futures::task::LocalSpawnExt;
use log::warn;

use crate::app::AppContext;
use crate::gfx::scene::Object;

pub use configurator::ConfiguratorScene;
pub use hero::HeroScene;

/// A model that finished loading
pub(crate) enum Arrival {
    Keyboard(Object),
    Keycap(Object),
}

/// Hand-off point between load tasks and the scene that owns them
#[derive(Clone, Default)]
pub(crate) struct Inbox(Rc<RefCell<Vec<Arrival>>>);

impl Inbox {
    pub(crate) fn push(&self, arrival: Arrival) {
        self.0.borrow_mut().push(arrival);
    }

    pub(crate) fn drain(&self) -> Vec<Arrival> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Queues a keyboard load that delivers to `inbox`
pub(crate) fn spawn_keyboard_load(ctx: &AppContext, inbox: &Inbox, scene: &'static str) {
    let loader = ctx.keyboard_loader();
    let inbox = inbox.clone();
    let queued = ctx.spawner().spawn_local(async move {
        match loader.load().await {
            Ok(keyboard) => inbox.push(Arrival::Keyboard(keyboard)),
            Err(err) => warn!("{} scene has no keyboard: {}", scene, err),
        }
    });
    if let Err(err) = queued {
        warn!("Could not queue keyboard load for {} scene: {}", scene, err);
    }
}
