//! Configurator scene: the keyboard sits on a lit stage and the theme buttons
//! swap its skin. The camera eases in as the section scrolls into view.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use cgmath::Vector3;
use futures::executor::LocalSpawner;
use log::warn;

use super::{spawn_keyboard_load, Arrival, Inbox};
use crate::animation::{AnimationClock, Easing, ScrollTimeline, ScrollTrigger};
use crate::app::AppContext;
use crate::configurator::ConfiguratorController;
use crate::gfx::camera::PerspectiveCamera;
use crate::gfx::lights::{DirectionalLight, Lighting};
use crate::gfx::scene::Scene;

/// Scroll range over which the section comes into view, in pixels
pub const CONFIGURATOR_SCROLL: ScrollTrigger = ScrollTrigger {
    start: 800.0,
    end: 1600.0,
    scrub: 0.5,
};

const CAMERA_FAR: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 2.4,
    z: 5.5,
};
const CAMERA_NEAR: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 1.6,
    z: 3.6,
};

pub struct ConfiguratorScene {
    scene: Rc<RefCell<Scene>>,
    controller: Rc<ConfiguratorController>,
    spawner: LocalSpawner,
    inbox: Inbox,
    timeline: ScrollTimeline,
}

impl ConfiguratorScene {
    pub fn new(ctx: &AppContext, clock: AnimationClock) -> Self {
        let config = ctx.config();
        let (width, height) = config.viewport;

        let camera = PerspectiveCamera::new(30.0, width, height)
            .with_position(CAMERA_FAR)
            .looking_at(config.motion.resting_position);
        let lighting = Lighting::new(0.5)
            .with_directional(
                DirectionalLight::new(Vector3::new(-3.0, 5.0, 3.0), 2.5).with_shadows(2048),
            )
            .with_directional(DirectionalLight::new(Vector3::new(3.0, 2.0, -2.0), 0.8))
            .with_environment(&config.environment_map, config.environment_intensity);
        let scene = Rc::new(RefCell::new(Scene::new("configurator", camera, lighting)));

        let mut timeline = ScrollTimeline::new(CONFIGURATOR_SCROLL);
        let target = scene.clone();
        timeline.track(CAMERA_FAR, CAMERA_NEAR, Easing::Power2Out, move |position| {
            target.borrow_mut().camera.position = position;
        });

        let controller = Rc::new(ConfiguratorController::new(
            ctx.theme_textures(),
            clock,
            config.motion,
        ));

        let inbox = Inbox::default();
        spawn_keyboard_load(ctx, &inbox, "configurator");

        Self {
            scene,
            controller,
            spawner: ctx.spawner().clone(),
            inbox,
            timeline,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.borrow_mut().resize(width, height);
    }

    pub fn set_scroll(&mut self, scroll_y: f32) {
        self.timeline.set_scroll(scroll_y);
    }

    pub fn update(&mut self, delta: f32) {
        for arrival in self.inbox.drain() {
            match arrival {
                Arrival::Keyboard(keyboard) => {
                    let instance = self.controller.attach_model(keyboard);
                    self.scene.borrow_mut().add_object(instance);
                }
                Arrival::Keycap(_) => warn!("Configurator scene got an unexpected keycap"),
            }
        }

        self.timeline.advance(delta);
    }

    /// Theme button pressed; see [`ConfiguratorController::click`]
    pub fn click_theme(&self, id: &str) -> bool {
        self.controller.click(&self.spawner, id)
    }

    pub fn controller(&self) -> &Rc<ConfiguratorController> {
        &self.controller
    }

    pub fn scene(&self) -> Ref<'_, Scene> {
        self.scene.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShowcaseConfig;
    use crate::test_support::{init_logging, keyboard_object, MemoryAssetSource, MemoryTextureLoader};
    use futures::executor::LocalPool;

    fn context(pool: &LocalPool, source: MemoryAssetSource) -> AppContext {
        init_logging();
        AppContext::new(
            ShowcaseConfig::new(),
            Rc::new(source),
            Rc::new(MemoryTextureLoader::new()),
            pool.spawner(),
        )
    }

    #[test]
    fn test_keyboard_attaches_to_controller() {
        let mut pool = LocalPool::new();
        let source = MemoryAssetSource::new().with_model("/models/keyboard.obj", keyboard_object());
        let ctx = context(&pool, source);
        let mut scene = ConfiguratorScene::new(&ctx, AnimationClock::new());

        assert!(!scene.click_theme("kick"));

        pool.run_until_stalled();
        scene.update(0.0);

        assert_eq!(scene.scene().objects.len(), 1);
        assert!(scene.controller().instance().is_some());
        assert!(scene.controller().buttons().iter().all(|b| b.enabled));
        assert!(scene.click_theme("kick"));
    }

    #[test]
    fn test_failed_load_keeps_buttons_disabled() {
        let mut pool = LocalPool::new();
        let ctx = context(&pool, MemoryAssetSource::new());
        let mut scene = ConfiguratorScene::new(&ctx, AnimationClock::new());

        pool.run_until_stalled();
        scene.update(0.016);

        assert!(scene.scene().objects.is_empty());
        assert!(scene.controller().buttons().iter().all(|b| !b.enabled));
        assert!(!scene.click_theme("kick"));
    }

    #[test]
    fn test_camera_eases_in_with_scroll() {
        let pool = LocalPool::new();
        let ctx = context(&pool, MemoryAssetSource::new());
        let mut scene = ConfiguratorScene::new(&ctx, AnimationClock::new());

        scene.set_scroll(0.0);
        scene.update(0.016);
        assert_eq!(scene.scene().camera.position, CAMERA_FAR);

        scene.set_scroll(CONFIGURATOR_SCROLL.end);
        scene.update(0.1);
        let z = scene.scene().camera.position.z;
        assert!(z < CAMERA_FAR.z && z > CAMERA_NEAR.z);
    }
}
