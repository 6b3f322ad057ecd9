//! Hero scene: the keyboard floats in front of the camera surrounded by loose
//! keycaps, and scrolling the page tilts the keyboard flat while the camera
//! dollies in.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use cgmath::Vector3;
use futures::task::LocalSpawnExt;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{spawn_keyboard_load, Arrival, Inbox};
use crate::animation::{AnimationClock, Easing, ScrollTimeline, ScrollTrigger, TweenOptions};
use crate::app::AppContext;
use crate::gfx::camera::PerspectiveCamera;
use crate::gfx::lights::{DirectionalLight, Lighting};
use crate::gfx::resources::{MaterialRole, MaterialSet};
use crate::gfx::scene::{Object, Scene, SharedObject};

/// Scroll range of the hero section, in pixels
pub const HERO_SCROLL: ScrollTrigger = ScrollTrigger {
    start: 0.0,
    end: 1000.0,
    scrub: 1.0,
};

const CAMERA_START: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 0.4,
    z: 6.0,
};
const CAMERA_END: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 1.2,
    z: 4.2,
};
const KEY_LIGHT_START: f32 = 2.0;
const KEY_LIGHT_END: f32 = 3.2;

/// Keyboard tilt (radians about X) at the top of the page
const KEYBOARD_TILT: f32 = 0.9;
const KEYBOARD_START: Vector3<f32> = Vector3 {
    x: 0.0,
    y: -0.2,
    z: 0.0,
};
const KEYBOARD_END: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 0.3,
    z: 0.5,
};

/// Where the loose keycaps hover around the keyboard
const KEYCAP_SLOTS: [[f32; 3]; 6] = [
    [-2.4, 1.1, -0.6],
    [-1.6, -0.9, 0.4],
    [-2.9, -0.1, 0.9],
    [2.3, 1.0, -0.4],
    [1.7, -1.0, 0.6],
    [2.8, 0.2, 1.0],
];
const FLOAT_HEIGHT: f32 = 0.25;

pub struct HeroScene {
    scene: Rc<RefCell<Scene>>,
    clock: AnimationClock,
    materials: Rc<MaterialSet>,
    inbox: Inbox,
    timelines: Vec<ScrollTimeline>,
    scroll_y: f32,
    rng: StdRng,
    keyboard: Option<SharedObject>,
    keycaps: Vec<SharedObject>,
    float_periods: Vec<f32>,
}

impl HeroScene {
    /// Builds camera and lights and queues the keyboard and keycap loads
    pub fn new(ctx: &AppContext, clock: AnimationClock) -> Self {
        let config = ctx.config();
        let (width, height) = config.viewport;

        let camera = PerspectiveCamera::new(35.0, width, height)
            .with_position(CAMERA_START)
            .looking_at(Vector3::new(0.0, 0.0, 0.0));
        let lighting = Lighting::new(0.35)
            .with_directional(
                DirectionalLight::new(Vector3::new(4.0, 6.0, 4.0), KEY_LIGHT_START).with_shadows(2048),
            )
            .with_environment(&config.environment_map, config.environment_intensity);
        let scene = Rc::new(RefCell::new(Scene::new("hero", camera, lighting)));

        let mut stage = ScrollTimeline::new(HERO_SCROLL);
        let target = scene.clone();
        stage.track(CAMERA_START, CAMERA_END, Easing::Power2InOut, move |position| {
            target.borrow_mut().camera.position = position;
        });
        let target = scene.clone();
        stage.track_in(
            (0.3, 1.0),
            KEY_LIGHT_START,
            KEY_LIGHT_END,
            Easing::Linear,
            move |intensity| {
                if let Some(light) = target.borrow_mut().lighting.directional.first_mut() {
                    light.intensity = intensity;
                }
            },
        );

        let inbox = Inbox::default();
        spawn_keyboard_load(ctx, &inbox, "hero");
        spawn_keycap_load(ctx, &inbox);

        Self {
            scene,
            clock,
            materials: ctx.materials(),
            inbox,
            timelines: vec![stage],
            scroll_y: 0.0,
            rng: StdRng::seed_from_u64(config.float_seed),
            keyboard: None,
            keycaps: Vec::new(),
            float_periods: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.borrow_mut().resize(width, height);
    }

    pub fn set_scroll(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y;
        for timeline in &mut self.timelines {
            timeline.set_scroll(scroll_y);
        }
    }

    /// Attaches models that finished loading and advances scroll tracks
    pub fn update(&mut self, delta: f32) {
        for arrival in self.inbox.drain() {
            match arrival {
                Arrival::Keyboard(keyboard) => self.attach_keyboard(keyboard),
                Arrival::Keycap(keycap) => self.attach_keycaps(keycap),
            }
        }

        for timeline in &mut self.timelines {
            timeline.advance(delta);
        }
    }

    fn attach_keyboard(&mut self, mut keyboard: Object) {
        if self.keyboard.is_some() {
            warn!("Hero scene already has a keyboard");
            return;
        }

        keyboard.set_position(KEYBOARD_START);
        keyboard.set_rotation(Vector3::new(KEYBOARD_TILT, 0.0, 0.0));
        let keyboard = keyboard.into_shared();
        self.scene.borrow_mut().add_object(keyboard.clone());

        let mut timeline = ScrollTimeline::new(HERO_SCROLL);
        let target = keyboard.clone();
        timeline.track(KEYBOARD_TILT, 0.0, Easing::Power2Out, move |tilt| {
            target.borrow_mut().transform.rotation.x = tilt;
        });
        let target = keyboard.clone();
        timeline.track(KEYBOARD_START, KEYBOARD_END, Easing::SineInOut, move |position| {
            target.borrow_mut().set_position(position);
        });
        timeline.set_scroll(self.scroll_y);
        self.timelines.push(timeline);

        info!("Hero keyboard attached");
        self.keyboard = Some(keyboard);
    }

    /// Places one keycap per slot, each bobbing with its own period
    ///
    /// Keycaps wear the body material, so they follow the current skin.
    fn attach_keycaps(&mut self, mut keycap: Object) {
        let body = self.materials.get(MaterialRole::Body);
        for mesh in &mut keycap.meshes {
            mesh.set_material(body.clone());
            mesh.cast_shadow = true;
            mesh.receive_shadow = true;
        }

        for slot in KEYCAP_SLOTS {
            let mut instance = keycap.clone();
            let position = Vector3::from(slot);
            instance.set_position(position);
            instance.set_rotation(Vector3::new(
                self.rng.random_range(-0.6..0.6),
                self.rng.random_range(-0.6..0.6),
                self.rng.random_range(-0.3..0.3),
            ));
            let instance = instance.into_shared();
            self.scene.borrow_mut().add_object(instance.clone());

            let period = self.rng.random_range(1.6..2.6);
            let delay = self.rng.random_range(0.0..0.8);
            let options = TweenOptions::new(period, Easing::SineInOut)
                .with_delay(delay)
                .forever_yoyo();
            let target = instance.clone();
            self.clock.animate_by(position.y, FLOAT_HEIGHT, options, move |y| {
                target.borrow_mut().transform.position.y = y;
            });

            self.float_periods.push(period);
            self.keycaps.push(instance);
        }
        debug!("Hero keycaps floating ({})", self.keycaps.len());
    }

    pub fn scene(&self) -> Ref<'_, Scene> {
        self.scene.borrow()
    }

    pub fn keyboard(&self) -> Option<&SharedObject> {
        self.keyboard.as_ref()
    }

    pub fn keycaps(&self) -> &[SharedObject] {
        &self.keycaps
    }

    /// Float period of each keycap, in seconds
    pub fn float_periods(&self) -> &[f32] {
        &self.float_periods
    }

    /// Displayed progress of the section's scroll timeline
    pub fn scroll_progress(&self) -> f32 {
        self.timelines.first().map_or(0.0, |timeline| timeline.progress())
    }
}

fn spawn_keycap_load(ctx: &AppContext, inbox: &Inbox) {
    let path = ctx.config().keycap_model.clone();
    let fetch = ctx.asset_source().load_model(&path);
    let inbox = inbox.clone();
    let queued = ctx.spawner().spawn_local(async move {
        match fetch.await {
            Ok(keycap) => inbox.push(Arrival::Keycap(keycap)),
            Err(err) => warn!("Hero scene has no keycaps: {}", err),
        }
    });
    if let Err(err) = queued {
        warn!("Could not queue keycap load: {}", err);
    }
}
