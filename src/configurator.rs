//! # Configurator Controller
//!
//! Owns the configurator's keyboard instance and plays the skin swap:
//! lift the keyboard, swap textures and knob accent while it is out of
//! view, then drop it back with a bounce.
//!
//! ## Key Components
//!
//! - [`ConfiguratorController`] - Transition state machine (Idle / Transitioning)
//! - [`ThemeButton`] - One selectable skin, enabled once a model is attached
//! - [`TransitionOutcome`] - What a theme request did
//!
//! Requests arriving mid-transition are dropped, not queued.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use futures::executor::LocalSpawner;
use futures::task::LocalSpawnExt;
use log::{debug, info, warn};

use crate::animation::{AnimationClock, TweenOptions};
use crate::config::MotionConfig;
use crate::gfx::scene::{Object, SharedObject};
use crate::keyboard::MeshRole;
use crate::themes::{find_theme, list_themes, ThemeTexture, ThemeTextureCache};

/// A clickable skin choice
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeButton {
    pub theme_id: &'static str,
    pub label: &'static str,
    pub thumbnail: &'static str,
    pub accent: [f32; 3],
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Another transition is playing
    Busy,
    /// No keyboard attached yet
    ModelNotReady,
    UnknownTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Completed,
    Ignored(IgnoreReason),
}

/// Clears the busy flag however the transition ends
struct BusyGuard(Rc<Cell<bool>>);

impl BusyGuard {
    fn acquire(flag: &Rc<Cell<bool>>) -> Self {
        flag.set(true);
        Self(flag.clone())
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// An accepted request; holds the busy flag until dropped
struct Transition {
    theme_id: &'static str,
    theme: ThemeTexture,
    instance: SharedObject,
    _busy: BusyGuard,
}

pub struct ConfiguratorController {
    theme_textures: Rc<ThemeTextureCache>,
    clock: AnimationClock,
    motion: MotionConfig,
    instance: RefCell<Option<SharedObject>>,
    transitioning: Rc<Cell<bool>>,
    buttons: RefCell<Vec<ThemeButton>>,
    active_theme: RefCell<Option<&'static str>>,
}

impl ConfiguratorController {
    /// Creates the controller with one disabled button per theme
    pub fn new(theme_textures: Rc<ThemeTextureCache>, clock: AnimationClock, motion: MotionConfig) -> Self {
        let buttons = list_themes()
            .iter()
            .map(|theme| ThemeButton {
                theme_id: theme.id,
                label: theme.name,
                thumbnail: theme.thumbnail_path,
                accent: theme.accent,
                enabled: false,
            })
            .collect();

        Self {
            theme_textures,
            clock,
            motion,
            instance: RefCell::new(None),
            transitioning: Rc::new(Cell::new(false)),
            buttons: RefCell::new(buttons),
            active_theme: RefCell::new(None),
        }
    }

    /// Takes ownership of the keyboard, puts it at rest and enables the buttons
    pub fn attach_model(&self, mut object: Object) -> SharedObject {
        object.set_position(self.motion.resting_position);
        let shared = object.into_shared();
        *self.instance.borrow_mut() = Some(shared.clone());

        for button in self.buttons.borrow_mut().iter_mut() {
            button.enabled = true;
        }
        info!("Configurator ready ({} themes)", self.buttons.borrow().len());
        shared
    }

    /// Plays the full swap to theme `id`
    ///
    /// Resolves once the keyboard is back at rest, or immediately when the
    /// request is ignored.
    pub async fn select_theme(&self, id: &str) -> TransitionOutcome {
        match self.begin(id) {
            Ok(transition) => {
                self.play(transition).await;
                TransitionOutcome::Completed
            }
            Err(reason) => TransitionOutcome::Ignored(reason),
        }
    }

    /// Button dispatch: queues the swap to theme `id`
    ///
    /// The controller is busy as soon as this returns `true`. Clicks on
    /// disabled buttons, unknown themes or while transitioning do nothing.
    pub fn click(self: &Rc<Self>, spawner: &LocalSpawner, id: &str) -> bool {
        let transition = match self.begin(id) {
            Ok(transition) => transition,
            Err(reason) => {
                debug!("Click on '{}' ignored: {:?}", id, reason);
                return false;
            }
        };

        let controller = self.clone();
        // A rejected task is dropped along with its guard
        match spawner.spawn_local(async move {
            controller.play(transition).await;
        }) {
            Ok(()) => true,
            Err(err) => {
                warn!("Could not queue theme change: {}", err);
                false
            }
        }
    }

    /// Idle -> Transitioning, or the reason the request is dropped
    fn begin(&self, id: &str) -> Result<Transition, IgnoreReason> {
        if self.transitioning.get() {
            debug!("Ignoring theme '{}': transition in progress", id);
            return Err(IgnoreReason::Busy);
        }
        let Some(instance) = self.instance.borrow().clone() else {
            debug!("Ignoring theme '{}': no keyboard yet", id);
            return Err(IgnoreReason::ModelNotReady);
        };
        let Some((descriptor, theme)) = find_theme(id)
            .and_then(|descriptor| Some((descriptor, self.theme_textures.get(descriptor.id)?)))
        else {
            warn!("Unknown theme '{}'", id);
            return Err(IgnoreReason::UnknownTheme);
        };

        Ok(Transition {
            theme_id: descriptor.id,
            theme: theme.clone(),
            instance,
            _busy: BusyGuard::acquire(&self.transitioning),
        })
    }

    async fn play(&self, transition: Transition) {
        let Transition {
            theme_id,
            theme,
            instance,
            _busy,
        } = transition;
        debug!("Switching to theme '{}'", theme_id);

        let start = instance.borrow().transform.position;
        let lift = TweenOptions::new(self.motion.lift_duration, self.motion.lift_ease);
        let target = instance.clone();
        self.clock
            .animate(start, self.motion.raised_position(), lift, move |position| {
                target.borrow_mut().set_position(position)
            })
            .await;

        let skinned = apply_theme(&instance.borrow(), &theme);
        debug!("Applied theme '{}' to {} meshes", theme_id, skinned);
        *self.active_theme.borrow_mut() = Some(theme_id);

        let raised = instance.borrow().transform.position;
        let settle = TweenOptions::new(self.motion.settle_duration, self.motion.settle_ease);
        let target = instance.clone();
        self.clock
            .animate(raised, self.motion.resting_position, settle, move |position| {
                target.borrow_mut().set_position(position)
            })
            .await;
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning.get()
    }

    pub fn buttons(&self) -> Ref<'_, Vec<ThemeButton>> {
        self.buttons.borrow()
    }

    pub fn instance(&self) -> Option<SharedObject> {
        self.instance.borrow().clone()
    }

    /// Theme applied by the last completed swap
    pub fn active_theme(&self) -> Option<&'static str> {
        *self.active_theme.borrow()
    }
}

/// Puts the theme texture on every skinnable mesh and the accent on the knob
///
/// Returns the number of meshes touched.
fn apply_theme(object: &Object, theme: &ThemeTexture) -> usize {
    let mut touched = 0;
    for mesh in &object.meshes {
        let role = MeshRole::for_mesh(&mesh.name);
        if !role.is_skinnable() {
            continue;
        }
        let Some(material) = &mesh.material else {
            continue;
        };

        let mut material = material.borrow_mut();
        material.map = Some(theme.texture.clone());
        if role == MeshRole::Knob {
            material.base_color = theme.accent;
        }
        touched += 1;
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::bind_materials;
    use crate::test_support::{init_logging, keyboard_object, test_materials, MemoryTextureLoader};
    use futures::executor::LocalPool;

    struct Fixture {
        pool: LocalPool,
        clock: AnimationClock,
        cache: Rc<ThemeTextureCache>,
        controller: Rc<ConfiguratorController>,
    }

    impl Fixture {
        fn new() -> Self {
            init_logging();
            let loader = MemoryTextureLoader::new();
            let cache = Rc::new(ThemeTextureCache::build(&loader));
            let clock = AnimationClock::new();
            let controller = Rc::new(ConfiguratorController::new(
                cache.clone(),
                clock.clone(),
                MotionConfig::default(),
            ));
            Self {
                pool: LocalPool::new(),
                clock,
                cache,
                controller,
            }
        }

        fn attach(&self) -> SharedObject {
            let materials = test_materials(&MemoryTextureLoader::new());
            let mut object = keyboard_object();
            bind_materials(&mut object, &materials);
            self.controller.attach_model(object)
        }

        fn click(&mut self, id: &str) -> bool {
            let queued = self.controller.click(&self.pool.spawner(), id);
            self.pool.run_until_stalled();
            queued
        }

        fn run_for(&mut self, seconds: f32) {
            let frames = (seconds * 60.0).ceil() as usize;
            for _ in 0..frames {
                self.clock.advance(1.0 / 60.0);
                self.pool.run_until_stalled();
            }
        }
    }

    #[test]
    fn test_buttons_enable_on_attach() {
        let fixture = Fixture::new();
        assert_eq!(fixture.controller.buttons().len(), list_themes().len());
        assert!(fixture.controller.buttons().iter().all(|b| !b.enabled));

        fixture.attach();
        assert!(fixture.controller.buttons().iter().all(|b| b.enabled));
    }

    #[test]
    fn test_click_before_model_is_a_no_op() {
        let mut fixture = Fixture::new();
        assert!(!fixture.click("kick"));
        assert_eq!(fixture.clock.active_count(), 0);

        let outcome = pollster::block_on(fixture.controller.select_theme("kick"));
        assert_eq!(outcome, TransitionOutcome::Ignored(IgnoreReason::ModelNotReady));
    }

    #[test]
    fn test_unknown_theme_is_ignored() {
        let fixture = Fixture::new();
        fixture.attach();
        let outcome = pollster::block_on(fixture.controller.select_theme("plaid"));
        assert_eq!(outcome, TransitionOutcome::Ignored(IgnoreReason::UnknownTheme));
        assert!(!fixture.controller.is_transitioning());
    }

    #[test]
    fn test_completed_transition_applies_theme() {
        let mut fixture = Fixture::new();
        let instance = fixture.attach();

        assert!(fixture.click("kick"));
        assert!(fixture.controller.is_transitioning());

        // Halfway through the lift the keyboard is above rest, unskinned
        fixture.run_for(0.15);
        assert!(instance.borrow().transform.position.y > 0.0);
        assert_eq!(fixture.controller.active_theme(), None);

        fixture.run_for(1.0);
        assert!(!fixture.controller.is_transitioning());
        assert_eq!(fixture.controller.active_theme(), Some("kick"));
        assert_eq!(fixture.clock.active_count(), 0);

        let expected = fixture.cache.get("kick").unwrap();
        let object = instance.borrow();
        assert!((object.transform.position.y - 0.0).abs() < 1e-5);
        for mesh in &object.meshes {
            let material = mesh.material.as_ref().unwrap().borrow();
            if MeshRole::for_mesh(&mesh.name).is_skinnable() {
                assert_eq!(material.map.as_ref(), Some(&expected.texture), "{}", mesh.name);
            } else {
                assert_ne!(material.map.as_ref(), Some(&expected.texture), "{}", mesh.name);
            }
        }
        let knob = object.mesh("Knob").unwrap().material.as_ref().unwrap().borrow();
        assert_eq!(knob.base_color, expected.accent);
    }

    #[test]
    fn test_click_while_transitioning_changes_nothing() {
        let mut fixture = Fixture::new();
        fixture.attach();

        assert!(fixture.click("kick"));
        fixture.run_for(0.1);
        assert_eq!(fixture.clock.active_count(), 1);

        assert!(!fixture.click("frog"));
        assert_eq!(fixture.clock.active_count(), 1);

        let busy = pollster::block_on(fixture.controller.select_theme("frog"));
        assert_eq!(busy, TransitionOutcome::Ignored(IgnoreReason::Busy));
        assert_eq!(fixture.clock.active_count(), 1);

        fixture.run_for(1.0);
        assert_eq!(fixture.controller.active_theme(), Some("kick"));
    }

    #[test]
    fn test_second_click_in_the_same_frame_is_rejected() {
        let mut fixture = Fixture::new();
        fixture.attach();
        let spawner = fixture.pool.spawner();

        assert!(fixture.controller.click(&spawner, "kick"));
        assert!(fixture.controller.is_transitioning());
        assert!(!fixture.controller.click(&spawner, "frog"));

        fixture.pool.run_until_stalled();
        assert_eq!(fixture.clock.active_count(), 1);
        fixture.run_for(1.0);
        assert_eq!(fixture.controller.active_theme(), Some("kick"));
        assert!(!fixture.controller.is_transitioning());
    }

    #[test]
    fn test_click_on_unknown_theme_stays_idle() {
        let mut fixture = Fixture::new();
        fixture.attach();
        assert!(!fixture.click("plaid"));
        assert!(!fixture.controller.is_transitioning());
        assert_eq!(fixture.clock.active_count(), 0);
    }

    #[test]
    fn test_instant_motion_completes_on_zero_length_frames() {
        init_logging();
        let loader = MemoryTextureLoader::new();
        let cache = Rc::new(ThemeTextureCache::build(&loader));
        let clock = AnimationClock::new();
        let motion = MotionConfig {
            lift_duration: 0.0,
            settle_duration: 0.0,
            ..MotionConfig::default()
        };
        let controller = Rc::new(ConfiguratorController::new(cache, clock.clone(), motion));
        let mut object = keyboard_object();
        bind_materials(&mut object, &test_materials(&loader));
        let instance = controller.attach_model(object);
        let mut pool = LocalPool::new();

        assert!(controller.click(&pool.spawner(), "frog"));
        for _ in 0..4 {
            pool.run_until_stalled();
            clock.advance(0.0);
        }
        pool.run_until_stalled();

        assert!(!controller.is_transitioning());
        assert_eq!(controller.active_theme(), Some("frog"));
        assert_eq!(instance.borrow().transform.position, motion.resting_position);
    }

    #[test]
    fn test_back_to_back_transitions() {
        let mut fixture = Fixture::new();
        fixture.attach();

        fixture.click("kick");
        fixture.run_for(1.0);
        assert!(fixture.click("frog"));
        fixture.run_for(1.0);

        assert_eq!(fixture.controller.active_theme(), Some("frog"));
        assert!(!fixture.controller.is_transitioning());
    }
}
