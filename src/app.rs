//! # Application
//!
//! [`AppContext`] owns the application-lifetime singletons (materials, theme
//! textures, the keyboard loader) that the scenes share. [`ShowcaseApp`]
//! drives both scenes one frame at a time and routes page input to them.

use std::cell::OnceCell;
use std::rc::Rc;

use futures::executor::{LocalPool, LocalSpawner};
use log::{debug, info};

use crate::animation::AnimationClock;
use crate::config::ShowcaseConfig;
use crate::gfx::resources::material::MaterialSet;
use crate::gfx::resources::texture::TextureLoader;
use crate::keyboard::KeyboardModelLoader;
use crate::loaders::AssetSource;
use crate::scenes::{ConfiguratorScene, HeroScene};
use crate::themes::ThemeTextureCache;

/// Shared services and lazily built caches, one per application
///
/// Each cache is built on first use and the same `Rc` is returned from then
/// on. Tests build a fresh context per case.
pub struct AppContext {
    config: ShowcaseConfig,
    asset_source: Rc<dyn AssetSource>,
    texture_loader: Rc<dyn TextureLoader>,
    spawner: LocalSpawner,
    materials: OnceCell<Rc<MaterialSet>>,
    theme_textures: OnceCell<Rc<ThemeTextureCache>>,
    keyboard_loader: OnceCell<Rc<KeyboardModelLoader>>,
}

impl AppContext {
    /// # Arguments
    /// * `asset_source` - Fetches models
    /// * `texture_loader` - Fetches textures; pumped once per frame
    /// * `spawner` - Task queue load and transition tasks run on
    pub fn new(
        config: ShowcaseConfig,
        asset_source: Rc<dyn AssetSource>,
        texture_loader: Rc<dyn TextureLoader>,
        spawner: LocalSpawner,
    ) -> Self {
        Self {
            config,
            asset_source,
            texture_loader,
            spawner,
            materials: OnceCell::new(),
            theme_textures: OnceCell::new(),
            keyboard_loader: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    pub fn asset_source(&self) -> &Rc<dyn AssetSource> {
        &self.asset_source
    }

    pub fn texture_loader(&self) -> &Rc<dyn TextureLoader> {
        &self.texture_loader
    }

    pub fn spawner(&self) -> &LocalSpawner {
        &self.spawner
    }

    /// The material set, built on first call
    ///
    /// Shares the theme texture cache, so the default skin is fetched once.
    pub fn materials(&self) -> Rc<MaterialSet> {
        self.materials
            .get_or_init(|| {
                let themes = self.theme_textures();
                Rc::new(MaterialSet::build(self.texture_loader.as_ref(), &themes))
            })
            .clone()
    }

    /// Theme textures, requested on first call
    pub fn theme_textures(&self) -> Rc<ThemeTextureCache> {
        self.theme_textures
            .get_or_init(|| Rc::new(ThemeTextureCache::build(self.texture_loader.as_ref())))
            .clone()
    }

    /// The keyboard loader every scene shares, so the model is fetched once
    pub fn keyboard_loader(&self) -> Rc<KeyboardModelLoader> {
        self.keyboard_loader
            .get_or_init(|| {
                Rc::new(KeyboardModelLoader::new(
                    self.asset_source.clone(),
                    self.materials(),
                    &self.config.keyboard_model,
                ))
            })
            .clone()
    }
}

/// Page input the scenes respond to
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Resized { width: u32, height: u32 },
    Scrolled { y: f32 },
    ThemeClicked { id: String },
}

/// Both scenes plus the clock and task queue that drive them
pub struct ShowcaseApp {
    context: AppContext,
    pool: LocalPool,
    clock: AnimationClock,
    hero: HeroScene,
    configurator: ConfiguratorScene,
    frames: u64,
}

impl ShowcaseApp {
    /// Builds both scenes; their model loads start on the first frame
    pub fn new(
        config: ShowcaseConfig,
        asset_source: Rc<dyn AssetSource>,
        texture_loader: Rc<dyn TextureLoader>,
    ) -> Self {
        let pool = LocalPool::new();
        let clock = AnimationClock::new();
        let context = AppContext::new(config, asset_source, texture_loader, pool.spawner());

        let hero = HeroScene::new(&context, clock.clone());
        let configurator = ConfiguratorScene::new(&context, clock.clone());
        info!("Showcase initialized");

        Self {
            context,
            pool,
            clock,
            hero,
            configurator,
            frames: 0,
        }
    }

    /// Runs one frame
    ///
    /// Advances tweens and scroll tracks, runs queued tasks until none can
    /// make progress, then settles pending texture loads. Never blocks on a
    /// load.
    pub fn frame(&mut self, delta: f32) {
        self.clock.advance(delta);
        self.hero.update(delta);
        self.configurator.update(delta);

        self.pool.run_until_stalled();

        let settled = self.context.texture_loader().pump();
        if settled > 0 {
            debug!("Frame {}: {} textures settled", self.frames, settled);
        }
        self.frames += 1;
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.hero.set_scroll(y);
        self.configurator.set_scroll(y);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.hero.resize(width, height);
        self.configurator.resize(width, height);
    }

    /// Theme button dispatch; returns whether a transition was queued
    pub fn click_theme(&mut self, id: &str) -> bool {
        self.configurator.click_theme(id)
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Resized { width, height } => self.resize(width, height),
            AppEvent::Scrolled { y } => self.scroll_to(y),
            AppEvent::ThemeClicked { id } => {
                self.click_theme(&id);
            }
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn hero(&self) -> &HeroScene {
        &self.hero
    }

    pub fn configurator(&self) -> &ConfiguratorScene {
        &self.configurator
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::MaterialRole;
    use crate::test_support::{init_logging, keyboard_object, MemoryAssetSource, MemoryTextureLoader};

    const MODEL: &str = "/models/keyboard.obj";

    fn app_with(source: Rc<MemoryAssetSource>, textures: Rc<MemoryTextureLoader>) -> ShowcaseApp {
        init_logging();
        ShowcaseApp::new(ShowcaseConfig::new(), source, textures)
    }

    fn loaded_app() -> (ShowcaseApp, Rc<MemoryAssetSource>, Rc<MemoryTextureLoader>) {
        let source = Rc::new(MemoryAssetSource::new().with_model(MODEL, keyboard_object()));
        let textures = Rc::new(MemoryTextureLoader::new());
        (app_with(source.clone(), textures.clone()), source, textures)
    }

    #[test]
    fn test_caches_are_memoized() {
        let pool = LocalPool::new();
        let ctx = AppContext::new(
            ShowcaseConfig::new(),
            Rc::new(MemoryAssetSource::new()),
            Rc::new(MemoryTextureLoader::new()),
            pool.spawner(),
        );

        assert!(Rc::ptr_eq(&ctx.materials(), &ctx.materials()));
        assert!(Rc::ptr_eq(&ctx.theme_textures(), &ctx.theme_textures()));
        assert!(Rc::ptr_eq(&ctx.keyboard_loader(), &ctx.keyboard_loader()));
        assert!(Rc::ptr_eq(ctx.keyboard_loader().materials(), &ctx.materials()));
    }

    #[test]
    fn test_default_skin_texture_is_requested_once() {
        let pool = LocalPool::new();
        let textures = Rc::new(MemoryTextureLoader::new());
        let ctx = AppContext::new(
            ShowcaseConfig::new(),
            Rc::new(MemoryAssetSource::new()),
            textures.clone(),
            pool.spawner(),
        );

        let materials = ctx.materials();
        let goodwell = ctx.theme_textures().get("goodwell").unwrap().texture.clone();
        assert_eq!(materials.get(MaterialRole::Body).borrow().map.as_ref(), Some(&goodwell));

        let requests = textures.requests();
        let mut unique = requests.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(requests.len(), unique.len());
    }

    #[test]
    fn test_both_scenes_share_one_fetch() {
        let (mut app, source, _) = loaded_app();

        app.frame(1.0 / 60.0);
        app.frame(1.0 / 60.0);

        assert_eq!(source.fetch_count(MODEL), 1);
        let hero = app.hero().keyboard().unwrap().clone();
        let stage = app.configurator().controller().instance().unwrap();
        assert!(!Rc::ptr_eq(&hero, &stage));

        let hero_knob = hero.borrow().mesh("Knob").unwrap().material.clone().unwrap();
        assert!(hero_knob.ptr_eq(app.context().materials().get(MaterialRole::Knob)));
    }

    #[test]
    fn test_textures_fill_during_frames() {
        let (mut app, _, textures) = loaded_app();
        assert!(textures.pending_count() > 0);

        app.frame(0.016);

        assert_eq!(textures.pump_count(), 1);
        assert_eq!(textures.pending_count(), 0);
        assert!(app
            .context()
            .materials()
            .get(MaterialRole::Body)
            .borrow()
            .has_loaded_map());
    }

    #[test]
    fn test_click_runs_full_transition_over_frames() {
        let (mut app, _, _) = loaded_app();
        app.frame(0.016);
        app.frame(0.016);

        app.handle_event(AppEvent::ThemeClicked {
            id: "dreamboard".to_string(),
        });
        app.frame(0.016);
        assert!(app.configurator().controller().is_transitioning());

        for _ in 0..120 {
            app.frame(1.0 / 60.0);
        }
        let controller = app.configurator().controller();
        assert!(!controller.is_transitioning());
        assert_eq!(controller.active_theme(), Some("dreamboard"));
    }

    #[test]
    fn test_frames_without_models_keep_running() {
        let source = Rc::new(MemoryAssetSource::new());
        let mut app = app_with(source, Rc::new(MemoryTextureLoader::new()));

        app.handle_event(AppEvent::Resized {
            width: 1920,
            height: 1080,
        });
        app.handle_event(AppEvent::Scrolled { y: 500.0 });
        for _ in 0..10 {
            app.frame(1.0 / 60.0);
        }

        assert_eq!(app.frame_count(), 10);
        assert!(app.hero().keyboard().is_none());
        assert!(!app.click_theme("kick"));
        assert!(app.hero().scroll_progress() > 0.0);
    }

    #[test]
    fn test_zero_size_resize_is_ignored() {
        let (mut app, _, _) = loaded_app();
        app.resize(1000, 500);
        app.resize(0, 500);
        assert_eq!(app.hero().scene().camera.aspect, 2.0);
    }
}
