//! In-memory stand-ins for the asset source and texture loader

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::task::{Poll, Waker};

use futures::future::{poll_fn, LocalBoxFuture};
use futures::FutureExt;

use crate::error::{AssetError, AssetResult};
use crate::gfx::resources::texture::{TextureData, TextureHandle, TextureLoader, TextureOptions};
use crate::gfx::resources::MaterialSet;
use crate::gfx::scene::{Mesh, MeshGeometry, Object};
use crate::loaders::AssetSource;
use crate::themes::ThemeTextureCache;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Material set with its theme textures requested from the same loader
pub fn test_materials(loader: &MemoryTextureLoader) -> MaterialSet {
    MaterialSet::build(loader, &ThemeTextureCache::build(loader))
}

/// Keyboard-shaped object: every named part plus two keycaps
pub fn keyboard_object() -> Object {
    let geometry = Rc::new(MeshGeometry::from_arrays(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        &[],
        &[],
        vec![0, 1, 2],
    ));
    let names = [
        "Knob",
        "Screen",
        "Top_Case",
        "Plate",
        "PCB",
        "Cube005",
        "Cube005_1",
        "Weight",
        "Keycap_Q",
        "Keycap_W",
    ];
    let meshes = names
        .iter()
        .map(|name| Mesh::new(name, geometry.clone()))
        .collect();
    Object::new("keyboard", meshes)
}

#[derive(Default)]
struct Gate {
    open: bool,
    waiting: Vec<Waker>,
}

/// Serves objects from memory and counts fetches per path
///
/// A gated source holds every fetch until [`open_gate`](Self::open_gate).
#[derive(Default)]
pub struct MemoryAssetSource {
    models: RefCell<HashMap<String, Object>>,
    fetches: RefCell<HashMap<String, usize>>,
    gate: Option<Rc<RefCell<Gate>>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(self, path: &str, object: Object) -> Self {
        self.insert(path, object);
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Rc::new(RefCell::new(Gate::default())));
        self
    }

    pub fn insert(&self, path: &str, object: Object) {
        self.models.borrow_mut().insert(path.to_string(), object);
    }

    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            let mut gate = gate.borrow_mut();
            gate.open = true;
            for waker in gate.waiting.drain(..) {
                waker.wake();
            }
        }
    }

    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches.borrow().get(path).copied().unwrap_or(0)
    }
}

impl AssetSource for MemoryAssetSource {
    fn load_model(&self, path: &str) -> LocalBoxFuture<'static, AssetResult<Object>> {
        *self.fetches.borrow_mut().entry(path.to_string()).or_default() += 1;

        let result = self
            .models
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound {
                path: path.to_string(),
            });
        let gate = self.gate.clone();

        async move {
            if let Some(gate) = gate {
                poll_fn(|cx| {
                    let mut gate = gate.borrow_mut();
                    if gate.open {
                        Poll::Ready(())
                    } else {
                        gate.waiting.push(cx.waker().clone());
                        Poll::Pending
                    }
                })
                .await;
            }
            result
        }
        .boxed_local()
    }
}

/// Texture loader that fills every request with a 1x1 texel on pump
#[derive(Default)]
pub struct MemoryTextureLoader {
    requests: RefCell<Vec<String>>,
    queue: RefCell<VecDeque<TextureHandle>>,
    failing: HashSet<String>,
    pumps: Cell<usize>,
}

impl MemoryTextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests for `path` fail when pumped
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    /// Every path requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Times [`TextureLoader::pump`] has run
    pub fn pump_count(&self) -> usize {
        self.pumps.get()
    }
}

impl TextureLoader for MemoryTextureLoader {
    fn load(&self, path: &str, options: TextureOptions) -> TextureHandle {
        self.requests.borrow_mut().push(path.to_string());
        let handle = TextureHandle::pending(path, options);
        self.queue.borrow_mut().push_back(handle.clone());
        handle
    }

    fn pump(&self) -> usize {
        self.pumps.set(self.pumps.get() + 1);
        let drained: Vec<TextureHandle> = self.queue.borrow_mut().drain(..).collect();
        for handle in &drained {
            if self.failing.contains(handle.path()) {
                handle.fail();
            } else {
                handle.fill(TextureData::solid(1, 1, [255, 255, 255, 255]));
            }
        }
        drained.len()
    }

    fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }
}
