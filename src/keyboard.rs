//! # Keyboard Model
//!
//! Loads the keyboard asset once, binds each named mesh to its material and
//! hands out independent copies.
//!
//! ## Mesh naming
//!
//! The model is authored with fixed mesh names; [`MeshRole::from_mesh_name`]
//! is the complete table. Meshes with any other name are treated as body
//! parts (keycaps, stabilizers, ...) and reported once per load.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use log::{debug, info, warn};

use crate::error::{AssetError, AssetResult};
use crate::gfx::resources::material::{MaterialRole, MaterialSet};
use crate::gfx::scene::Object;
use crate::loaders::AssetSource;

/// What a named mesh of the keyboard model is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshRole {
    Knob,
    Screen,
    TopCase,
    Plate,
    BottomCase,
    Feet,
    Body,
}

impl MeshRole {
    /// Exact-name lookup; `None` for names outside the table
    pub fn from_mesh_name(name: &str) -> Option<MeshRole> {
        match name {
            "Knob" => Some(MeshRole::Knob),
            "Screen" => Some(MeshRole::Screen),
            "Top_Case" => Some(MeshRole::TopCase),
            "Plate" | "PCB" => Some(MeshRole::Plate),
            "Cube005" => Some(MeshRole::BottomCase),
            "Cube005_1" | "Weight" => Some(MeshRole::Feet),
            _ => None,
        }
    }

    pub fn material_role(self) -> MaterialRole {
        match self {
            MeshRole::Knob => MaterialRole::Knob,
            MeshRole::Screen => MaterialRole::Screen,
            MeshRole::TopCase => MaterialRole::TopCase,
            MeshRole::Plate => MaterialRole::Plate,
            MeshRole::BottomCase => MaterialRole::BottomCase,
            MeshRole::Feet => MaterialRole::Feet,
            MeshRole::Body => MaterialRole::Body,
        }
    }

    /// Whether theme textures apply to this part
    pub fn is_skinnable(self) -> bool {
        matches!(self, MeshRole::Knob | MeshRole::Body)
    }

    /// Role for a mesh name, falling back to [`MeshRole::Body`]
    pub fn for_mesh(name: &str) -> MeshRole {
        Self::from_mesh_name(name).unwrap_or(MeshRole::Body)
    }
}

/// Outcome of [`bind_materials`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingReport {
    pub bound: usize,
    /// Mesh names that were not in the table and became body parts
    pub unrecognized: Vec<String>,
}

/// Assigns every mesh its role's material and enables shadows
///
/// The screen mesh is mirrored on X so its texture reads correctly.
pub fn bind_materials(object: &mut Object, materials: &MaterialSet) -> BindingReport {
    let mut report = BindingReport::default();

    for mesh in &mut object.meshes {
        let role = match MeshRole::from_mesh_name(&mesh.name) {
            Some(role) => role,
            None => {
                if !report.unrecognized.contains(&mesh.name) {
                    report.unrecognized.push(mesh.name.clone());
                }
                MeshRole::Body
            }
        };

        mesh.set_material(materials.get(role.material_role()).clone());
        mesh.cast_shadow = true;
        mesh.receive_shadow = true;

        if role == MeshRole::Screen {
            mesh.transform.scale.x = -mesh.transform.scale.x;
        }

        report.bound += 1;
    }

    if !report.unrecognized.is_empty() {
        warn!(
            "{} mesh name(s) not in the material table, bound as body: {}",
            report.unrecognized.len(),
            report.unrecognized.join(", ")
        );
    }

    report
}

type BaseLoad = Shared<LocalBoxFuture<'static, Result<Rc<Object>, AssetError>>>;

enum LoadState {
    Empty,
    Loading(BaseLoad),
    Ready(Rc<Object>),
}

/// Loads, binds and caches the keyboard model
///
/// Only one fetch ever reaches the [`AssetSource`] per successful load:
/// callers arriving while it is in flight join it. Each caller gets its own
/// clone of the cached base. A failed load is not cached.
pub struct KeyboardModelLoader {
    source: Rc<dyn AssetSource>,
    materials: Rc<MaterialSet>,
    path: String,
    state: RefCell<LoadState>,
    fetches: Cell<usize>,
}

impl KeyboardModelLoader {
    pub fn new(source: Rc<dyn AssetSource>, materials: Rc<MaterialSet>, path: &str) -> Self {
        Self {
            source,
            materials,
            path: path.to_string(),
            state: RefCell::new(LoadState::Empty),
            fetches: Cell::new(0),
        }
    }

    /// Returns a fresh, material-bound copy of the keyboard
    pub async fn load(&self) -> AssetResult<Object> {
        let pending = match &*self.state.borrow() {
            LoadState::Ready(base) => return Ok(Object::clone(base)),
            LoadState::Loading(pending) => Some(pending.clone()),
            LoadState::Empty => None,
        };
        let pending = match pending {
            Some(pending) => {
                debug!("Joining in-flight load of {}", self.path);
                pending
            }
            None => self.start_fetch(),
        };

        match pending.clone().await {
            Ok(base) => {
                let mut state = self.state.borrow_mut();
                if matches!(&*state, LoadState::Loading(current) if current.ptr_eq(&pending)) {
                    *state = LoadState::Ready(base.clone());
                }
                Ok(Object::clone(&base))
            }
            Err(err) => {
                let mut state = self.state.borrow_mut();
                if matches!(&*state, LoadState::Loading(current) if current.ptr_eq(&pending)) {
                    *state = LoadState::Empty;
                }
                warn!("Keyboard model failed to load: {}", err);
                Err(err)
            }
        }
    }

    fn start_fetch(&self) -> BaseLoad {
        self.fetches.set(self.fetches.get() + 1);
        info!("Fetching keyboard model {}", self.path);

        let fetch = self.source.load_model(&self.path);
        let materials = self.materials.clone();
        let load = async move {
            let mut base = fetch.await?;
            bind_materials(&mut base, &materials);
            Ok::<_, AssetError>(Rc::new(base))
        }
        .boxed_local()
        .shared();

        *self.state.borrow_mut() = LoadState::Loading(load.clone());
        load
    }

    /// Number of fetches issued to the asset source
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }

    /// Whether the bound base model is cached
    pub fn is_cached(&self) -> bool {
        matches!(*self.state.borrow(), LoadState::Ready(_))
    }

    pub fn materials(&self) -> &Rc<MaterialSet> {
        &self.materials
    }
}
