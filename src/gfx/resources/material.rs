//! Material system for the keyboard model
//!
//! Provides material definitions and the fixed [`MaterialSet`] every keyboard
//! instance binds its meshes to. Materials are shared by handle: cloned models
//! point at the same materials, so a change to a material is seen by every
//! mesh using it.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};

use super::texture::{TextureHandle, TextureLoader, TextureOptions};
use crate::themes::ThemeTextureCache;

/// Fixed set of surfaces a keyboard is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialRole {
    Body,
    Knob,
    Screen,
    Plate,
    BottomCase,
    TopCase,
    Feet,
}

impl MaterialRole {
    pub const ALL: [MaterialRole; 7] = [
        MaterialRole::Body,
        MaterialRole::Knob,
        MaterialRole::Screen,
        MaterialRole::Plate,
        MaterialRole::BottomCase,
        MaterialRole::TopCase,
        MaterialRole::Feet,
    ];

    fn index(self) -> usize {
        match self {
            MaterialRole::Body => 0,
            MaterialRole::Knob => 1,
            MaterialRole::Screen => 2,
            MaterialRole::Plate => 3,
            MaterialRole::BottomCase => 4,
            MaterialRole::TopCase => 5,
            MaterialRole::Feet => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MaterialRole::Body => "body",
            MaterialRole::Knob => "knob",
            MaterialRole::Screen => "screen",
            MaterialRole::Plate => "plate",
            MaterialRole::BottomCase => "bottom_case",
            MaterialRole::TopCase => "top_case",
            MaterialRole::Feet => "feet",
        }
    }
}

/// Physically based surface description
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub role: MaterialRole,
    /// Linear RGB base color, multiplied with `map` when present
    pub base_color: [f32; 3],
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub map: Option<TextureHandle>,
}

impl Material {
    /// Creates a new material with basic PBR properties
    ///
    /// # Arguments
    /// * `role` - Surface this material is used for
    /// * `base_color` - Linear RGB base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(role: MaterialRole, base_color: [f32; 3], metallic: f32, roughness: f32) -> Self {
        Self {
            name: role.name().to_string(),
            role,
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 0.0,
            map: None,
        }
    }

    /// Builder pattern: Set emissive color and intensity
    pub fn with_emission(mut self, emissive: [f32; 3], intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity.max(0.0);
        self
    }

    /// Builder pattern: Set the color texture
    pub fn with_map(mut self, map: TextureHandle) -> Self {
        self.map = Some(map);
        self
    }

    /// Whether the material has a texture with pixels available
    pub fn has_loaded_map(&self) -> bool {
        self.map.as_ref().is_some_and(|map| map.is_ready())
    }
}

/// Shared, mutable reference to a [`Material`]
#[derive(Clone)]
pub struct MaterialHandle(Rc<RefCell<Material>>);

impl MaterialHandle {
    pub fn new(material: Material) -> Self {
        Self(Rc::new(RefCell::new(material)))
    }

    pub fn borrow(&self) -> Ref<'_, Material> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Material> {
        self.0.borrow_mut()
    }

    /// Whether both handles refer to the same material
    pub fn ptr_eq(&self, other: &MaterialHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn role(&self) -> MaterialRole {
        self.0.borrow().role
    }
}

impl fmt::Debug for MaterialHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MaterialHandle").field(&*self.0.borrow()).finish()
    }
}

/// Where a recipe's color map comes from
#[derive(Debug, Clone, Copy)]
enum MapSource {
    /// Requested from the texture loader
    File(&'static str),
    /// The texture already requested for a theme
    Theme(&'static str),
}

/// How each role's material is built
struct MaterialRecipe {
    role: MaterialRole,
    base_color: [f32; 3],
    metallic: f32,
    roughness: f32,
    emissive: Option<([f32; 3], f32)>,
    texture: Option<MapSource>,
    flip_y: bool,
}

const RECIPES: [MaterialRecipe; 7] = [
    MaterialRecipe {
        role: MaterialRole::Body,
        base_color: [1.0, 1.0, 1.0],
        metallic: 0.0,
        roughness: 0.7,
        emissive: None,
        texture: Some(MapSource::Theme("goodwell")),
        flip_y: false,
    },
    MaterialRecipe {
        role: MaterialRole::Knob,
        base_color: [0.9, 0.9, 0.9],
        metallic: 1.0,
        roughness: 0.4,
        emissive: None,
        texture: None,
        flip_y: false,
    },
    MaterialRecipe {
        role: MaterialRole::Screen,
        base_color: [1.0, 1.0, 1.0],
        metallic: 0.0,
        roughness: 0.4,
        emissive: Some(([1.0, 1.0, 1.0], 0.3)),
        texture: Some(MapSource::File("/textures/screen_uv.png")),
        flip_y: false,
    },
    MaterialRecipe {
        role: MaterialRole::Plate,
        base_color: [0.2, 0.2, 0.2],
        metallic: 0.6,
        roughness: 0.5,
        emissive: None,
        texture: None,
        flip_y: false,
    },
    MaterialRecipe {
        role: MaterialRole::BottomCase,
        base_color: [0.15, 0.15, 0.16],
        metallic: 0.2,
        roughness: 0.8,
        emissive: None,
        texture: None,
        flip_y: false,
    },
    MaterialRecipe {
        role: MaterialRole::TopCase,
        base_color: [0.6, 0.6, 0.62],
        metallic: 0.5,
        roughness: 0.5,
        emissive: None,
        texture: None,
        flip_y: false,
    },
    MaterialRecipe {
        role: MaterialRole::Feet,
        base_color: [0.05, 0.05, 0.05],
        metallic: 0.0,
        roughness: 0.9,
        emissive: None,
        texture: None,
        flip_y: false,
    },
];

/// One material per [`MaterialRole`]
///
/// Built once per application context; the role-to-material mapping never
/// changes afterwards, though material properties may.
pub struct MaterialSet {
    materials: [MaterialHandle; 7],
}

impl MaterialSet {
    /// Builds every material, requesting textures from `loader`
    ///
    /// Maps that show a theme reuse that theme's handle from `themes`, so each
    /// file is requested once. Textures arrive asynchronously; the materials
    /// are usable right away and pick up their maps once the loader has been
    /// pumped.
    pub fn build(loader: &dyn TextureLoader, themes: &ThemeTextureCache) -> Self {
        let materials = RECIPES.map(|recipe| {
            let mut material = Material::new(
                recipe.role,
                recipe.base_color,
                recipe.metallic,
                recipe.roughness,
            );

            if let Some((color, intensity)) = recipe.emissive {
                material = material.with_emission(color, intensity);
            }

            match recipe.texture {
                Some(MapSource::File(path)) => {
                    let options = TextureOptions::default().with_flip_y(recipe.flip_y);
                    material = material.with_map(loader.load(path, options));
                }
                Some(MapSource::Theme(id)) => match themes.get(id) {
                    Some(theme) => material = material.with_map(theme.texture.clone()),
                    None => warn!(
                        "No texture for theme '{}', {} left untextured",
                        id,
                        recipe.role.name()
                    ),
                },
                None => {}
            }

            MaterialHandle::new(material)
        });

        debug!("Built material set ({} materials)", materials.len());

        Self { materials }
    }

    /// Gets the material for a role
    pub fn get(&self, role: MaterialRole) -> &MaterialHandle {
        &self.materials[role.index()]
    }

    /// Iterates `(role, material)` pairs in [`MaterialRole::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (MaterialRole, &MaterialHandle)> {
        MaterialRole::ALL
            .iter()
            .map(move |&role| (role, self.get(role)))
    }
}

impl fmt::Debug for MaterialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryTextureLoader;

    fn build_with(loader: &MemoryTextureLoader) -> (MaterialSet, ThemeTextureCache) {
        let themes = ThemeTextureCache::build(loader);
        (MaterialSet::build(loader, &themes), themes)
    }

    #[test]
    fn test_recipes_cover_every_role_in_order() {
        for (recipe, role) in RECIPES.iter().zip(MaterialRole::ALL) {
            assert_eq!(recipe.role, role);
            assert_eq!(role.index(), MaterialRole::ALL.iter().position(|r| *r == role).unwrap());
        }
    }

    #[test]
    fn test_build_assigns_roles_and_requests_textures() {
        let loader = MemoryTextureLoader::new();
        let (set, themes) = build_with(&loader);

        for (role, material) in set.iter() {
            assert_eq!(material.role(), role);
            assert_eq!(material.borrow().name, role.name());
        }

        let files = RECIPES
            .iter()
            .filter(|r| matches!(r.texture, Some(MapSource::File(_))))
            .count();
        assert_eq!(loader.requests().len(), themes.len() + files);
        assert!(set.get(MaterialRole::Screen).borrow().emissive_intensity > 0.0);
    }

    #[test]
    fn test_body_map_shares_the_theme_texture() {
        let loader = MemoryTextureLoader::new();
        let (set, themes) = build_with(&loader);

        let body = set.get(MaterialRole::Body).borrow();
        assert_eq!(body.map.as_ref(), Some(&themes.get("goodwell").unwrap().texture));
        let requests = loader.requests();
        let goodwell = requests
            .iter()
            .filter(|path| path.as_str() == "/textures/goodwell_uv.png")
            .count();
        assert_eq!(goodwell, 1);
    }

    #[test]
    fn test_maps_fill_after_pump() {
        let loader = MemoryTextureLoader::new();
        let (set, _themes) = build_with(&loader);
        let body = set.get(MaterialRole::Body);

        assert!(!body.borrow().has_loaded_map());
        loader.pump();
        assert!(body.borrow().has_loaded_map());
    }

    #[test]
    fn test_failed_texture_leaves_material_untextured() {
        let loader = MemoryTextureLoader::new().failing("/textures/goodwell_uv.png");
        let (set, _themes) = build_with(&loader);
        loader.pump();

        let body = set.get(MaterialRole::Body).borrow();
        assert!(body.map.as_ref().unwrap().is_failed());
        assert!(!body.has_loaded_map());
    }

    #[test]
    fn test_clamped_factors() {
        let material = Material::new(MaterialRole::Knob, [1.0, 1.0, 1.0], 2.0, -1.0);
        assert_eq!(material.metallic, 1.0);
        assert_eq!(material.roughness, 0.0);
    }
}
