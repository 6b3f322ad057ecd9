//! # Theme Registry
//!
//! The fixed, ordered list of keyboard skins and the cache of their loaded
//! textures. The cache is built once per application context (see
//! [`AppContext::theme_textures`](crate::app::AppContext::theme_textures)).

use std::collections::HashMap;

use log::debug;

use crate::gfx::resources::texture::{TextureHandle, TextureLoader, TextureOptions};

/// A skin: texture for the swappable surfaces plus an accent for the knob
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub texture_path: &'static str,
    pub thumbnail_path: &'static str,
    /// Linear RGB knob color
    pub accent: [f32; 3],
}

const THEMES: [ThemeDescriptor; 6] = [
    ThemeDescriptor {
        id: "goodwell",
        name: "Goodwell",
        texture_path: "/textures/goodwell_uv.png",
        thumbnail_path: "/textures/thumbs/goodwell.png",
        accent: [0.84, 0.25, 0.16],
    },
    ThemeDescriptor {
        id: "dreamboard",
        name: "Dreamboard",
        texture_path: "/textures/dreamboard_uv.png",
        thumbnail_path: "/textures/thumbs/dreamboard.png",
        accent: [0.55, 0.36, 0.96],
    },
    ThemeDescriptor {
        id: "cherrynavy",
        name: "Cherry Navy",
        texture_path: "/textures/cherrynavy_uv.png",
        thumbnail_path: "/textures/thumbs/cherrynavy.png",
        accent: [0.85, 0.1, 0.25],
    },
    ThemeDescriptor {
        id: "kick",
        name: "Kick",
        texture_path: "/textures/kick_uv.png",
        thumbnail_path: "/textures/thumbs/kick.png",
        accent: [0.96, 0.72, 0.1],
    },
    ThemeDescriptor {
        id: "oldschool",
        name: "Old School",
        texture_path: "/textures/oldschool_uv.png",
        thumbnail_path: "/textures/thumbs/oldschool.png",
        accent: [0.36, 0.55, 0.45],
    },
    ThemeDescriptor {
        id: "frog",
        name: "Frog",
        texture_path: "/textures/frog_uv.png",
        thumbnail_path: "/textures/thumbs/frog.png",
        accent: [0.3, 0.78, 0.3],
    },
];

/// Every theme, in display order
pub fn list_themes() -> &'static [ThemeDescriptor] {
    &THEMES
}

pub fn find_theme(id: &str) -> Option<&'static ThemeDescriptor> {
    THEMES.iter().find(|theme| theme.id == id)
}

/// Loaded texture and accent for one theme
#[derive(Debug, Clone)]
pub struct ThemeTexture {
    pub texture: TextureHandle,
    pub accent: [f32; 3],
}

/// Theme id to texture, filled once and read-only afterwards
#[derive(Debug)]
pub struct ThemeTextureCache {
    entries: HashMap<&'static str, ThemeTexture>,
}

impl ThemeTextureCache {
    /// Requests every theme texture from `loader`
    pub fn build(loader: &dyn TextureLoader) -> Self {
        let options = TextureOptions::default().with_flip_y(false);
        let entries: HashMap<_, _> = list_themes()
            .iter()
            .map(|theme| {
                let texture = loader.load(theme.texture_path, options);
                (
                    theme.id,
                    ThemeTexture {
                        texture,
                        accent: theme.accent,
                    },
                )
            })
            .collect();

        debug!("Requested {} theme textures", entries.len());
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&ThemeTexture> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryTextureLoader;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let ids: Vec<&str> = list_themes().iter().map(|t| t.id).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(ids[0], "goodwell");
    }

    #[test]
    fn test_find_theme() {
        assert_eq!(find_theme("kick").unwrap().name, "Kick");
        assert!(find_theme("missing").is_none());
    }

    #[test]
    fn test_cache_holds_one_texture_per_theme() {
        let loader = MemoryTextureLoader::new();
        let cache = ThemeTextureCache::build(&loader);

        assert_eq!(cache.len(), list_themes().len());
        assert_eq!(loader.requests().len(), list_themes().len());
        for theme in list_themes() {
            let entry = cache.get(theme.id).unwrap();
            assert_eq!(entry.texture.path(), theme.texture_path);
            assert_eq!(entry.accent, theme.accent);
        }

        loader.pump();
        assert!(cache.get("frog").unwrap().texture.is_ready());
    }
}
