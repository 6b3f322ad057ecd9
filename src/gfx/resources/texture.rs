//! Texture handles and loading
//!
//! A [`TextureHandle`] is handed out synchronously and filled in later, when
//! the owning [`TextureLoader`] is pumped. Materials can hold a handle before
//! its pixels exist; a renderer treats a pending or failed texture as absent.

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, warn};

use crate::config::resolve_asset_path;
use crate::error::{AssetError, AssetResult};

/// How texel values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Srgb,
    Linear,
}

/// Addressing outside the [0, 1] UV range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

/// Sampling parameters fixed at request time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOptions {
    pub color_space: ColorSpace,
    /// Flip rows on decode so V runs bottom-up
    pub flip_y: bool,
    pub wrap: WrapMode,
    pub repeat: [f32; 2],
    pub offset: [f32; 2],
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            color_space: ColorSpace::Srgb,
            flip_y: true,
            wrap: WrapMode::ClampToEdge,
            repeat: [1.0, 1.0],
            offset: [0.0, 0.0],
        }
    }
}

impl TextureOptions {
    /// Builder pattern: Set color space
    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    /// Builder pattern: Set vertical flip
    pub fn with_flip_y(mut self, flip_y: bool) -> Self {
        self.flip_y = flip_y;
        self
    }

    /// Builder pattern: Repeat the texture `u` x `v` times
    pub fn with_repeat(mut self, u: f32, v: f32) -> Self {
        self.wrap = WrapMode::Repeat;
        self.repeat = [u, v];
        self
    }

    /// Builder pattern: Shift UVs
    pub fn with_offset(mut self, u: f32, v: f32) -> Self {
        self.offset = [u, v];
        self
    }
}

/// Decoded RGBA8 pixels
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Single-color texture, mostly useful for placeholders and tests
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }
}

#[derive(Debug)]
enum TextureState {
    Pending,
    Ready(TextureData),
    Failed,
}

struct TextureInner {
    path: String,
    options: TextureOptions,
    state: RefCell<TextureState>,
}

/// Shared reference to a texture whose pixels may arrive later
///
/// Cloning shares the texture. Two handles compare equal only when they refer
/// to the same texture.
#[derive(Clone)]
pub struct TextureHandle {
    inner: Rc<TextureInner>,
}

impl TextureHandle {
    /// Creates a handle with no pixels yet
    pub fn pending(path: &str, options: TextureOptions) -> Self {
        Self {
            inner: Rc::new(TextureInner {
                path: path.to_string(),
                options,
                state: RefCell::new(TextureState::Pending),
            }),
        }
    }

    pub fn path(&self) -> &str {
        &self.inner.path
    }

    pub fn options(&self) -> &TextureOptions {
        &self.inner.options
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.inner.state.borrow(), TextureState::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.inner.state.borrow(), TextureState::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(*self.inner.state.borrow(), TextureState::Failed)
    }

    /// Pixel data, once loaded
    pub fn data(&self) -> Option<Ref<'_, TextureData>> {
        Ref::filter_map(self.inner.state.borrow(), |state| match state {
            TextureState::Ready(data) => Some(data),
            _ => None,
        })
        .ok()
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.data().map(|data| (data.width, data.height))
    }

    /// Stores decoded pixels
    pub fn fill(&self, data: TextureData) {
        *self.inner.state.borrow_mut() = TextureState::Ready(data);
    }

    /// Marks the texture as permanently missing
    pub fn fail(&self) {
        *self.inner.state.borrow_mut() = TextureState::Failed;
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for TextureHandle {}

impl fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureHandle")
            .field("path", &self.inner.path)
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

/// Source of textures: returns handles immediately, fills them on [`pump`]
///
/// [`pump`]: TextureLoader::pump
pub trait TextureLoader {
    /// Requests a texture; the returned handle starts out pending
    fn load(&self, path: &str, options: TextureOptions) -> TextureHandle;

    /// Resolves queued requests, returning how many were settled
    fn pump(&self) -> usize;

    /// Number of requests not yet settled
    fn pending_count(&self) -> usize;
}

/// Decodes image files from the asset root with the `image` crate
///
/// Failed decodes are logged and leave the handle failed; materials using it
/// render untextured.
pub struct FileTextureLoader {
    root: PathBuf,
    queue: RefCell<VecDeque<TextureHandle>>,
}

impl FileTextureLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            queue: RefCell::new(VecDeque::new()),
        }
    }

    fn decode(&self, handle: &TextureHandle) -> AssetResult<TextureData> {
        let path = resolve_asset_path(&self.root, handle.path());
        if !path.exists() {
            return Err(AssetError::NotFound {
                path: path.display().to_string(),
            });
        }

        let image = image::open(&path).map_err(|source| AssetError::Image {
            path: path.display().to_string(),
            source: Arc::new(source),
        })?;

        let image = if handle.options().flip_y {
            image.flipv()
        } else {
            image
        };
        let rgba = image.to_rgba8();

        Ok(TextureData {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }
}

impl TextureLoader for FileTextureLoader {
    fn load(&self, path: &str, options: TextureOptions) -> TextureHandle {
        let handle = TextureHandle::pending(path, options);
        self.queue.borrow_mut().push_back(handle.clone());
        handle
    }

    fn pump(&self) -> usize {
        let drained: Vec<TextureHandle> = self.queue.borrow_mut().drain(..).collect();

        for handle in &drained {
            match self.decode(handle) {
                Ok(data) => {
                    debug!(
                        "Loaded texture {} ({}x{})",
                        handle.path(),
                        data.width,
                        data.height
                    );
                    handle.fill(data);
                }
                Err(err) => {
                    warn!("Texture unavailable, rendering untextured: {}", err);
                    handle.fail();
                }
            }
        }

        drained.len()
    }

    fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }
}
