//! Shared texture references keyed by asset path.
//!
//! Sprites hold `Arc<Texture2D>`; the store hands out the same `Arc` for the
//! same path so snapshot rehydration does not duplicate texture references.

use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::render::texture::Texture2D;

#[derive(Clone, Debug, Default)]
pub struct TextureStore {
    map: FxHashMap<String, Arc<Texture2D>>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the texture for `path`, creating the reference on first use.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Arc<Texture2D> {
        let key = path.as_ref().to_string_lossy().into_owned();
        Arc::clone(
            self.map
                .entry(key)
                .or_insert_with(|| Arc::new(Texture2D::new(path.as_ref()))),
        )
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<Arc<Texture2D>> {
        let key = path.as_ref().to_string_lossy();
        self.map.get(&*key).cloned()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
