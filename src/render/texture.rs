//! Path-addressed texture reference.
//!
//! The scene never touches pixel data. A [`Texture2D`] names the asset a
//! backend should bind; sprites share it through an `Arc`.

use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Texture2D {
    path: PathBuf,
}

impl Texture2D {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
