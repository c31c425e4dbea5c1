//! Sprite sheets: a frame set over a shared texture.
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::resources::texture::Texture;

/// Integer rectangle in texture pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Frames over a texture. The sheet keeps the texture alive; frames are
/// fixed at construction and are not checked against the texture bounds.
#[derive(Debug)]
pub struct SpriteSheet {
    texture: Rc<Texture>,
    frames: Box<[Rect]>,
}

impl SpriteSheet {
    pub fn create(texture: Rc<Texture>, frames: impl Into<Vec<Rect>>) -> Self {
        Self {
            texture,
            frames: frames.into().into_boxed_slice(),
        }
    }

    pub fn texture(&self) -> &Rc<Texture> {
        &self.texture
    }

    pub fn frames(&self) -> &[Rect] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<Rect> {
        self.frames.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
