//! Native platform capabilities consumed by the binding layer.
//!
//! The core never talks to a graphics library directly. Everything it needs
//! from the platform goes through two small traits:
//!
//! - [`NativeRenderer`] – texture allocation and render-graph node
//!   attach/detach
//! - [`KeyPoller`] – the per-key "is it down right now" query
//!
//! Submodules overview
//! - [`renderlist`] – bounded render list shared by all backends
//! - [`headless`] – in-memory backends with a call journal, used by tests and
//!   tooling
//! - `raylib` – raylib-backed window, renderer and keyboard (feature `raylib`)

pub mod headless;
#[cfg(feature = "raylib")]
pub mod raylib;
pub mod renderlist;

use std::rc::Rc;

use crate::components::sprite::SpriteLink;
use crate::events::input::{InputError, KeyCode};
use crate::resources::texture::PixelFormat;

/// Opaque handle of a texture owned by the native layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Opaque handle of a node in the native render graph.
///
/// The generation guards against a stale handle addressing a slot that was
/// freed and handed to another sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub index: u32,
    pub generation: u32,
}

/// Failure reported by a native call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NativeError {
    #[error("render queue is full")]
    RenderQueueFull,
    #[error("unknown or stale render node {0:?}")]
    BadNode(NodeHandle),
    #[error("texture allocation failed: {0}")]
    Allocation(String),
}

/// Rendering half of the native layer.
///
/// All methods take `&self`: implementations keep their mutable state behind
/// cells, because textures and sprites hold a shared [`RendererRef`] and call
/// back into it from `Drop`.
pub trait NativeRenderer {
    /// Allocate a texture from tightly packed pixel rows.
    fn texture_create(
        &self,
        format: PixelFormat,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureHandle, NativeError>;

    /// Release a texture. Called exactly once per successful `texture_create`.
    fn texture_destroy(&self, handle: TextureHandle);

    /// Add a sprite to the render graph.
    fn attach_sprite(&self, sprite: SpriteLink) -> Result<NodeHandle, NativeError>;

    /// Remove a node previously returned by [`NativeRenderer::attach_sprite`].
    fn detach(&self, node: NodeHandle) -> Result<(), NativeError>;
}

/// Keyboard half of the native layer.
pub trait KeyPoller {
    /// Whether `code` is held down right now.
    fn key_poll(&self, code: KeyCode) -> Result<bool, InputError>;
}

/// Shared handle to the renderer, held by every texture and sprite.
pub type RendererRef = Rc<dyn NativeRenderer>;
