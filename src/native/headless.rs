//! In-memory native backends.
//!
//! [`HeadlessRenderer`] behaves like a real render graph (bounded list,
//! stale-handle rejection, live texture accounting) without a window, and
//! records every successful native call in a journal so callers can assert
//! on ordering. Failures can be injected one call at a time.
//!
//! [`ScriptedKeyboard`] is a key poller whose state is set by hand.
use std::cell::{Cell, RefCell};

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::components::sprite::SpriteLink;
use crate::events::input::{InputError, KeyCode};
use crate::native::renderlist::{DrawCommand, RenderList};
use crate::native::{KeyPoller, NativeError, NativeRenderer, NodeHandle, TextureHandle};
use crate::resources::texture::PixelFormat;

/// A successful native call, as recorded by [`HeadlessRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeCall {
    TextureCreate(TextureHandle),
    TextureDestroy(TextureHandle),
    Attach(NodeHandle),
    Detach(NodeHandle),
}

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_texture: Cell<u64>,
    textures: RefCell<FxHashMap<TextureHandle, (u32, u32)>>,
    list: RefCell<RenderList>,
    journal: RefCell<Vec<NativeCall>>,
    fail_texture: Cell<bool>,
    fail_attach: Cell<bool>,
    fail_detach: Cell<bool>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer whose render list holds at most `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: RefCell::new(RenderList::with_capacity(capacity)),
            ..Self::default()
        }
    }

    /// Make the next `texture_create` fail with an allocation error.
    pub fn fail_next_texture(&self) {
        self.fail_texture.set(true);
    }

    /// Make the next `attach_sprite` fail.
    pub fn fail_next_attach(&self) {
        self.fail_attach.set(true);
    }

    /// Make the next `detach` fail, leaving the node attached.
    pub fn fail_next_detach(&self) {
        self.fail_detach.set(true);
    }

    /// Snapshot of the recorded calls.
    pub fn journal(&self) -> Vec<NativeCall> {
        self.journal.borrow().clone()
    }

    pub fn clear_journal(&self) {
        self.journal.borrow_mut().clear();
    }

    /// Number of textures created and not yet destroyed.
    pub fn live_textures(&self) -> usize {
        self.textures.borrow().len()
    }

    /// Number of nodes currently attached to the render list.
    pub fn live_nodes(&self) -> usize {
        self.list.borrow().len()
    }

    pub fn contains_node(&self, node: NodeHandle) -> bool {
        self.list.borrow().contains(node)
    }

    /// Walk the render list and return what would be drawn this frame.
    pub fn present(&self) -> Vec<DrawCommand> {
        self.list.borrow().draw_commands()
    }

    fn record(&self, call: NativeCall) {
        self.journal.borrow_mut().push(call);
    }
}

impl NativeRenderer for HeadlessRenderer {
    fn texture_create(
        &self,
        format: PixelFormat,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureHandle, NativeError> {
        if self.fail_texture.replace(false) {
            return Err(NativeError::Allocation("injected failure".to_string()));
        }
        let id = self.next_texture.get() + 1;
        self.next_texture.set(id);
        let handle = TextureHandle(id);
        self.textures.borrow_mut().insert(handle, (width, height));
        debug!(
            "headless: created texture {} ({}x{} {:?}, {} bytes)",
            id,
            width,
            height,
            format,
            pixels.len()
        );
        self.record(NativeCall::TextureCreate(handle));
        Ok(handle)
    }

    fn texture_destroy(&self, handle: TextureHandle) {
        if self.textures.borrow_mut().remove(&handle).is_none() {
            debug!("headless: destroy of unknown texture {}", handle.0);
        }
        self.record(NativeCall::TextureDestroy(handle));
    }

    fn attach_sprite(&self, sprite: SpriteLink) -> Result<NodeHandle, NativeError> {
        if self.fail_attach.replace(false) {
            return Err(NativeError::RenderQueueFull);
        }
        let node = self.list.borrow_mut().insert(sprite)?;
        self.record(NativeCall::Attach(node));
        Ok(node)
    }

    fn detach(&self, node: NodeHandle) -> Result<(), NativeError> {
        if self.fail_detach.replace(false) {
            return Err(NativeError::BadNode(node));
        }
        self.list.borrow_mut().remove(node)?;
        self.record(NativeCall::Detach(node));
        Ok(())
    }
}

/// Key poller driven by test code or a replay.
#[derive(Debug, Default)]
pub struct ScriptedKeyboard {
    down: RefCell<FxHashSet<KeyCode>>,
    rejected: RefCell<FxHashSet<KeyCode>>,
}

impl ScriptedKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, code: KeyCode, down: bool) {
        if down {
            self.down.borrow_mut().insert(code);
        } else {
            self.down.borrow_mut().remove(&code);
        }
    }

    pub fn press(&self, code: KeyCode) {
        self.set(code, true);
    }

    pub fn release(&self, code: KeyCode) {
        self.set(code, false);
    }

    pub fn release_all(&self) {
        self.down.borrow_mut().clear();
    }

    /// Make polling `code` fail as if the platform did not know the key.
    pub fn reject(&self, code: KeyCode) {
        self.rejected.borrow_mut().insert(code);
    }
}

impl KeyPoller for ScriptedKeyboard {
    fn key_poll(&self, code: KeyCode) -> Result<bool, InputError> {
        if self.rejected.borrow().contains(&code) {
            return Err(InputError::InvalidKeyCode(code.native_code()));
        }
        Ok(self.down.borrow().contains(&code))
    }
}
