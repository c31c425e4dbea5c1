//! Raylib-backed window, renderer and keyboard.
//!
//! [`RaylibBackend`] owns the raylib handle and implements both
//! [`NativeRenderer`] and [`KeyPoller`]. Textures live in a map keyed by the
//! handles given out to the core; attached sprites live in a
//! [`RenderList`] that [`RaylibBackend::present`] walks every frame.
use std::cell::{Cell, RefCell};

use log::{debug, info};
use ::raylib::ffi;
use ::raylib::prelude::*;
use rustc_hash::FxHashMap;

use crate::components::sprite::SpriteLink;
use crate::events::input::{InputError, KeyCode};
use crate::native::renderlist::RenderList;
use crate::native::{KeyPoller, NativeError, NativeRenderer, NodeHandle, TextureHandle};
use crate::resources::gameconfig::GameConfig;
use crate::resources::texture::PixelFormat;

// Textures must unload before the window closes, so `rl` is declared last.
pub struct RaylibBackend {
    list: RefCell<RenderList>,
    textures: RefCell<FxHashMap<TextureHandle, Texture2D>>,
    next_texture: Cell<u64>,
    thread: RaylibThread,
    rl: RefCell<RaylibHandle>,
}

fn keyboard_key(code: KeyCode) -> KeyboardKey {
    match code {
        KeyCode::W => KeyboardKey::KEY_W,
        KeyCode::A => KeyboardKey::KEY_A,
        KeyCode::S => KeyboardKey::KEY_S,
        KeyCode::D => KeyboardKey::KEY_D,
        KeyCode::Esc => KeyboardKey::KEY_ESCAPE,
        KeyCode::Space => KeyboardKey::KEY_SPACE,
    }
}

impl RaylibBackend {
    /// Open the window described by `config`.
    pub fn init(config: &GameConfig) -> Self {
        let (mut rl, thread) = ::raylib::init()
            .size(config.window_width as i32, config.window_height as i32)
            .title(&config.window_title)
            .build();
        rl.set_target_fps(config.target_fps);
        // Esc is a game key, not a window close shortcut
        rl.set_exit_key(None);
        info!(
            "Window opened: {}x{} \"{}\"",
            config.window_width, config.window_height, config.window_title
        );
        Self {
            list: RefCell::new(RenderList::new()),
            textures: RefCell::new(FxHashMap::default()),
            next_texture: Cell::new(0),
            thread,
            rl: RefCell::new(rl),
        }
    }

    pub fn should_close(&self) -> bool {
        self.rl.borrow().window_should_close()
    }

    /// Seconds elapsed during the last frame.
    pub fn frame_time(&self) -> f32 {
        self.rl.borrow().get_frame_time()
    }

    /// Clear the screen and draw every attached sprite in render-list order.
    pub fn present(&self) {
        let commands = self.list.borrow().draw_commands();
        let textures = self.textures.borrow();
        let mut rl = self.rl.borrow_mut();
        let mut d = rl.begin_drawing(&self.thread);
        d.clear_background(Color::BLACK);
        for cmd in commands {
            let Some(texture) = textures.get(&cmd.texture) else {
                continue;
            };
            let source = Rectangle::new(
                cmd.source.x as f32,
                cmd.source.y as f32,
                cmd.source.w as f32,
                cmd.source.h as f32,
            );
            d.draw_texture_rec(texture, source, Vector2::new(cmd.x, cmd.y), Color::WHITE);
        }
    }
}

impl NativeRenderer for RaylibBackend {
    fn texture_create(
        &self,
        format: PixelFormat,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureHandle, NativeError> {
        if format != PixelFormat::Rgba8888 {
            return Err(NativeError::Allocation(format!("unsupported format {:?}", format)));
        }
        let mut data = pixels.to_vec();
        let image = ffi::Image {
            data: data.as_mut_ptr().cast(),
            width: width as i32,
            height: height as i32,
            mipmaps: 1,
            format: ffi::PixelFormat::PIXELFORMAT_UNCOMPRESSED_R8G8B8A8 as i32,
        };
        // SAFETY: `image` borrows `data`, which outlives the call; raylib
        // copies the pixels to the GPU and does not keep the pointer.
        let raw = unsafe { ffi::LoadTextureFromImage(image) };
        if raw.id == 0 {
            return Err(NativeError::Allocation(format!(
                "raylib could not upload a {}x{} texture",
                width, height
            )));
        }
        // SAFETY: `raw` is a freshly loaded texture owned by nobody else.
        let texture = unsafe { Texture2D::from_raw(raw) };

        let id = self.next_texture.get() + 1;
        self.next_texture.set(id);
        let handle = TextureHandle(id);
        self.textures.borrow_mut().insert(handle, texture);
        debug!("raylib: uploaded texture {} ({}x{})", id, width, height);
        Ok(handle)
    }

    fn texture_destroy(&self, handle: TextureHandle) {
        // Texture2D unloads itself on drop
        if self.textures.borrow_mut().remove(&handle).is_some() {
            debug!("raylib: unloaded texture {}", handle.0);
        }
    }

    fn attach_sprite(&self, sprite: SpriteLink) -> Result<NodeHandle, NativeError> {
        self.list.borrow_mut().insert(sprite)
    }

    fn detach(&self, node: NodeHandle) -> Result<(), NativeError> {
        self.list.borrow_mut().remove(node).map(|_| ())
    }
}

impl KeyPoller for RaylibBackend {
    fn key_poll(&self, code: KeyCode) -> Result<bool, InputError> {
        Ok(self.rl.borrow().is_key_down(keyboard_key(code)))
    }
}
