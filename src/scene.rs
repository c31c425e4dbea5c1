//! Scene context.
//!
//! A [`Scene`] owns everything one level needs between load and unload: the
//! tile sprites, the player actor and the key edge detector. Textures and
//! sheets are owned by the sprites that use them; the scene only caches weak
//! references so that a second request for the same image or frame set
//! shares the live resource. The external driver creates it with [`Scene::load`], calls
//! [`Scene::update`] once per frame, and ends it with [`Scene::unload`] (or by
//! dropping it).
//!
//! Teardown order is fixed: sprites first (detaching their render nodes),
//! then sheets, then textures. Removing a single tile or the player follows
//! the same order for whatever that sprite was the last user of.
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::components::mob::{Mob, MobError};
use crate::components::sprite::{RenderError, Sprite};
use crate::events::input::{Edge, InputError, KeyCode};
use crate::native::{KeyPoller, RendererRef};
use crate::resources::descriptors::{
    CharacterDescriptor, DescriptorError, TileDescriptor, TileMapDescriptor,
};
use crate::resources::spritesheet::{Rect, SpriteSheet};
use crate::resources::texture::{ResourceCreationError, Texture};
use crate::resources::worldtime::WorldTime;
use crate::systems::input::{KeyEdgeDetector, KeyEdges};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Resource(#[from] ResourceCreationError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(transparent)]
    Mob(#[from] MobError),
}

/// What the driver should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneSignal {
    Continue,
    Quit,
}

/// A sprite moved by a [`Mob`].
#[derive(Debug)]
pub struct Actor {
    pub sprite: Sprite,
    pub mob: Mob,
}

type SheetKey = (PathBuf, Vec<Rect>);

pub struct Scene {
    renderer: RendererRef,
    // Field order is drop order: sprites before the caches.
    player: Option<Actor>,
    tiles: Vec<Sprite>,
    sheets: FxHashMap<SheetKey, Weak<SpriteSheet>>,
    textures: FxHashMap<PathBuf, Weak<Texture>>,
    input: KeyEdgeDetector,
    time: WorldTime,
    stride: f32,
}

impl Scene {
    /// Empty scene. `stride` is how far one key press moves the player's
    /// destination.
    pub fn new(renderer: RendererRef, stride: f32) -> Self {
        Self {
            renderer,
            player: None,
            tiles: Vec::new(),
            sheets: FxHashMap::default(),
            textures: FxHashMap::default(),
            input: KeyEdgeDetector::new(),
            time: WorldTime::default(),
            stride,
        }
    }

    /// Build a scene from a tile map and an optional player character.
    ///
    /// On error everything created so far is released before returning.
    pub fn load(
        renderer: RendererRef,
        map: &TileMapDescriptor,
        character: Option<&CharacterDescriptor>,
        stride: f32,
    ) -> Result<Self, SceneError> {
        let mut scene = Self::new(renderer, stride);
        for tile in &map.tiles {
            scene.spawn_tile(tile)?;
        }
        if let Some(character) = character {
            scene.spawn_player(character)?;
        }
        info!(
            "Scene loaded: {} tiles, {} textures, {} sheets, player={}",
            scene.tiles.len(),
            scene.texture_count(),
            scene.sheet_count(),
            scene.player.is_some()
        );
        Ok(scene)
    }

    /// Texture for `path`, decoded unless a live one is already cached.
    pub fn texture(&mut self, path: &Path) -> Result<Rc<Texture>, SceneError> {
        if let Some(texture) = self.textures.get(path).and_then(Weak::upgrade) {
            return Ok(texture);
        }
        let texture = Rc::new(Texture::load(&self.renderer, path)?);
        Ok(self.insert_texture_rc(path.to_path_buf(), texture))
    }

    /// Register an already created texture under `key`, replacing any
    /// previous entry. The scene does not keep it alive: it is freed once
    /// the returned handle and every sheet built on it are gone.
    pub fn insert_texture(&mut self, key: impl Into<PathBuf>, texture: Texture) -> Rc<Texture> {
        self.insert_texture_rc(key.into(), Rc::new(texture))
    }

    fn insert_texture_rc(&mut self, key: PathBuf, texture: Rc<Texture>) -> Rc<Texture> {
        self.textures.retain(|_, cached| cached.strong_count() > 0);
        self.textures.insert(key, Rc::downgrade(&texture));
        texture
    }

    /// Sheet over the texture at `path` with exactly `frames`, shared between
    /// all live users of the same image and frame set.
    pub fn sheet(&mut self, path: &Path, frames: &[Rect]) -> Result<Rc<SpriteSheet>, SceneError> {
        let key = (path.to_path_buf(), frames.to_vec());
        if let Some(sheet) = self.sheets.get(&key).and_then(Weak::upgrade) {
            return Ok(sheet);
        }
        let texture = self.texture(path)?;
        let sheet = Rc::new(SpriteSheet::create(texture, frames));
        debug!("Created sheet over {:?} with {} frame(s)", path, frames.len());
        self.sheets.retain(|_, cached| cached.strong_count() > 0);
        self.sheets.insert(key, Rc::downgrade(&sheet));
        Ok(sheet)
    }

    /// Create a visible sprite for one tile.
    pub fn spawn_tile(&mut self, tile: &TileDescriptor) -> Result<(), SceneError> {
        let sheet = self.sheet(&tile.image, &[tile.source])?;
        let mut sprite = Sprite::create(&self.renderer, sheet);
        let (x, y) = tile.pixel_position();
        sprite.set_position(x, y);
        sprite.set_visible(true)?;
        self.tiles.push(sprite);
        Ok(())
    }

    /// Detach and drop the tile at `index`, releasing its sheet and texture
    /// if no other sprite uses them. Later tiles shift down by one.
    pub fn remove_tile(&mut self, index: usize) -> bool {
        if index >= self.tiles.len() {
            return false;
        }
        self.tiles.remove(index).destroy();
        debug!("Removed tile {}", index);
        true
    }

    /// Detach and drop the player, if any.
    pub fn despawn_player(&mut self) -> bool {
        match self.player.take() {
            Some(actor) => {
                actor.sprite.destroy();
                debug!("Player despawned");
                true
            }
            None => false,
        }
    }

    /// Create the player actor, replacing any previous one.
    pub fn spawn_player(&mut self, character: &CharacterDescriptor) -> Result<(), SceneError> {
        let sheet = self.sheet(&character.image, &[character.source])?;
        let mut sprite = Sprite::create(&self.renderer, sheet);
        sprite.set_position(character.x, character.y);
        let mob = Mob::new(&sprite, character.speed)?;
        sprite.set_visible(true)?;
        self.player = Some(Actor { sprite, mob });
        Ok(())
    }

    /// Run one frame: poll input edges, steer the player, advance its mob.
    ///
    /// Returns [`SceneSignal::Quit`] when Esc was pressed this frame.
    pub fn update<P: KeyPoller + ?Sized>(&mut self, poller: &P, dt: f32) -> Result<SceneSignal, SceneError> {
        let edges: KeyEdges = self.input.update(poller)?;
        let dt = self.time.advance(dt);

        if let Some(actor) = self.player.as_mut() {
            actor.mob.steer(&actor.sprite, &edges, self.stride);
            actor.mob.update(&mut actor.sprite, dt);
        }

        let quit = edges
            .iter()
            .any(|e| e.code == KeyCode::Esc && e.edge == Edge::Pressed);
        Ok(if quit {
            SceneSignal::Quit
        } else {
            SceneSignal::Continue
        })
    }

    pub fn tiles(&self) -> &[Sprite] {
        &self.tiles
    }

    pub fn player(&self) -> Option<&Actor> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Actor> {
        self.player.as_mut()
    }

    pub fn time(&self) -> &WorldTime {
        &self.time
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time.time_scale = time_scale;
    }

    /// Cached textures that are still alive.
    pub fn texture_count(&self) -> usize {
        self.textures.values().filter(|t| t.strong_count() > 0).count()
    }

    /// Cached sheets that are still alive.
    pub fn sheet_count(&self) -> usize {
        self.sheets.values().filter(|s| s.strong_count() > 0).count()
    }

    /// Tear the scene down: sprites, then sheets, then textures.
    pub fn unload(&mut self) {
        if self.player.is_none() && self.tiles.is_empty() && self.textures.is_empty() {
            return;
        }
        // dropping the sprites releases the sheets and textures they own
        self.player = None;
        self.tiles.clear();
        self.sheets.clear();
        self.textures.clear();
        self.input.reset();
        info!("Scene unloaded");
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.unload();
    }
}
