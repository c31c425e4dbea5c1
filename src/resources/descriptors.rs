//! Tile map and character descriptors.
//!
//! Plain serializable structs produced from JSON files. They carry no
//! behavior: the scene turns them into texture, sheet and sprite creation
//! calls. Image paths are resolved against the directory of the descriptor
//! file when it is loaded.
//!
//! ```json
//! {
//!   "tiles": [
//!     { "image": "tiles.png", "source": { "x": 0, "y": 0, "w": 16, "h": 16 },
//!       "column": 3, "row": 1, "width": 16, "height": 16 }
//!   ]
//! }
//! ```
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::resources::spritesheet::Rect;

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("failed to read descriptor {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse descriptor {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One tile placement.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TileDescriptor {
    pub image: PathBuf,
    /// Region of the image shown by the tile.
    pub source: Rect,
    /// Destination grid coordinates, in tiles.
    pub column: i32,
    pub row: i32,
    /// Tile size in pixels.
    pub width: u32,
    pub height: u32,
}

impl TileDescriptor {
    /// Pixel position of the tile's top-left corner.
    pub fn pixel_position(&self) -> (f32, f32) {
        (
            self.column as f32 * self.width as f32,
            self.row as f32 * self.height as f32,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct TileMapDescriptor {
    pub tiles: Vec<TileDescriptor>,
}

/// A controllable actor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CharacterDescriptor {
    pub image: PathBuf,
    pub source: Rect,
    /// Movement speed in steps per second.
    pub speed: f32,
    /// Spawn position in pixels.
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DescriptorError> {
    let text = std::fs::read_to_string(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DescriptorError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn base_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

impl TileMapDescriptor {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let mut map: TileMapDescriptor = read_json(path)?;
        let base = base_dir(path);
        for tile in &mut map.tiles {
            tile.image = base.join(&tile.image);
        }
        Ok(map)
    }
}

impl CharacterDescriptor {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let mut character: CharacterDescriptor = read_json(path)?;
        character.image = base_dir(path).join(&character.image);
        Ok(character)
    }
}
