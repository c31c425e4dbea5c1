//! Beer library.
//!
//! Binds textures, sprite sheets, sprites and a tile-stepping actor to a
//! native rendering layer. The native side is reached only through the
//! traits in [`native`], so the whole crate runs headless in tests.

pub mod components;
pub mod events;
pub mod native;
pub mod resources;
pub mod scene;
pub mod systems;
