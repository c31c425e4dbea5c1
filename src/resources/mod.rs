//! Long-lived data owned by a scene or the driver.
//!
//! Overview
//! - `descriptors` – tile map and character descriptors loaded from JSON
//! - `gameconfig` – window and scene settings loaded from an INI file
//! - `spritesheet` – frame sets over a shared texture
//! - `texture` – native texture resource released on drop
//! - `worldtime` – simulation time and delta
pub mod descriptors;
pub mod gameconfig;
pub mod spritesheet;
pub mod texture;
pub mod worldtime;
