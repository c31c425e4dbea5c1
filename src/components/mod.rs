//! Scene entities.
//!
//! Submodules overview:
//! - [`mob`] – tile-stepping movement controller paced by a time accumulator
//! - [`sprite`] – sprite state and its render-graph binding

pub mod mob;
pub mod sprite;
